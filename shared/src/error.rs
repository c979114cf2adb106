//! Error types for the crop recommendation domain
//!
//! Each layer gets its own enum so the serving side can tell training-time
//! failures apart from prediction-time ones.

use thiserror::Error;

use crate::types::ClassId;

/// Recommendation request validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing parameters: {}", fields.join(", "))]
    MissingParameters { fields: Vec<&'static str> },

    #[error("Parameter {field} must be a number, got {value:?}")]
    InvalidParameter { field: &'static str, value: String },

    #[error("Parameter {field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

/// Label registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Label registry cannot be empty")]
    Empty,

    #[error("Unknown class id {id} (registry has {len} classes)")]
    UnknownClassId { id: ClassId, len: usize },

    #[error("Labels are not in canonical order at position {position}: {previous:?} >= {current:?}")]
    NotCanonical {
        position: usize,
        previous: String,
        current: String,
    },
}

/// Classifier fitting and prediction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Cannot fit a classifier on an empty dataset")]
    EmptyDataset,

    #[error("Feature matrix has {rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("Feature values must be finite (row {row}, column {column})")]
    NonFiniteFeature { row: usize, column: usize },

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Invalid hyperparameter: {0}")]
    InvalidParameter(String),

    /// Failure reported by aprender while fitting or splitting
    #[error("Classifier backend error: {0}")]
    Backend(String),
}

/// Offline training errors. These are fatal for the training job.
#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Training dataset is empty")]
    EmptyDataset,

    #[error("Training dataset contains a single class ({0}); at least two are required")]
    SingleClass(String),

    #[error("Test size must be in (0, 1), got {0}")]
    InvalidTestSize(f64),

    #[error("Dataset of {samples} samples is too small to hold out {test_size} for evaluation")]
    DatasetTooSmall { samples: usize, test_size: f64 },

    #[error("Sample {index} has a non-finite value in column {column}")]
    NonFiniteSample { index: usize, column: &'static str },

    #[error("Label {0:?} is not present in the registry")]
    UnencodableLabel(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Model artifact persistence errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read or write model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed model artifact: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Artifact feature layout {found:?} does not match serving layout {expected:?}")]
    FeatureLayoutMismatch {
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("Model predicts {model_classes} classes but registry has {registry_classes}")]
    ClassCountMismatch {
        model_classes: usize,
        registry_classes: usize,
    },

    #[error("Malformed forest: {0}")]
    MalformedForest(#[from] ForestDefect),
}

/// Structural defects found when walking a stored forest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForestDefect {
    #[error("forest has no trees")]
    NoTrees,

    #[error("forest carries no training labels")]
    MissingLabels,

    #[error("tree {tree} has no root node")]
    EmptyTree { tree: usize },

    #[error("tree {tree} was fitted on {found} features, expected {expected}")]
    TreeFeatureCount {
        tree: usize,
        found: usize,
        expected: usize,
    },

    #[error("tree {tree} splits on feature {feature} but rows have {n_features}")]
    FeatureOutOfRange {
        tree: usize,
        feature: usize,
        n_features: usize,
    },

    #[error("tree {tree} has a leaf for class {class} but the forest votes over {n_classes}")]
    ClassOutOfRange {
        tree: usize,
        class: ClassId,
        n_classes: usize,
    },

    #[error("tree {tree} is {depth} levels deep; at most {max} can be stored")]
    TooDeep { tree: usize, depth: usize, max: usize },
}
