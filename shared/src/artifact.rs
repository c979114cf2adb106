//! Trained model artifact
//!
//! The forest and the label registry that encoded its training labels always
//! travel together in one JSON document. Loading re-validates the pairing:
//! format version, feature column order, registry canonical order, the
//! structure of every tree, and the class count must all agree with what this
//! build serves.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::classifier::{self, ClassificationReport, ForestLayout, RandomForestClassifier};
use crate::error::{ArtifactError, ClassifierError};
use crate::features::{matches_layout, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::models::CropDescriptor;
use crate::registry::LabelRegistry;
use crate::types::ClassId;

/// Current on-disk format
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Classifier plus the registry and display metadata it was trained with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    format_version: u32,
    trained_at: DateTime<Utc>,
    feature_columns: Vec<String>,
    registry: LabelRegistry,
    /// Crop name -> image URL, for registry labels known to the catalog
    descriptors: BTreeMap<String, String>,
    forest: RandomForestClassifier,
    evaluation: ClassificationReport,
}

impl TrainedModel {
    /// Package a fitted forest with its registry. Display metadata is taken
    /// from the crop catalog for every registry label.
    pub fn new(
        registry: LabelRegistry,
        forest: RandomForestClassifier,
        evaluation: ClassificationReport,
        trained_at: DateTime<Utc>,
    ) -> Result<Self, ArtifactError> {
        let descriptors = catalog::image_table(registry.labels().iter().map(String::as_str));
        let model = Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            trained_at,
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            registry,
            descriptors,
            forest,
            evaluation,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check that this artifact can be served by this build
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        if !matches_layout(&self.feature_columns) {
            return Err(ArtifactError::FeatureLayoutMismatch {
                found: self.feature_columns.clone(),
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            });
        }
        let layout = self.layout()?;
        if layout.n_classes > self.registry.len() {
            return Err(ArtifactError::ClassCountMismatch {
                model_classes: layout.n_classes,
                registry_classes: self.registry.len(),
            });
        }
        Ok(())
    }

    /// Walk the forest's trees; fails on any tree that could not be served
    pub fn layout(&self) -> Result<ForestLayout, ArtifactError> {
        ForestLayout::inspect(&self.forest, FEATURE_COUNT)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let model: TrainedModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the artifact, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Predict the class id of an assembled feature row
    pub fn predict(&self, features: &FeatureVector) -> Result<ClassId, ClassifierError> {
        classifier::predict_row(&self.forest, features)
    }

    /// Predict from a raw row; the row must follow [`FEATURE_COLUMNS`] order
    pub fn predict_row(&self, row: &[f64]) -> Result<ClassId, ClassifierError> {
        let values = <[f64; FEATURE_COUNT]>::try_from(row).map_err(|_| {
            ClassifierError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                actual: row.len(),
            }
        })?;
        self.predict(&FeatureVector::from_array(values))
    }

    /// Display metadata for a class id, if both the id and its crop are known
    pub fn lookup(&self, id: ClassId) -> Option<CropDescriptor> {
        let name = self.registry.decode(id).ok()?;
        self.descriptors
            .get(name)
            .map(|url| CropDescriptor::new(name, url.as_str()))
    }

    /// Display metadata for a class id, falling back to the sentinel descriptor
    pub fn resolve(&self, id: ClassId) -> CropDescriptor {
        self.lookup(id).unwrap_or_else(CropDescriptor::unknown)
    }

    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    pub fn forest(&self) -> &RandomForestClassifier {
        &self.forest
    }

    pub fn evaluation(&self) -> &ClassificationReport {
        &self.evaluation
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn n_classes(&self) -> usize {
        self.registry.len()
    }
}
