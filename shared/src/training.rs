//! Offline training pipeline
//!
//! Samples → label registry → seeded train/held-out split → random forest →
//! held-out evaluation → [`TrainedModel`]. Every failure here is fatal for the
//! training job; none of it runs in the serving process.

use aprender::primitives::Vector;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::artifact::TrainedModel;
use crate::classifier::{self, train_test_split, ClassificationReport, RandomForestClassifier};
use crate::error::{ClassifierError, TrainingError};
use crate::features::feature_matrix;
use crate::models::CropSample;
use crate::registry::LabelRegistry;
use crate::types::ClassId;

/// Hyperparameters and reproducibility settings for a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub n_estimators: usize,
    /// Seed for the held-out split and for the forest
    pub seed: u64,
    /// Held-out fraction, in (0, 1)
    pub test_size: f64,
    pub max_depth: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            test_size: 0.2,
            max_depth: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: TrainedModel,
    pub train_samples: usize,
    pub test_samples: usize,
}

impl TrainingOutcome {
    pub fn report(&self) -> &ClassificationReport {
        self.model.evaluation()
    }

    pub fn accuracy(&self) -> f64 {
        self.model.evaluation().accuracy
    }
}

/// Check samples are usable and build the registry from their labels
pub fn prepare(samples: &[CropSample]) -> Result<(LabelRegistry, Vec<ClassId>), TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    for (index, sample) in samples.iter().enumerate() {
        if let Some(column) = sample.features().non_finite_column() {
            return Err(TrainingError::NonFiniteSample { index, column });
        }
    }

    let registry = LabelRegistry::build(samples.iter().map(|s| s.label.as_str()))?;
    if registry.len() < 2 {
        return Err(TrainingError::SingleClass(registry.labels()[0].clone()));
    }

    let labels = samples
        .iter()
        .map(|s| {
            registry
                .encode(&s.label)
                .ok_or_else(|| TrainingError::UnencodableLabel(s.label.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((registry, labels))
}

/// Held-out row count for `n` samples, rounded the way the splitter rounds
fn held_out(n: usize, test_size: f64) -> usize {
    (n as f32 * test_size as f32).round() as usize
}

/// Train and evaluate a model on `samples`
pub fn train(
    samples: &[CropSample],
    config: &TrainingConfig,
) -> Result<TrainingOutcome, TrainingError> {
    if !(config.test_size > 0.0 && config.test_size < 1.0) {
        return Err(TrainingError::InvalidTestSize(config.test_size));
    }
    if config.n_estimators == 0 {
        let err = ClassifierError::InvalidParameter("n_estimators must be at least 1".into());
        return Err(err.into());
    }
    let (registry, labels) = prepare(samples)?;
    let n_test = held_out(samples.len(), config.test_size);
    if n_test == 0 || n_test >= samples.len() {
        return Err(TrainingError::DatasetTooSmall {
            samples: samples.len(),
            test_size: config.test_size,
        });
    }

    let rows: Vec<_> = samples.iter().map(CropSample::features).collect();
    let x = feature_matrix(&rows)?;
    // Class ids ride through the splitter as floats; they are small integers
    let y = Vector::from_vec(labels.iter().map(|&id| id as f32).collect());
    let (x_train, x_test, y_train, y_test) =
        train_test_split(&x, &y, config.test_size as f32, Some(config.seed))
            .map_err(ClassifierError::Backend)?;
    let ids = |v: &Vector<f32>| -> Vec<ClassId> {
        v.as_slice().iter().map(|&c| c as ClassId).collect()
    };
    let (y_train, y_test) = (ids(&y_train), ids(&y_test));

    let mut forest =
        RandomForestClassifier::new(config.n_estimators).with_random_state(config.seed);
    if let Some(depth) = config.max_depth {
        forest = forest.with_max_depth(depth);
    }
    forest
        .fit(&x_train, &y_train)
        .map_err(|e| ClassifierError::Backend(e.to_string()))?;

    let predictions = classifier::predict(&forest, &x_test)?;
    let report = ClassificationReport::new(&predictions, &y_test, registry.labels())?;

    let model = TrainedModel::new(registry, forest, report, Utc::now())?;

    Ok(TrainingOutcome {
        model,
        train_samples: y_train.len(),
        test_samples: y_test.len(),
    })
}
