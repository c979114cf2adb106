//! Classifier and training pipeline tests
//!
//! Determinism of training and prediction, sensitivity to feature column
//! order, rejection of unusable datasets, and artifact persistence.

use shared::catalog::KNOWN_CROPS;
use shared::training::{train, TrainingConfig};
use shared::{
    assemble, ArtifactError, CropSample, FeatureVector, ForestDefect, GpsCoordinates, SoilInput,
    TrainedModel, TrainingError, WeatherReading, FEATURE_COLUMNS,
};

/// Helper to build a sample
#[allow(clippy::too_many_arguments)]
fn sample(
    label: &str,
    n: f64,
    p: f64,
    k: f64,
    temperature: f64,
    humidity: f64,
    ph: f64,
    rainfall: f64,
) -> CropSample {
    CropSample {
        n,
        p,
        k,
        temperature,
        humidity,
        ph,
        rainfall,
        label: label.to_string(),
    }
}

/// One well-separated cluster per known crop
fn synthetic_crops(per_crop: usize) -> Vec<CropSample> {
    let mut samples = Vec::new();
    for (i, (name, _)) in KNOWN_CROPS.iter().enumerate() {
        let base = i as f64;
        for j in 0..per_crop {
            let jitter = (j % 5) as f64 * 0.2;
            samples.push(sample(
                name,
                base * 6.0 + jitter,
                base * 5.0 + jitter,
                base * 4.0 + jitter,
                15.0 + base + jitter,
                40.0 + base * 2.0 + jitter,
                5.0 + base * 0.1,
                50.0 + base * 10.0 + jitter,
            ));
        }
    }
    samples
}

/// Two crops that differ only by which of N and P is high
fn column_sensitive_samples() -> Vec<CropSample> {
    let mut samples = Vec::new();
    for j in 0..40 {
        let jitter = (j % 7) as f64;
        samples.push(sample("chickpea", 10.0 + jitter, 90.0 + jitter, 40.0, 25.0, 80.0, 6.5, 200.0));
        samples.push(sample("rice", 90.0 + jitter, 10.0 + jitter, 40.0, 25.0, 80.0, 6.5, 200.0));
    }
    samples
}

fn small_config() -> TrainingConfig {
    TrainingConfig {
        n_estimators: 15,
        ..TrainingConfig::default()
    }
}

fn soil(n: f64, p: f64) -> SoilInput {
    SoilInput {
        location: GpsCoordinates::new(28.6, 77.2),
        n,
        p,
        k: 40.0,
        ph: 6.5,
        rainfall: 200.0,
    }
}

// =============================================================================
// Prediction
// =============================================================================

mod prediction {
    use super::*;

    #[test]
    fn predict_is_deterministic() {
        let model = train(&synthetic_crops(10), &small_config()).unwrap().model;
        let features = FeatureVector::from_array([90.0, 42.0, 43.0, 25.0, 80.0, 6.5, 200.0]);

        let first = model.predict(&features).unwrap();
        for _ in 0..20 {
            assert_eq!(model.predict(&features).unwrap(), first);
        }
    }

    #[test]
    fn prediction_resolves_to_known_crop() {
        let model = train(&synthetic_crops(10), &small_config()).unwrap().model;
        let features = assemble(&soil(90.0, 42.0), &WeatherReading::new(25.0, 80));
        let id = model.predict(&features).unwrap();
        let crop = model.resolve(id);
        assert!(!crop.is_unknown());
        assert!(KNOWN_CROPS.iter().any(|(name, _)| *name == crop.name));
    }

    #[test]
    fn training_clusters_are_recovered() {
        let samples = synthetic_crops(10);
        let outcome = train(&samples, &small_config()).unwrap();
        assert!(outcome.accuracy() > 0.9, "accuracy {}", outcome.accuracy());

        // A cluster centre predicts its own crop
        let centre = &samples[10 * 11];
        let id = outcome.model.predict(&centre.features()).unwrap();
        assert_eq!(outcome.model.resolve(id).name, centre.label);
    }

    #[test]
    fn swapping_columns_changes_prediction() {
        let model = train(&column_sensitive_samples(), &small_config()).unwrap().model;
        let weather = WeatherReading::new(25.0, 80);

        let features = assemble(&soil(12.0, 92.0), &weather);
        let mut swapped = features.to_array();
        swapped.swap(0, 1);
        let swapped = FeatureVector::from_array(swapped);

        let original = model.resolve(model.predict(&features).unwrap());
        let reordered = model.resolve(model.predict(&swapped).unwrap());
        assert_eq!(original.name, "chickpea");
        assert_eq!(reordered.name, "rice");
    }

    #[test]
    fn raw_row_of_wrong_length_rejected() {
        let model = train(&column_sensitive_samples(), &small_config()).unwrap().model;
        assert!(model.predict_row(&[1.0, 2.0, 3.0]).is_err());
        assert!(model.predict_row(&[0.0; 8]).is_err());
    }
}

// =============================================================================
// Training
// =============================================================================

mod training {
    use super::*;

    #[test]
    fn rejects_empty_dataset() {
        assert!(matches!(
            train(&[], &TrainingConfig::default()),
            Err(TrainingError::EmptyDataset)
        ));
    }

    #[test]
    fn rejects_single_class_dataset() {
        let samples: Vec<CropSample> = column_sensitive_samples()
            .into_iter()
            .filter(|s| s.label == "rice")
            .collect();
        assert!(matches!(
            train(&samples, &small_config()),
            Err(TrainingError::SingleClass(_))
        ));
    }

    #[test]
    fn rejects_invalid_test_size() {
        let config = TrainingConfig {
            test_size: 1.5,
            ..small_config()
        };
        assert!(matches!(
            train(&column_sensitive_samples(), &config),
            Err(TrainingError::InvalidTestSize(_))
        ));
    }

    #[test]
    fn same_samples_and_config_give_identical_model() {
        let samples = synthetic_crops(8);
        let a = train(&samples, &small_config()).unwrap();
        let b = train(&samples, &small_config()).unwrap();

        assert_eq!(a.model.registry(), b.model.registry());
        assert_eq!(a.model.evaluation(), b.model.evaluation());
        for s in &samples {
            let features = s.features();
            assert_eq!(
                a.model.predict(&features).unwrap(),
                b.model.predict(&features).unwrap()
            );
        }
    }

    #[test]
    fn different_seed_gives_different_forest() {
        let samples = synthetic_crops(8);
        let a = train(&samples, &small_config()).unwrap();
        let b = train(
            &samples,
            &TrainingConfig {
                seed: 7,
                ..small_config()
            },
        )
        .unwrap();
        assert_ne!(
            serde_json::to_value(a.model.forest()).unwrap(),
            serde_json::to_value(b.model.forest()).unwrap()
        );
    }

    #[test]
    fn max_depth_bounds_every_tree() {
        let config = TrainingConfig {
            max_depth: Some(3),
            ..small_config()
        };
        let outcome = train(&synthetic_crops(8), &config).unwrap();
        let layout = outcome.model.layout().unwrap();
        assert_eq!(layout.n_trees(), 15);
        assert!(layout.max_depth() <= 3);
    }

    #[test]
    fn report_covers_every_registry_label() {
        let outcome = train(&synthetic_crops(10), &small_config()).unwrap();
        let report = outcome.report();
        assert_eq!(report.classes.len(), 22);
        assert_eq!(report.total_support, outcome.test_samples);
        assert_eq!(outcome.train_samples + outcome.test_samples, 220);
        assert!(report.to_string().contains("watermelon"));
    }
}

// =============================================================================
// Artifact persistence
// =============================================================================

mod artifact {
    use super::*;

    #[test]
    fn save_and_load_preserves_predictions() {
        let samples = synthetic_crops(8);
        let model = train(&samples, &small_config()).unwrap().model;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("crop_model.json");
        model.save(&path).unwrap();
        let loaded = TrainedModel::load(&path).unwrap();

        assert_eq!(loaded.to_json().unwrap(), model.to_json().unwrap());
        for s in &samples {
            let features = s.features();
            assert_eq!(
                loaded.predict(&features).unwrap(),
                model.predict(&features).unwrap()
            );
        }
    }

    #[test]
    fn load_rejects_reordered_feature_columns() {
        let model = train(&column_sensitive_samples(), &small_config()).unwrap().model;
        let mut value: serde_json::Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();
        let mut columns: Vec<&str> = FEATURE_COLUMNS.to_vec();
        columns.swap(0, 1);
        value["feature_columns"] = serde_json::json!(columns);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop_model.json");
        std::fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            TrainedModel::load(&path),
            Err(ArtifactError::FeatureLayoutMismatch { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TrainedModel::load(dir.path().join("absent.json")),
            Err(ArtifactError::Io(_))
        ));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop_model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            TrainedModel::load(&path),
            Err(ArtifactError::Format(_))
        ));
    }

    #[test]
    fn load_rejects_tree_without_root() {
        let model = train(&synthetic_crops(4), &small_config()).unwrap().model;
        let mut value: serde_json::Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();
        value["forest"]["trees"][0]["tree"] = serde_json::Value::Null;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop_model.json");
        std::fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            TrainedModel::load(&path),
            Err(ArtifactError::MalformedForest(ForestDefect::EmptyTree { tree: 0 }))
        ));
    }
}
