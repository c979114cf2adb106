//! Supervised multi-class classification
//!
//! Trees, bootstrap ensembles, the held-out split and the raw metrics come
//! from aprender. This module owns the seams around them:
//! - prediction through tree vote shares, with ties going to the lowest id
//! - a structural walk over forests read back from disk ([`ForestLayout`])
//! - the per-class evaluation report

pub mod layout;
pub mod metrics;

pub use aprender::model_selection::train_test_split;
pub use aprender::tree::RandomForestClassifier;
pub use layout::{ForestLayout, MAX_STORED_DEPTH};
pub use metrics::{AveragedMetrics, ClassMetrics, ClassificationReport};

use aprender::primitives::Matrix;

use crate::error::ClassifierError;
use crate::features::FeatureVector;
use crate::types::ClassId;

/// Most-voted class for one assembled row
pub fn predict_row(
    forest: &RandomForestClassifier,
    row: &FeatureVector,
) -> Result<ClassId, ClassifierError> {
    if let Some(column) = row.as_slice().iter().position(|v| !v.is_finite()) {
        return Err(ClassifierError::NonFiniteFeature { row: 0, column });
    }
    vote(forest, &row.to_matrix()?)
}

/// Most-voted class for every row of `x`
pub fn predict(
    forest: &RandomForestClassifier,
    x: &Matrix<f32>,
) -> Result<Vec<ClassId>, ClassifierError> {
    let (n_rows, n_cols) = x.shape();
    (0..n_rows)
        .map(|r| {
            let row = Matrix::from_vec(1, n_cols, x.row(r).as_slice().to_vec())
                .map_err(|e| ClassifierError::Backend(e.to_string()))?;
            vote(forest, &row)
        })
        .collect()
}

/// Vote on a single-row matrix. aprender's own `predict` breaks ties in
/// hash order, so the shares are counted here instead.
fn vote(forest: &RandomForestClassifier, row: &Matrix<f32>) -> Result<ClassId, ClassifierError> {
    let shares = forest.predict_proba(row);
    let shares = shares.as_slice();
    let total: f32 = shares.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Err(ClassifierError::NotFitted);
    }
    Ok(argmax(shares))
}

/// Index of the largest share; ties go to the lowest index
pub(crate) fn argmax(shares: &[f32]) -> ClassId {
    let mut best = 0;
    for (idx, &share) in shares.iter().enumerate() {
        if share > shares[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::feature_matrix;

    fn row(rainfall: f64) -> FeatureVector {
        FeatureVector::from_array([50.0, 40.0, 40.0, 25.0, 80.0, 6.5, rainfall])
    }

    fn fitted_forest() -> RandomForestClassifier {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..10 {
            rows.push(row(40.0 + i as f64));
            y.push(0);
            rows.push(row(200.0 + i as f64));
            y.push(1);
        }
        let x = feature_matrix(&rows).unwrap();
        let mut forest = RandomForestClassifier::new(5).with_random_state(42);
        forest.fit(&x, &y).unwrap();
        forest
    }

    #[test]
    fn test_argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.1, 0.3, 0.3, 0.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[1.0]), 0);
    }

    #[test]
    fn test_predict_row() {
        let forest = fitted_forest();
        assert_eq!(predict_row(&forest, &row(45.0)).unwrap(), 0);
        assert_eq!(predict_row(&forest, &row(205.0)).unwrap(), 1);
    }

    #[test]
    fn test_batch_matches_single_rows() {
        let forest = fitted_forest();
        let rows = vec![row(41.0), row(207.0), row(48.0)];
        let x = feature_matrix(&rows).unwrap();
        assert_eq!(predict(&forest, &x).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn test_non_finite_row_rejected() {
        let forest = fitted_forest();
        assert_eq!(
            predict_row(&forest, &row(f64::NAN)),
            Err(ClassifierError::NonFiniteFeature { row: 0, column: 6 })
        );
    }

    #[test]
    fn test_unfitted_forest_has_no_vote() {
        let forest = RandomForestClassifier::new(3);
        assert_eq!(
            predict_row(&forest, &row(45.0)),
            Err(ClassifierError::NotFitted)
        );
    }
}
