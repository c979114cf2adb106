//! Feature assembly
//!
//! [`FEATURE_COLUMNS`] is the one definition of the classifier's column
//! order. Training rows ([`CropSample::features`]), serving rows
//! ([`assemble`]) and artifact validation all go through this module, and so
//! does the conversion into aprender's `f32` matrices.

use aprender::primitives::Matrix;
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;
use crate::models::{CropSample, SoilInput, WeatherReading};

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 7;

/// Column order shared by training and serving
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

/// Ordered numeric row in [`FEATURE_COLUMNS`] order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap raw values that are already in [`FEATURE_COLUMNS`] order
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        column_index(column).map(|idx| self.0[idx])
    }

    /// Single-row classifier matrix
    pub fn to_matrix(&self) -> Result<Matrix<f32>, ClassifierError> {
        feature_matrix(std::slice::from_ref(self))
    }

    /// First non-finite column, if any
    pub fn non_finite_column(&self) -> Option<&'static str> {
        self.0
            .iter()
            .position(|v| !v.is_finite())
            .map(|idx| FEATURE_COLUMNS[idx])
    }
}

/// Stack rows into an `n x FEATURE_COUNT` matrix. Values beyond the `f32`
/// range saturate instead of becoming infinite.
pub fn feature_matrix(rows: &[FeatureVector]) -> Result<Matrix<f32>, ClassifierError> {
    let data = rows
        .iter()
        .flat_map(|row| row.0.iter().map(|&v| (v as f32).clamp(f32::MIN, f32::MAX)))
        .collect();
    Matrix::from_vec(rows.len(), FEATURE_COUNT, data)
        .map_err(|e| ClassifierError::Backend(e.to_string()))
}

/// Position of a column name in [`FEATURE_COLUMNS`]
pub fn column_index(column: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == column)
}

/// True when `columns` is exactly the serving column order
pub fn matches_layout<S: AsRef<str>>(columns: &[S]) -> bool {
    columns.len() == FEATURE_COUNT
        && columns
            .iter()
            .zip(FEATURE_COLUMNS.iter())
            .all(|(found, expected)| found.as_ref() == *expected)
}

/// Merge user-supplied soil readings with fetched weather into a classifier row
pub fn assemble(input: &SoilInput, weather: &WeatherReading) -> FeatureVector {
    FeatureVector([
        input.n,
        input.p,
        input.k,
        weather.temperature,
        f64::from(weather.humidity),
        input.ph,
        input.rainfall,
    ])
}

impl CropSample {
    /// Training row for this sample
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ])
    }
}
