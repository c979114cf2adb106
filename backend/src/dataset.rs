//! Training dataset loading
//!
//! The dataset is a headed CSV with one row per observation:
//! `N,P,K,temperature,humidity,ph,rainfall,label`. Column order in the file
//! does not matter; columns are matched by header name.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use shared::CropSample;

/// Dataset loading errors
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid dataset record: {0}")]
    Csv(#[from] csv::Error),
}

/// Read samples from any CSV source
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<CropSample>, DatasetError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let samples = reader
        .deserialize::<CropSample>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(samples)
}

/// Load samples from a CSV file
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<CropSample>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let samples = read_samples(file)?;
    tracing::info!(path = %path.display(), samples = samples.len(), "Loaded training dataset");
    Ok(samples)
}
