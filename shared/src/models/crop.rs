//! Crop training samples and display metadata

use serde::{Deserialize, Serialize};

/// Display name of the fallback descriptor
pub const UNKNOWN_CROP_NAME: &str = "Unknown Crop";

/// One labelled row of the historical crop dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSample {
    /// Nitrogen content in soil
    #[serde(rename = "N")]
    pub n: f64,
    /// Phosphorus content in soil
    #[serde(rename = "P")]
    pub p: f64,
    /// Potassium content in soil
    #[serde(rename = "K")]
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    /// Rainfall in mm
    pub rainfall: f64,
    /// Crop name
    pub label: String,
}

/// Static display metadata for a crop, keyed by crop name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDescriptor {
    pub name: String,
    pub image_url: String,
}

impl CropDescriptor {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
        }
    }

    /// Fallback returned when a class id or crop name has no known metadata
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_CROP_NAME.to_string(),
            image_url: String::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_CROP_NAME && self.image_url.is_empty()
    }
}
