//! Recommendation request and response models

use serde::{Deserialize, Serialize};

use crate::models::{CropDescriptor, WeatherReading};
use crate::types::GpsCoordinates;

/// A request value as posted by clients: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Blank strings are treated the same as an absent field
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(s) if s.trim().is_empty())
    }

    /// Numeric coercion; `None` for text that does not parse as a finite number
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(v) => *v,
            NumericInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// Body of `POST /recommend_crop/`. Every field is required; presence is
/// checked by [`crate::validation::validate_recommendation_request`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub lat: Option<NumericInput>,
    #[serde(default)]
    pub lon: Option<NumericInput>,
    #[serde(default, rename = "N")]
    pub n: Option<NumericInput>,
    #[serde(default, rename = "P")]
    pub p: Option<NumericInput>,
    #[serde(default, rename = "K")]
    pub k: Option<NumericInput>,
    #[serde(default)]
    pub ph: Option<NumericInput>,
    #[serde(default)]
    pub rainfall: Option<NumericInput>,
}

/// Validated, numerically coerced soil and location input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilInput {
    pub location: GpsCoordinates,
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ph: f64,
    pub rainfall: f64,
}

/// Input values echoed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    #[serde(rename = "N")]
    pub n: i64,
    #[serde(rename = "P")]
    pub p: i64,
    #[serde(rename = "K")]
    pub k: i64,
    pub ph: f64,
    pub rainfall: f64,
}

impl From<&SoilInput> for InputData {
    fn from(input: &SoilInput) -> Self {
        // Nutrient readings are reported as whole numbers, truncated toward
        // zero; validation keeps them within i64 range
        InputData {
            n: input.n.trunc() as i64,
            p: input.p.trunc() as i64,
            k: input.k.trunc() as i64,
            ph: input.ph,
            rainfall: input.rainfall,
        }
    }
}

/// Successful recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommended_crop: String,
    pub crop_image_url: String,
    /// Weather values that were actually fed to the classifier
    pub weather_data: WeatherReading,
    pub input_data: InputData,
}

impl RecommendationResponse {
    pub fn new(crop: CropDescriptor, weather: WeatherReading, input: &SoilInput) -> Self {
        Self {
            recommended_crop: crop.name,
            crop_image_url: crop.image_url,
            weather_data: weather,
            input_data: input.into(),
        }
    }
}
