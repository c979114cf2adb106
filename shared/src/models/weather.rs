//! Weather data models

use serde::{Deserialize, Serialize};

/// Current conditions used to enrich a recommendation request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    /// Air temperature in the provider's configured units (Celsius by default)
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: i32,
}

impl WeatherReading {
    pub fn new(temperature: f64, humidity: i32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }
}
