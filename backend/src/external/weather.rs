//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current-weather endpoint. Only air
//! temperature and relative humidity are read from the response.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use shared::WeatherReading;

use crate::config::WeatherConfig;

/// Message used when the provider gives no usable error message
pub const DEFAULT_ERROR_MESSAGE: &str = "Error fetching weather data";

/// Weather provider failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// The provider answered with a non-success status
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The provider answered 2xx but without a usable temperature/humidity
    #[error("Malformed weather data: {0}")]
    Malformed(String),

    /// The request never got an answer
    #[error("Weather request failed: {0}")]
    Transport(String),
}

/// Source of current weather for a location
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherReading, WeatherError>;
}

/// OpenWeatherMap API client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    endpoint: String,
    units: String,
}

/// OpenWeatherMap current weather response; everything but `main` is ignored
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    main: Option<OWMMain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: Option<f64>,
    humidity: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OWMErrorResponse {
    message: Option<String>,
}

impl OpenWeatherClient {
    /// Create a client for the public OpenWeatherMap endpoint
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, crate::config::DEFAULT_WEATHER_ENDPOINT.to_string())
    }

    /// Create a client with a custom endpoint URL (for testing)
    pub fn with_base_url(api_key: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint,
            units: "metric".to_string(),
        }
    }

    /// Build from configuration, applying the optional request timeout
    pub fn from_config(config: &WeatherConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key: config.api_key.clone(),
            endpoint: config.api_endpoint.clone(),
            units: config.units.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherReading, WeatherError> {
        tracing::debug!(lat, lon, "Fetching current weather");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "Weather provider returned an error");
            return Err(WeatherError::Service {
                status: status.as_u16(),
                message,
            });
        }

        parse_current(&body)
    }
}

/// The provider's `message` field, or the default message
fn error_message(body: &str) -> String {
    serde_json::from_str::<OWMErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}

/// Extract temperature and humidity from a success body
fn parse_current(body: &str) -> Result<WeatherReading, WeatherError> {
    let data: OWMCurrentResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Malformed(e.to_string()))?;
    let main = data
        .main
        .ok_or_else(|| WeatherError::Malformed("missing field `main`".to_string()))?;
    let temperature = main
        .temp
        .filter(|t| t.is_finite())
        .ok_or_else(|| WeatherError::Malformed("missing field `main.temp`".to_string()))?;
    let humidity = main
        .humidity
        .ok_or_else(|| WeatherError::Malformed("missing field `main.humidity`".to_string()))?;

    Ok(WeatherReading::new(temperature, humidity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current() {
        let body = r#"{"coord":{"lon":77.2,"lat":28.6},"main":{"temp":25.0,"feels_like":26.1,"humidity":80},"name":"Delhi"}"#;
        assert_eq!(parse_current(body).unwrap(), WeatherReading::new(25.0, 80));
    }

    #[test]
    fn test_parse_current_missing_fields() {
        assert!(matches!(
            parse_current(r#"{"main":{"temp":25.0}}"#),
            Err(WeatherError::Malformed(_))
        ));
        assert!(matches!(
            parse_current(r#"{"weather":[]}"#),
            Err(WeatherError::Malformed(_))
        ));
        assert!(matches!(
            parse_current(r#"{"main":{"temp":"warm","humidity":80}}"#),
            Err(WeatherError::Malformed(_))
        ));
        assert!(matches!(parse_current("<html>"), Err(WeatherError::Malformed(_))));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"cod":401,"message":"Invalid API key."}"#),
            "Invalid API key."
        );
        assert_eq!(error_message(r#"{"cod":"500"}"#), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message("Bad Gateway"), DEFAULT_ERROR_MESSAGE);
    }
}
