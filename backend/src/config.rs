//! Configuration management for the Crop Recommendation service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with CROP__ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Trained model artifact
    pub model: ModelConfig,

    /// Cross-origin policy
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Current-weather endpoint of an OpenWeatherMap-compatible provider
    pub api_endpoint: String,

    /// Provider API key (`appid`)
    pub api_key: String,

    /// Unit system requested from the provider
    pub units: String,

    /// Request timeout; the HTTP client default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl WeatherConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Path of the JSON artifact written by `crop-train`
    pub artifact_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP__ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", DEFAULT_WEATHER_ENDPOINT)?
            .set_default("weather.api_key", "")?
            .set_default("weather.units", "metric")?
            .set_default("model.artifact_path", "artifacts/crop_model.json")?
            .set_default(
                "cors.allowed_origins",
                CorsConfig::default().allowed_origins,
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP__ prefix)
            .add_source(
                Environment::with_prefix("CROP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_WEATHER_ENDPOINT.to_string(),
            api_key: String::new(),
            units: "metric".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost.tiangolo.com".to_string(),
                "https://localhost.tiangolo.com".to_string(),
                "http://localhost".to_string(),
                "http://localhost:5174".to_string(),
            ],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            model: ModelConfig {
                artifact_path: "artifacts/crop_model.json".to_string(),
            },
            cors: CorsConfig::default(),
        }
    }
}
