//! Crop Recommendation API
//!
//! Serves crop recommendations from a trained random forest, enriching each
//! request's soil readings with live weather at the requested location.

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use shared::TrainedModel;

pub mod config;
pub mod dataset;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use external::{OpenWeatherClient, WeatherError, WeatherProvider};

/// Application state shared across handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model: Arc<TrainedModel>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(config: Config, model: TrainedModel, weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            config: Arc::new(config),
            model: Arc::new(model),
            weather,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured origins, with credentials
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
