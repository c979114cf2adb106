//! Crop Recommendation API - Backend Server
//!
//! Loads the trained model artifact once at startup and serves
//! recommendations over HTTP.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_recommendation_backend::{create_app, AppState, Config, OpenWeatherClient};
use shared::TrainedModel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crop_server=debug,crop_recommendation_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Crop Recommendation Server");
    tracing::info!("Environment: {}", config.environment);

    if config.weather.api_key.is_empty() {
        tracing::warn!("No weather API key configured; weather lookups will be rejected");
    }

    // Load the trained model
    tracing::info!("Loading model from {}", config.model.artifact_path);
    let model = TrainedModel::load(&config.model.artifact_path)
        .with_context(|| format!("failed to load model artifact {}", config.model.artifact_path))?;
    tracing::info!(
        classes = model.n_classes(),
        trained_at = %model.trained_at(),
        accuracy = model.evaluation().accuracy,
        "Model loaded"
    );

    let weather = OpenWeatherClient::from_config(&config.weather)?;
    tracing::info!("Weather provider: {}", weather.endpoint());

    // Create application state
    let host = config.server.host.clone();
    let port = config.server.port;
    let state = AppState::new(config, model, Arc::new(weather));

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", host, port))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
