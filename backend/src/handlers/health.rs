//! Health check handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of crops the loaded model can recommend
    pub classes: usize,
    pub trained_at: DateTime<Utc>,
}

/// Root endpoint
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Crop Recommendation API".to_string(),
    })
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        classes: state.model.n_classes(),
        trained_at: state.model.trained_at(),
    })
}
