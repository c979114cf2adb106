//! Route definitions for the Crop Recommendation API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Served with and without the trailing slash
        .route("/recommend_crop/", post(handlers::recommend_crop))
        .route("/recommend_crop", post(handlers::recommend_crop))
}
