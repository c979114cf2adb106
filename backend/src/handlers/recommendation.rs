//! HTTP handler for crop recommendations

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use shared::{RecommendationRequest, RecommendationResponse};

use crate::error::AppResult;
use crate::services::RecommendationService;
use crate::AppState;

/// Recommend a crop from soil readings and live weather at the location
pub async fn recommend_crop(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;
    let service = RecommendationService::new(state.model.clone(), state.weather.clone());
    let response = service.recommend(&request).await?;
    Ok(Json(response))
}
