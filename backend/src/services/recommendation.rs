//! Crop recommendation pipeline
//!
//! validate -> fetch weather -> assemble features -> predict -> resolve.
//! Any failure short-circuits; nothing is retried.

use std::sync::Arc;

use shared::{
    assemble, validate_recommendation_request, ClassId, CropDescriptor, RecommendationRequest,
    RecommendationResponse, TrainedModel,
};

use crate::error::AppResult;
use crate::external::WeatherProvider;

/// Recommendation service over a loaded model and a weather provider
#[derive(Clone)]
pub struct RecommendationService {
    model: Arc<TrainedModel>,
    weather: Arc<dyn WeatherProvider>,
}

impl RecommendationService {
    pub fn new(model: Arc<TrainedModel>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { model, weather }
    }

    /// Recommend a crop for the given soil readings and location
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<RecommendationResponse> {
        let input = validate_recommendation_request(request)?;

        let weather = self
            .weather
            .fetch(input.location.latitude, input.location.longitude)
            .await?;

        let features = assemble(&input, &weather);
        let class_id = self.model.predict(&features)?;
        let crop = self.resolve(class_id);

        tracing::info!(
            crop = %crop.name,
            class_id,
            temperature = weather.temperature,
            humidity = weather.humidity,
            "Recommended crop"
        );

        Ok(RecommendationResponse::new(crop, weather, &input))
    }

    /// Display metadata for a predicted class, or the sentinel descriptor
    pub fn resolve(&self, class_id: ClassId) -> CropDescriptor {
        match self.model.lookup(class_id) {
            Some(crop) => crop,
            None => {
                let label = self.model.registry().decode(class_id);
                tracing::warn!(class_id, ?label, "No display metadata for predicted class");
                CropDescriptor::unknown()
            }
        }
    }
}
