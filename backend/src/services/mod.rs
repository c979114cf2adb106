//! Business logic services for the Crop Recommendation API

pub mod recommendation;

pub use recommendation::RecommendationService;
