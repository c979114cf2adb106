//! HTTP handlers

pub mod health;
pub mod recommendation;

pub use health::{health_check, root};
pub use recommendation::recommend_crop;
