//! Shared types and models for the Crop Recommendation service
//!
//! This crate holds everything that does not need a network: request and
//! response models, request validation, feature assembly, the label registry,
//! the random forest classifier, training and the model artifact. The backend
//! crate serves it over HTTP.

pub mod artifact;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod features;
pub mod models;
pub mod registry;
pub mod training;
pub mod types;
pub mod validation;

pub use artifact::*;
pub use error::*;
pub use features::*;
pub use models::*;
pub use registry::*;
pub use types::*;
pub use validation::*;
