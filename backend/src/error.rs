//! Error handling for the Crop Recommendation API
//!
//! Every failure on the request path ends up here and is rendered as
//! `{"code": ..., "detail": ...}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use shared::{ClassifierError, ValidationError};

use crate::external::WeatherError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Missing parameters: {}", fields.join(", "))]
    MissingParameters { fields: Vec<&'static str> },

    #[error("Invalid parameter {field}: {message}")]
    InvalidParameter { field: String, message: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // External service errors
    #[error("Weather service error ({status}): {message}")]
    WeatherService { status: u16, message: String },

    #[error("Malformed weather data: {0}")]
    WeatherDataMalformed(String),

    #[error("Weather service unavailable: {0}")]
    WeatherServiceUnavailable(String),

    // Model errors
    #[error("Prediction error: {0}")]
    Prediction(String),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl AppError {
    /// HTTP status for this error. Provider statuses pass through when they
    /// are error codes; anything else becomes 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameters { .. }
            | AppError::InvalidParameter { .. }
            | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::WeatherService { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::WeatherDataMalformed(_)
            | AppError::WeatherServiceUnavailable(_)
            | AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingParameters { .. } => "MISSING_PARAMETERS",
            AppError::InvalidParameter { .. } => "INVALID_PARAMETER",
            AppError::InvalidBody(_) => "INVALID_BODY",
            AppError::WeatherService { .. } => "WEATHER_SERVICE_ERROR",
            AppError::WeatherDataMalformed(_) => "WEATHER_DATA_MALFORMED",
            AppError::WeatherServiceUnavailable(_) => "WEATHER_SERVICE_UNAVAILABLE",
            AppError::Prediction(_) => "PREDICTION_ERROR",
        }
    }

    /// Client-facing message
    pub fn detail(&self) -> String {
        match self {
            AppError::MissingParameters { .. } => "Missing parameters".to_string(),
            AppError::InvalidParameter { field, message } => {
                format!("Invalid parameter {}: {}", field, message)
            }
            AppError::InvalidBody(msg) => format!("Invalid request body: {}", msg),
            AppError::WeatherService { message, .. } => message.clone(),
            AppError::WeatherDataMalformed(msg) => {
                format!("Prediction error: malformed weather data: {}", msg)
            }
            AppError::WeatherServiceUnavailable(msg)
            | AppError::Prediction(msg) => format!("Prediction error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            detail: self.detail(),
            fields: match &self {
                AppError::MissingParameters { fields } => {
                    Some(fields.iter().map(|f| f.to_string()).collect())
                }
                _ => None,
            },
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Error: {:?}", self);
        }

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingParameters { fields } => AppError::MissingParameters { fields },
            ValidationError::InvalidParameter { field, value } => AppError::InvalidParameter {
                field: field.to_string(),
                message: format!("expected a number, got {:?}", value),
            },
            ValidationError::OutOfRange { field, value } => AppError::InvalidParameter {
                field: field.to_string(),
                message: format!("{} is out of range", value),
            },
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Service { status, message } => AppError::WeatherService { status, message },
            WeatherError::Malformed(msg) => AppError::WeatherDataMalformed(msg),
            WeatherError::Transport(msg) => AppError::WeatherServiceUnavailable(msg),
        }
    }
}

impl From<ClassifierError> for AppError {
    fn from(err: ClassifierError) -> Self {
        AppError::Prediction(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
