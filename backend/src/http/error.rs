//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::BoundingBoxParseError;
use crate::services::dashboard::SettingsError;
use crate::services::{GeocodeError, GeolocationError};

/// API error response body.
///
/// Shaped like a failure envelope so clients can always branch on `success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            error: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (caller-input fault)
    BadRequest(String),
    /// Caller is searching too often
    TooManyRequests(String),
    /// A third-party service failed
    BadGateway(String),
    /// A third-party service timed out
    GatewayTimeout(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::TooManyRequests(msg) => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiError::new("RATE_LIMITED", msg),
            ),
            AppError::BadGateway(msg) => {
                (StatusCode::BAD_GATEWAY, ApiError::new("UPSTREAM_ERROR", msg))
            }
            AppError::GatewayTimeout(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                ApiError::new("UPSTREAM_TIMEOUT", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<BoundingBoxParseError> for AppError {
    fn from(err: BoundingBoxParseError) -> Self {
        AppError::BadRequest(format!("Invalid bbox: {}", err))
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<GeolocationError> for AppError {
    fn from(err: GeolocationError) -> Self {
        match err {
            GeolocationError::Timeout => AppError::GatewayTimeout(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(err: GeocodeError) -> Self {
        let msg = err.to_string();
        match err {
            GeocodeError::EmptyQuery => AppError::BadRequest(msg),
            GeocodeError::RateLimited => AppError::TooManyRequests(msg),
            GeocodeError::NotFound => AppError::NotFound(msg),
            GeocodeError::Timeout => AppError::GatewayTimeout(msg),
            GeocodeError::Transport(_) | GeocodeError::Decode(_) => AppError::BadGateway(msg),
        }
    }
}
