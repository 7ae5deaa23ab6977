//! Shared API response types
//!
//! Bodies are kept flat: success answers carry `{ message }` and errors
//! carry `{ code, message, ... }`, which is what device senders expect.

use serde::{Deserialize, Serialize};

pub use errors::ErrorInfo;

/// Plain acknowledgement body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.into(),
            version: version.into(),
        }
    }
}

// ============================================================================
// AppError - HTTP Error with proper status codes (requires axum feature)
// ============================================================================

#[cfg(feature = "axum")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// Application error with HTTP status code
/// This type implements IntoResponse for seamless integration with axum handlers
#[cfg(feature = "axum")]
#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub error: ErrorInfo,
}

#[cfg(feature = "axum")]
impl AppError {
    pub fn new(status: StatusCode, error: ErrorInfo) -> Self {
        Self { status, error }
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorInfo::new(message).with_code(404))
    }
}

#[cfg(feature = "axum")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

#[cfg(feature = "axum")]
impl From<errors::ClearFlowError> for AppError {
    fn from(err: errors::ClearFlowError) -> Self {
        match err.log_level() {
            tracing::Level::ERROR => tracing::error!("{} ({})", err, err.error_code()),
            tracing::Level::WARN => tracing::warn!("{} ({})", err, err.error_code()),
            _ => tracing::debug!("{} ({})", err, err.error_code()),
        }
        Self::new(err.http_status(), err.to_error_info())
    }
}
