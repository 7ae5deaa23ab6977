//! Unified error handling for ClearFlow services
//!
//! One error enum shared by the quality engine, the HTTP service and the
//! operator CLI. Every variant knows its HTTP status, a stable error code and
//! the category it belongs to.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// ErrorInfo - API error response type
// ============================================================================

/// Standard error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (HTTP status or custom)
    pub code: u16,
    /// Error message
    pub message: String,
    /// Field-specific errors for validation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, Vec<String>>,
}

impl ErrorInfo {
    /// Create a new ErrorInfo with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Add a field error
    pub fn add_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(error.into());
        self
    }
}

// ============================================================================
// ClearFlowError - Main error type
// ============================================================================

/// Main error type for all ClearFlow crates
#[derive(Debug, Error)]
pub enum ClearFlowError {
    // ======================================
    // Configuration Errors
    // ======================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // ======================================
    // Ingestion Errors
    // ======================================
    /// A submitted sensor value was missing or not a finite number.
    /// `message` is the caller-facing text, e.g. "Invalid pH value".
    #[error("{message}")]
    InvalidReading {
        quantity: String,
        message: String,
        reason: String,
    },

    // ======================================
    // Communication Errors (client side)
    // ======================================
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Unexpected response from {endpoint}: HTTP {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },
}

/// Result type alias using ClearFlowError
pub type ClearFlowResult<T> = Result<T, ClearFlowError>;

impl ClearFlowError {
    /// Build an ingestion rejection for one measured quantity
    pub fn invalid_reading(
        quantity: impl Into<String>,
        message: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidReading {
            quantity: quantity.into(),
            message: message.into(),
            reason: reason.into(),
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidReading { .. } => 400,

            // 502 Bad Gateway
            Self::HttpClient(_) | Self::UnexpectedStatus { .. } => 502,

            // 500 Internal Server Error
            Self::Configuration(_) | Self::InvalidConfig { .. } => 500,
        }
    }

    /// Get a stable error code for logs and API bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::InvalidReading { .. } => "INVALID_READING",
            Self::HttpClient(_) => "HTTP_CLIENT_ERROR",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
        }
    }

    /// Get error category (for classification and log level selection)
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::InvalidConfig { .. } => ErrorCategory::Configuration,
            Self::InvalidReading { .. } => ErrorCategory::Validation,
            Self::HttpClient(_) | Self::UnexpectedStatus { .. } => ErrorCategory::Network,
        }
    }

    /// Transport failures are worth another attempt on the next tick
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network)
    }

    /// Get log level
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;
        match self.category() {
            ErrorCategory::Configuration => Level::ERROR,
            ErrorCategory::Network => Level::WARN,
            ErrorCategory::Validation => Level::INFO,
        }
    }

    /// Convert to API ErrorInfo for HTTP responses
    pub fn to_error_info(&self) -> ErrorInfo {
        let error_info = ErrorInfo::new(self.to_string()).with_code(self.status_code());

        match self {
            Self::InvalidReading {
                quantity, reason, ..
            } => error_info.add_field_error(quantity, reason),
            Self::InvalidConfig { field, reason } => error_info.add_field_error(field, reason),
            _ => error_info,
        }
    }
}

/// Error category enum - used for classification and log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Network,
}

#[cfg(feature = "axum-support")]
impl ClearFlowError {
    /// Convert to axum HTTP status code
    pub fn http_status(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}
