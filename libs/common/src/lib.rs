//! ClearFlow common library
//!
//! Plumbing shared by the water-quality service and the operator CLI:
//! - logging initialization and the HTTP access logger
//! - API response types and `AppError`
//! - service banner and port resolution
//! - shutdown signal handling

pub mod api_types;
pub mod logging;
pub mod service_bootstrap;
pub mod shutdown;

pub use api_types::{ApiMessage, HealthResponse};

#[cfg(feature = "axum")]
pub use api_types::AppError;

pub use errors::{ClearFlowError, ClearFlowResult, ErrorInfo};

// Re-export common dependencies
pub use anyhow;
pub use serde_json;
pub use tokio;
