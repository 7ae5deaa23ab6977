//! wqsrv - water-quality ingestion and classification service
//!
//! Devices post pH and turbidity readings; dashboards poll the latest
//! values, the combined snapshot and the server-side assessment.

pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::AppState;
pub use config::Config;
pub use routes::create_router;

pub const SERVICE_NAME: &str = "wqsrv";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_PORT: u16 = 8080;
