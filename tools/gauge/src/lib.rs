//! gauge - operator CLI for the ClearFlow water-quality service

pub mod client;
pub mod render;
pub mod sender;
pub mod watch;

pub use client::GaugeClient;
pub use watch::{poll_once, Poller};

/// Default service address, matching wqsrv's default port
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
/// Default poll and send period
pub const DEFAULT_INTERVAL_MS: u64 = 3000;
