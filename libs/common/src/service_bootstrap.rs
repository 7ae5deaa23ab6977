//! Service bootstrap utilities
//!
//! Startup banner, logging initialization and listen-port resolution for
//! ClearFlow services.

use crate::logging::{self, LogConfig};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

/// Environment variable overriding the log directory for every service
pub const LOG_DIR_ENV: &str = "CLEARFLOW_LOG_DIR";

/// Service metadata for startup
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// Service name (e.g., "wqsrv")
    pub name: String,
    /// Version of the service binary
    pub version: String,
    pub description: String,
    pub default_port: u16,
}

impl ServiceInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>, default_port: u16) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: description.into(),
            default_port,
        }
    }

    /// Report the calling crate's version instead of this library's
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

const BANNER: &str = r#"
   ____ _                 _____ _
  / ___| | ___  __ _ _ __|  ___| | _____      __
 | |   | |/ _ \/ _` | '__| |_  | |/ _ \ \ /\ / /
 | |___| |  __/ (_| | |  |  _| | | (_) \ V  V /
  \____|_|\___|\__,_|_|  |_|   |_|\___/ \_/\_/
"#;

/// Print the startup banner
pub fn print_startup_banner(service: &ServiceInfo) {
    info!("{}", BANNER);
    info!(" {} v{}", service.name.to_uppercase(), service.version);
    info!(" {}", service.description);
    info!(" Default Port: {}", service.default_port);
    info!("");
}

/// Pick the log directory: `CLEARFLOW_LOG_DIR` env > configured dir > `logs`
pub fn resolve_log_dir(configured: Option<&Path>, env_value: Option<String>) -> PathBuf {
    env_value
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize logging for a service
///
/// `filter` overrides `RUST_LOG` and the service default when given.
pub fn init_logging(
    service: &ServiceInfo,
    log_dir: Option<&Path>,
    enable_file: bool,
    filter: Option<String>,
) -> anyhow::Result<()> {
    let log_dir = resolve_log_dir(log_dir, std::env::var(LOG_DIR_ENV).ok());

    let log_config = LogConfig {
        service_name: service.name.clone(),
        log_dir,
        enable_file,
        enable_json: false,
        api_log_level: Level::INFO,
        filter,
    };

    logging::init_with_config(log_config).map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

/// Resolve the listen port
///
/// A configured non-default port wins. Otherwise the legacy `PORT`
/// variable is honoured, then the default.
pub fn resolve_port(config_port: u16, service: &ServiceInfo, env_port: Option<String>) -> u16 {
    let is_default = config_port == 0 || config_port == service.default_port;

    if is_default {
        if let Some(p) = env_port.and_then(|v| v.trim().parse::<u16>().ok()) {
            if p > 0 {
                return p;
            }
        }
    }

    if config_port > 0 {
        config_port
    } else {
        service.default_port
    }
}

/// [`resolve_port`] reading `PORT` from the environment
pub fn get_service_port(config_port: u16, service: &ServiceInfo) -> u16 {
    resolve_port(config_port, service, std::env::var("PORT").ok())
}
