//! wqsrv configuration
//!
//! Layering, lowest to highest: built-in defaults, the YAML file,
//! `WQSRV_`-prefixed environment variables (nested keys split on `__`),
//! then command-line flags applied by the binary.

use errors::{ClearFlowError, ClearFlowResult};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/wqsrv.yaml";
pub const ENV_PREFIX: &str = "WQSRV_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    pub name: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: crate::SERVICE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Built dashboard served for paths no route matches
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_PORT,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter spec; `RUST_LOG` and the service default apply when unset
    #[serde(default)]
    pub level: Option<String>,
    pub dir: PathBuf,
    pub enable_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            dir: PathBuf::from("logs"),
            enable_file: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults, then the YAML file (if present), then environment
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: impl AsRef<Path>) -> ClearFlowResult<Self> {
        Self::figment(path)
            .extract()
            .map_err(|e| ClearFlowError::Configuration(format!("Failed to load configuration: {}", e)))
    }

    /// Apply command-line overrides
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        log_level: Option<String>,
    ) {
        if let Some(host) = host {
            self.api.host = host;
        }
        if let Some(port) = port {
            self.api.port = port;
        }
        if let Some(level) = log_level {
            self.logging.level = Some(level);
        }
    }

    pub fn validate(&self) -> ClearFlowResult<()> {
        if self.service.name.trim().is_empty() {
            return Err(ClearFlowError::InvalidConfig {
                field: "service.name".to_string(),
                reason: "Service name cannot be empty".to_string(),
            });
        }
        if self.api.host.trim().is_empty() {
            return Err(ClearFlowError::InvalidConfig {
                field: "api.host".to_string(),
                reason: "Listen host cannot be empty".to_string(),
            });
        }
        if self.api.port == 0 {
            return Err(ClearFlowError::InvalidConfig {
                field: "api.port".to_string(),
                reason: "Listen port must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.service.name, "wqsrv");
        assert!(!config.logging.enable_file);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api:\n  port: 9100\nlogging:\n  level: debug\n  dir: /tmp/wq\n  enable_file: true"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9100);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.logging.enable_file);
    }

    #[test]
    fn test_malformed_yaml_is_a_configuration_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "api:\n  port: not-a-port").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ClearFlowError::Configuration(_)));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("127.0.0.1".into()), Some(3000), None);
        assert_eq!(config.listen_addr(), "127.0.0.1:3000");
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.api.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ClearFlowError::InvalidConfig { ref field, .. }) if field == "api.port"
        ));

        let mut config = Config::default();
        config.api.host = " ".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.service.name.clear();
        assert!(config.validate().is_err());
    }
}
