//! Logging for ClearFlow services
//!
//! Console output is always on. File output is optional and rolls daily via
//! `tracing-appender`. The filter sits behind a reload layer so the level can
//! be changed at runtime with [`set_log_level`].

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Tracing target of the HTTP access log
pub const API_ACCESS_TARGET: &str = "api_access";

/// Custom format for log level with brackets: `[INFO]`, `[WARN]`, etc.
fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Event formatter producing `timestamp [LEVEL] message`
///
/// Example output: `2025-06-01T09:00:00.123Z [INFO] [pH] Received: 7.00`
struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.3fZ"))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m",
                Level::DEBUG => "\x1b[34m",
                Level::INFO => "\x1b[32m",
                Level::WARN => "\x1b[33m",
                Level::ERROR => "\x1b[31m",
            };
            write!(writer, "{}{}\x1b[0m ", color, format_level(&level))?;
        } else {
            write!(writer, "{} ", format_level(&level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

// File writer guard, held for the lifetime of the process
static FILE_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();

type EnvFilterReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;
static LOG_FILTER_HANDLE: OnceLock<EnvFilterReloadHandle> = OnceLock::new();
static CURRENT_LOG_LEVEL: OnceLock<Mutex<String>> = OnceLock::new();

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Service name, also the crate target that gets `debug` by default
    pub service_name: String,
    /// Directory for rolling log files
    pub log_dir: PathBuf,
    /// Write `{service}.log.YYYY-MM-DD` files under `log_dir`
    pub enable_file: bool,
    /// JSON lines in the log file instead of the bracketed format
    pub enable_json: bool,
    /// Level of the `api_access` target when the filter is derived
    pub api_log_level: Level,
    /// Explicit filter spec; wins over `RUST_LOG` and the default
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "clearflow".to_string(),
            log_dir: PathBuf::from("logs"),
            enable_file: false,
            enable_json: false,
            api_log_level: Level::INFO,
            filter: None,
        }
    }
}

/// Compose the filter spec from `RUST_LOG` (if any) and the service defaults
///
/// An explicit `api_access` directive in `RUST_LOG` is respected as-is.
pub fn build_filter_spec(service_name: &str, api_level: Level, rust_log: Option<&str>) -> String {
    let api_level = api_level.as_str().to_lowercase();
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(env) if env.contains(API_ACCESS_TARGET) => env.to_string(),
        Some(env) => format!("{},{}={}", env, API_ACCESS_TARGET, api_level),
        None => format!(
            "info,{}=debug,{}={}",
            service_name, API_ACCESS_TARGET, api_level
        ),
    }
}

/// Initialize the global subscriber
pub fn init_with_config(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_spec = match &config.filter {
        Some(spec) => spec.clone(),
        None => build_filter_spec(
            &config.service_name,
            config.api_log_level,
            std::env::var("RUST_LOG").ok().as_deref(),
        ),
    };
    let env_filter = EnvFilter::try_new(&filter_spec)?;

    let (reload_filter, reload_handle) = reload::Layer::new(env_filter);

    let console_layer = fmt::layer()
        .with_ansi(true)
        .event_format(BracketedLevelFormat)
        .boxed();

    let file_layer = if config.enable_file {
        fs::create_dir_all(&config.log_dir)?;
        let appender = tracing_appender::rolling::daily(
            &config.log_dir,
            format!("{}.log", config.service_name),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        let slot = FILE_GUARD.get_or_init(|| Mutex::new(None));
        match slot.lock() {
            Ok(mut slot) => *slot = Some(guard),
            Err(poisoned) => {
                eprintln!("Warning: FILE_GUARD lock was poisoned, recovering...");
                *poisoned.into_inner() = Some(guard);
            },
        }

        let layer = if config.enable_json {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .event_format(BracketedLevelFormat)
                .boxed()
        };
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(reload_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    let _ = LOG_FILTER_HANDLE.set(reload_handle);
    let current = CURRENT_LOG_LEVEL.get_or_init(|| Mutex::new(String::new()));
    if let Ok(mut slot) = current.lock() {
        *slot = filter_spec.clone();
    }

    if config.enable_file {
        tracing::info!("Logging: {} @ {:?}", config.service_name, config.log_dir);
    }
    tracing::debug!("Log filter: {}", filter_spec);

    Ok(())
}

/// Dynamically set the log filter at runtime
///
/// Accepts a bare level (`"debug"`) or a full filter spec
/// (`"info,wqsrv=trace"`).
pub fn set_log_level(level: &str) -> Result<(), String> {
    let handle = LOG_FILTER_HANDLE
        .get()
        .ok_or("Logging not initialized with reload support")?;

    let new_filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    handle
        .reload(new_filter)
        .map_err(|e| format!("Failed to reload log filter: {}", e))?;

    if let Some(current) = CURRENT_LOG_LEVEL.get() {
        if let Ok(mut guard) = current.lock() {
            *guard = level.to_string();
        }
    }

    tracing::info!("Log level changed to: {}", level);
    Ok(())
}

/// Current log filter spec, `"unknown"` before initialization
pub fn get_log_level() -> String {
    CURRENT_LOG_LEVEL
        .get()
        .and_then(|m| m.lock().ok())
        .map(|guard| guard.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Cut a body to `max_len` bytes on a char boundary, noting what was dropped
fn truncate_body(body: &str, max_len: usize) -> String {
    if body.len() <= max_len {
        return body.to_string();
    }
    let mut end = max_len;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}[truncated {} bytes]", &body[..end], body.len() - end)
}

fn is_modifying(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH" | "DELETE")
}

/// HTTP access logging middleware
///
/// Writes events to the `api_access` target:
/// - INFO: every POST/PUT/PATCH/DELETE with method, path, status and duration
/// - DEBUG: every request, plus the JSON body of writes (truncated to 500 chars)
///
/// Add it to the router before `.with_state()`:
/// ```rust,ignore
/// let app = Router::new()
///     // ... routes ...
///     .layer(axum::middleware::from_fn(common::logging::http_request_logger))
///     .with_state(state);
/// ```
#[cfg(feature = "axum")]
pub async fn http_request_logger(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    use axum::body::Body;
    use std::time::Instant;
    use tracing::{debug, info, level_enabled};

    const MAX_BODY_LENGTH: usize = 500;

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_json = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let start = Instant::now();

    let should_read_body =
        level_enabled!(Level::DEBUG) && is_modifying(method.as_str()) && is_json;

    let (req, body_str) = if should_read_body {
        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Failed to read request body: {}", e);
                let new_req = axum::extract::Request::from_parts(parts, Body::empty());
                return next.run(new_req).await;
            },
        };
        let body_str = match std::str::from_utf8(&bytes) {
            Ok(s) => truncate_body(s, MAX_BODY_LENGTH),
            Err(_) => "<binary data>".to_string(),
        };
        (
            axum::extract::Request::from_parts(parts, Body::from(bytes)),
            Some(body_str),
        )
    } else {
        (req, None)
    };

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match body_str {
        Some(body) => debug!(
            target: "api_access",
            method = %method,
            path = %path,
            status = %status,
            duration_ms = %duration_ms,
            request_body = %body,
            "HTTP request (detailed)"
        ),
        None if is_modifying(method.as_str()) => info!(
            target: "api_access",
            method = %method,
            path = %path,
            status = %status,
            duration_ms = %duration_ms,
            "HTTP request"
        ),
        None => debug!(
            target: "api_access",
            method = %method,
            path = %path,
            status = %status,
            duration_ms = %duration_ms,
            "HTTP request"
        ),
    }

    response
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_spec() {
        assert_eq!(
            build_filter_spec("wqsrv", Level::INFO, None),
            "info,wqsrv=debug,api_access=info"
        );
        assert_eq!(
            build_filter_spec("wqsrv", Level::INFO, Some("  ")),
            "info,wqsrv=debug,api_access=info"
        );
    }

    #[test]
    fn test_rust_log_is_extended_with_api_access() {
        assert_eq!(
            build_filter_spec("wqsrv", Level::WARN, Some("debug")),
            "debug,api_access=warn"
        );
    }

    #[test]
    fn test_explicit_api_access_directive_is_kept() {
        assert_eq!(
            build_filter_spec("wqsrv", Level::INFO, Some("info,api_access=off")),
            "info,api_access=off"
        );
    }

    #[test]
    fn test_filter_specs_parse() {
        let spec = build_filter_spec("wqsrv", Level::DEBUG, None);
        assert!(EnvFilter::try_new(spec).is_ok());
    }

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(&Level::INFO), "[INFO]");
        assert_eq!(format_level(&Level::ERROR), "[ERROR]");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("{\"ph\":7}", 500), "{\"ph\":7}");
        let long = "a".repeat(510);
        let cut = truncate_body(&long, 500);
        assert!(cut.ends_with("[truncated 10 bytes]"));
        // Never splits a multi-byte char
        let cut = truncate_body("ééé", 3);
        assert!(cut.starts_with('é'));
    }

    #[test]
    fn test_set_log_level_requires_init() {
        assert!(set_log_level("debug").is_err());
        assert_eq!(get_log_level(), "unknown");
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn test_request_logger_passes_body_through() {
        use axum::{body::Body, http::Request, routing::post, Router};
        use tower::ServiceExt;

        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(axum::middleware::from_fn(http_request_logger));

        let response = app
            .oneshot(
                Request::post("/echo")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"ph\":7.1}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"{\"ph\":7.1}");
    }
}
