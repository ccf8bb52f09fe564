//! Structured logging for Veritas.
//!
//! The extractors emit `tracing` events; this module installs a
//! `tracing-subscriber` registry that renders them as JSON lines or in a
//! human-readable form.
//!
//! # Example
//!
//! ```rust,ignore
//! use veritas_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::debug!(extraction_source = "query", key_count = 2, "normalized parameters");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "veritas_extract=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name attached to the initialization event.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            file_line_info: true,
            include_target: true,
            service_name: "veritas".to_string(),
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
            service_name: "veritas".to_string(),
        }
    }

    /// Checks that the configuration can be used to initialize logging.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` for an unusable filter or an
    /// empty service name.
    pub fn validate(&self) -> TelemetryResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(TelemetryError::InvalidConfig(
                "service_name must not be empty".to_string(),
            ));
        }
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| TelemetryError::InvalidConfig(format!("level '{}': {e}", self.level)))
    }
}

/// Initializes the global logging subscriber.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a
/// global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::debug!(service.name = %config.service_name, "logging initialized");
    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}

/// Field names carried by the extraction log events, for filtering and
/// querying collected logs.
pub mod fields {
    /// Where parameters came from: `query`, `form` or `route`.
    pub const EXTRACTION_SOURCE: &str = "extraction_source";

    /// Number of distinct keys after normalization.
    pub const KEY_COUNT: &str = "key_count";

    /// Number of schema issues on a failed validation.
    pub const ISSUE_COUNT: &str = "issue_count";

    /// Error on a failed form body read.
    pub const ERROR: &str = "error";

    /// Service name, recorded when logging is initialized.
    pub const SERVICE_NAME: &str = "service.name";
}
