//! Extraction configuration.
//!
//! Only the form body reader has tunables: how large a body it will buffer,
//! how many fields it accepts and how large a single multipart field may be.
//! [`ExtractConfig`] bundles these with the logging settings so an
//! application can load both from one file (see [`ConfigLoader`]).
//!
//! ```toml
//! [form]
//! max_body_size = 2097152
//! max_fields = 50
//!
//! [logging]
//! level = "veritas_extract=debug"
//! json_format = false
//! ```
//!
//! [`ConfigLoader`]: crate::ConfigLoader

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use veritas_telemetry::{LogConfig, TelemetryError};

/// Default maximum form body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default maximum number of form fields.
pub const DEFAULT_MAX_FIELDS: usize = 100;

/// Default maximum size of one multipart field (64 KiB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 64 * 1024;

/// Limits applied while reading a form body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Maximum number of fields, text and file parts together.
    pub max_fields: usize,
    /// Maximum size of a single multipart field in bytes.
    pub max_field_size: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
        }
    }
}

impl FormConfig {
    /// Sets the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Sets the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }

    /// Sets the maximum size of a single multipart field.
    #[must_use]
    pub fn max_field_size(mut self, bytes: usize) -> Self {
        self.max_field_size = bytes;
        self
    }

    /// Validates the limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero limit or a field limit
    /// above the body limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("form.max_body_size", self.max_body_size),
            ("form.max_fields", self.max_fields),
            ("form.max_field_size", self.max_field_size),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid_value(field, "must be greater than 0"));
            }
        }
        if self.max_field_size > self.max_body_size {
            return Err(ConfigError::invalid_value(
                "form.max_field_size",
                "must not exceed form.max_body_size",
            ));
        }
        Ok(())
    }
}

/// Complete extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Form body limits.
    pub form: FormConfig,
    /// Logging settings.
    pub logging: LogConfig,
}

impl ExtractConfig {
    /// Development preset: default limits, pretty debug logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            form: FormConfig::default(),
            logging: LogConfig::development(),
        }
    }

    /// Production preset: default limits, JSON logging at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            form: FormConfig::default(),
            logging: LogConfig::production(),
        }
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.form.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported file or string format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// Invalid logging settings.
    #[error(transparent)]
    Logging(#[from] TelemetryError),
}

impl ConfigError {
    pub(crate) fn file_not_found(path: &Path) -> Self {
        Self::FileNotFound {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn read_error(path: &Path, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert_eq!(config.max_fields, 100);
        assert_eq!(config.max_field_size, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_form_builder() {
        let config = FormConfig::default()
            .max_body_size(512)
            .max_fields(3)
            .max_field_size(128);
        assert_eq!(config.max_body_size, 512);
        assert_eq!(config.max_fields, 3);
        assert_eq!(config.max_field_size, 128);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = FormConfig::default().max_fields(0).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration value for form.max_fields: must be greater than 0"
        );
    }

    #[test]
    fn test_field_limit_above_body_limit_rejected() {
        let err = FormConfig::default()
            .max_body_size(100)
            .max_field_size(200)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "form.max_field_size"));
    }

    #[test]
    fn test_extract_config_partial_toml() {
        let config: ExtractConfig = toml::from_str(
            r#"
            [form]
            max_fields = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.form.max_fields, 10);
        assert_eq!(config.form.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ExtractConfig, _> = toml::from_str("[form]\nmax_feilds = 10\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_presets() {
        assert!(!ExtractConfig::development().logging.json_format);
        assert!(ExtractConfig::production().logging.json_format);
        assert!(ExtractConfig::development().validate().is_ok());
    }

    #[test]
    fn test_invalid_logging_surfaces() {
        let mut config = ExtractConfig::default();
        config.logging.service_name = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Logging(_))));
    }
}
