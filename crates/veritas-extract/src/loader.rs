//! Layered configuration loading.
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults
//! 2. A TOML or JSON file (or string)
//! 3. Environment variables `PREFIX__SECTION__KEY`

use crate::config::{ConfigError, ExtractConfig};
use std::env;
use std::fs;
use std::path::Path;

/// Loads an [`ExtractConfig`] from files, strings and the environment.
///
/// # Example
///
/// ```
/// use veritas_extract::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_string("[form]\nmax_fields = 20\n", "toml")
///     .unwrap()
///     .load()
///     .unwrap();
///
/// assert_eq!(config.form.max_fields, 20);
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: ExtractConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader starting from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = ExtractConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = ExtractConfig::production();
        self
    }

    /// Loads a `.toml` or `.json` file, chosen by extension.
    ///
    /// Keys missing from the file keep their default values.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        self.config = match extension.as_deref() {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat(
                    path.display().to_string(),
                ))
            }
        };
        Ok(self)
    }

    /// Loads a file if it exists; otherwise keeps the current configuration.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in `toml` or `json` format.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        Ok(self)
    }

    /// Enables environment overrides with the given prefix.
    ///
    /// With prefix `VERITAS`:
    /// - `VERITAS__FORM__MAX_BODY_SIZE=2097152`
    /// - `VERITAS__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides and validates the result.
    pub fn load(mut self) -> Result<ExtractConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_vars(&prefix, env::vars())?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> ExtractConfig {
        self.config
    }

    fn apply_env_vars(
        &mut self,
        prefix: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(rest) = key.strip_prefix(&marker) {
                self.apply_env_var(&key, rest, &value)?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, path: &str, value: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = path.split("__").collect();

        match parts.as_slice() {
            ["FORM", "MAX_BODY_SIZE"] => {
                self.config.form.max_body_size = parse_usize(key, value)?;
            }
            ["FORM", "MAX_FIELDS"] => {
                self.config.form.max_fields = parse_usize(key, value)?;
            }
            ["FORM", "MAX_FIELD_SIZE"] => {
                self.config.form.max_field_size = parse_usize(key, value)?;
            }
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(key, value)?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "JSON_FORMAT"] => {
                self.config.logging.json_format = parse_bool(key, value)?;
            }
            ["LOGGING", "FILE_LINE_INFO"] => {
                self.config.logging.file_line_info = parse_bool(key, value)?;
            }
            ["LOGGING", "INCLUDE_TARGET"] => {
                self.config.logging.include_target = parse_bool(key, value)?;
            }
            ["LOGGING", "SERVICE_NAME"] => {
                self.config.logging.service_name = value.to_string();
            }
            _ => {
                return Err(ConfigError::env_parse_error(key, "unknown configuration key"));
            }
        }
        Ok(())
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env_parse_error(key, "expected boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, ExtractConfig::default());
    }

    #[test]
    fn test_presets() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.level, "debug");

        let config = ConfigLoader::new().with_production().load().unwrap();
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_with_string_json() {
        let config = ConfigLoader::new()
            .with_string(r#"{"form": {"max_body_size": 4096, "max_field_size": 1024}}"#, "JSON")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.form.max_body_size, 4096);
        assert_eq!(config.form.max_field_size, 1024);
    }

    #[test]
    fn test_with_string_unsupported_format() {
        let err = ConfigLoader::new().with_string("", "yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref f) if f == "yaml"));
    }

    #[test]
    fn test_with_string_invalid_toml() {
        let err = ConfigLoader::new().with_string("[form", "toml").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[form]\nmax_fields = 7").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.form.max_fields, 7);
    }

    #[test]
    fn test_with_file_missing() {
        let err = ConfigLoader::new()
            .with_file("/nonexistent/veritas.toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_with_file_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_with_optional_file_missing() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/veritas.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, ExtractConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_vars(
                "VERITAS",
                vars(&[
                    ("VERITAS__FORM__MAX_BODY_SIZE", "2048"),
                    ("VERITAS__FORM__MAX_FIELD_SIZE", "512"),
                    ("VERITAS__LOGGING__LEVEL", "warn"),
                    ("VERITAS__LOGGING__JSON_FORMAT", "off"),
                    ("OTHER__FORM__MAX_FIELDS", "1"),
                ]),
            )
            .unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.form.max_body_size, 2048);
        assert_eq!(config.form.max_field_size, 512);
        assert_eq!(config.form.max_fields, 100);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json_format);
    }

    #[test]
    fn test_env_invalid_integer() {
        let mut loader = ConfigLoader::new();
        let err = loader
            .apply_env_vars("VERITAS", vars(&[("VERITAS__FORM__MAX_FIELDS", "many")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to parse environment variable VERITAS__FORM__MAX_FIELDS: expected integer"
        );
    }

    #[test]
    fn test_env_unknown_key() {
        let mut loader = ConfigLoader::new();
        let err = loader
            .apply_env_vars("VERITAS", vars(&[("VERITAS__FORM__COLOR", "red")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));
    }

    #[test]
    fn test_load_validates() {
        let err = ConfigLoader::new()
            .with_string("[form]\nmax_body_size = 0\n", "toml")
            .unwrap()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string("[form]\nmax_body_size = 0\n", "toml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.form.max_body_size, 0);
    }
}
