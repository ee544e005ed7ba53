//! Application Configuration
//! Optional JSON settings file with defaults for every field.

use crate::stats::{Alpha, AlphaError, TTestVariant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing to an explicit config file.
pub const CONFIG_ENV_VAR: &str = "STAT_EXPLORER_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "stat_explorer.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid default_alpha: {0}")]
    Alpha(#[from] AlphaError),
    #[error("infer_schema_length must be at least 1")]
    SchemaLength,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial position of the alpha slider.
    pub default_alpha: f64,
    /// Rows scanned to infer the CSV schema.
    pub infer_schema_length: usize,
    pub t_test_variant: TTestVariant,
    pub window_width: f32,
    pub window_height: f32,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_alpha: Alpha::DEFAULT,
            infer_schema_length: 10_000,
            t_test_variant: TTestVariant::default(),
            window_width: 1200.0,
            window_height: 800.0,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load config from `STAT_EXPLORER_CONFIG`, then `./stat_explorer.json`,
    /// falling back to defaults when neither exists.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_path(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            Self::from_path(local)
        } else {
            Ok(Self::default())
        }
    }

    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|err| match err {
            ConfigError::Json { source, .. } => ConfigError::Json {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Alpha::new(self.default_alpha)?;
        if self.infer_schema_length == 0 {
            return Err(ConfigError::SchemaLength);
        }
        Ok(())
    }

    /// Validated starting alpha.
    pub fn alpha(&self) -> Alpha {
        Alpha::new(self.default_alpha).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alpha().value(), 0.05);
        assert_eq!(config.t_test_variant, TTestVariant::Student);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "default_alpha": 0.1, "t_test_variant": "welch" }"#)
            .unwrap();
        assert_eq!(config.default_alpha, 0.1);
        assert_eq!(config.t_test_variant, TTestVariant::Welch);
        assert_eq!(config.infer_schema_length, 10_000);
    }

    #[test]
    fn test_out_of_range_alpha_rejected() {
        let err = AppConfig::from_json(r#"{ "default_alpha": 0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Alpha(_)));
    }

    #[test]
    fn test_zero_schema_length_rejected() {
        let err = AppConfig::from_json(r#"{ "infer_schema_length": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaLength));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(ConfigError::Json { .. })
        ));
    }
}
