//! Configuration types.

use palladio_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Root configuration.
///
/// Unknown fields are rejected so that typos surface at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PalladioConfig {
    /// Request-body validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PalladioConfig {
    /// Debug-level, human-readable logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            validation: ValidationConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ..LoggingConfig::default()
            },
        }
    }

    /// Info-level JSON logging.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.default_backend.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "validation.default_backend",
                "must not be empty",
            ));
        }

        if self.logging.enabled {
            palladio_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }
}

/// Validation section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Backend used by validation hooks that name none.
    pub default_backend: String,

    /// Whether compiled validators are cached and shared between routes.
    pub cache_compiled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            default_backend: "jsonschema".to_string(),
            cache_compiled: true,
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Whether to install a subscriber at all.
    pub enabled: bool,

    /// Filter directive.
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include the module path.
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Converts to the telemetry crate's settings.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            include_target: self.include_target,
            ..LogConfig::default()
        }
    }
}
