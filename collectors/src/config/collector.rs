//! Collector configuration.
//!
//! Settings can be provided programmatically or read from environment
//! variables:
//! - `DEBUGBAR_DEFAULT_LABEL`: label for messages logged without one (default: "info")
//! - `DEBUGBAR_CAPTURE_MEMORY`: whether to snapshot memory usage per message (default: true)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Environment variable holding the default message label.
pub const DEFAULT_LABEL_VAR: &str = "DEBUGBAR_DEFAULT_LABEL";

/// Environment variable toggling memory snapshots.
pub const CAPTURE_MEMORY_VAR: &str = "DEBUGBAR_CAPTURE_MEMORY";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("Invalid value {value:?} for {var}")]
    InvalidValue {
        /// The variable name.
        var: &'static str,
        /// The offending value.
        value: String,
    },

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Settings for the collectors.
///
/// # Examples
///
/// ```
/// use collectors::config::CollectorConfig;
///
/// let config = CollectorConfig::default();
/// assert_eq!(config.default_label, "info");
/// assert!(config.capture_memory);
/// assert!(config.validate_config().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CollectorConfig {
    /// Label given to messages added without an explicit one.
    #[validate(length(min = 1, message = "Default label cannot be empty"))]
    pub default_label: String,

    /// Whether each message records the current memory usage.
    pub capture_memory: bool,
}

impl CollectorConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DEBUGBAR_CAPTURE_MEMORY` is set but is not a boolean
    /// - `DEBUGBAR_DEFAULT_LABEL` is set but empty
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Keys that the lookup does not know fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`CollectorConfig::from_env`].
    ///
    /// # Examples
    ///
    /// ```
    /// use collectors::config::CollectorConfig;
    ///
    /// let config = CollectorConfig::from_lookup(|key| match key {
    ///     "DEBUGBAR_CAPTURE_MEMORY" => Some("off".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert!(!config.capture_memory);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_label = lookup(DEFAULT_LABEL_VAR).unwrap_or(defaults.default_label);

        let capture_memory = lookup(CAPTURE_MEMORY_VAR)
            .map(|value| parse_flag(CAPTURE_MEMORY_VAR, &value))
            .transpose()?
            .unwrap_or(defaults.capture_memory);

        let config = Self {
            default_label,
            capture_memory,
        };
        config.validate_config()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the default label is empty.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.validate()?;
        Ok(())
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            default_label: "info".to_string(),
            capture_memory: true,
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
