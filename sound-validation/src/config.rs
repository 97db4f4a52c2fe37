// Engine configuration

use crate::EmailProfile;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `SOUND_EMAIL_PROFILE`.
pub const ENV_PREFIX: &str = "SOUND";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings shared by every field of a [`crate::Schema`].
///
/// ```
/// use sound_validation::{EmailProfile, ValidationConfig};
///
/// let config = ValidationConfig::from_toml_str(r#"
///     email_profile = "loose"
///     log_failures = true
/// "#).unwrap();
///
/// assert_eq!(config.email_profile, EmailProfile::Loose);
/// assert!(config.log_failures);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Profile for `is_email_address()` rules that do not pin one
    pub email_profile: EmailProfile,

    /// Log every failing field at debug level
    pub log_failures: bool,
}

impl ValidationConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults overridden by `SOUND_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by full variable name.
    ///
    /// `lookup` is given names such as `SOUND_LOG_FAILURES`; unset
    /// variables leave the current value alone.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}_{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("EMAIL_PROFILE") {
            self.email_profile = value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value })?;
        }

        if let Some((key, value)) = var("LOG_FAILURES") {
            self.log_failures = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::InvalidValue { key, value }),
            };
        }

        Ok(self)
    }
}
