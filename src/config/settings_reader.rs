//! Settings reader module
//!
//! Low-level access to harness settings stored outside the command line.
//! The system implementation reads process environment variables.

use std::env;

use super::ConfigError;

/// Trait for reading raw setting values by key
pub trait SettingsReader {
    /// Get a raw setting value, `None` when the setting is not present
    fn get_setting(&self, key: &str) -> Result<Option<String>, ConfigError>;
}

/// Reader backed by the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettingsReader;

impl SettingsReader for EnvSettingsReader {
    fn get_setting(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match env::var(key) {
            Ok(value) => {
                let value = value.trim();
                Ok((!value.is_empty()).then(|| value.to_owned()))
            }
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(raw)) => Err(ConfigError::ReadFailed {
                key: key.to_owned(),
                error: format!("value is not valid unicode: {raw:?}"),
            }),
        }
    }
}

/// Mock settings reader for testing
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSettingsReader {
    settings: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MockSettingsReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting value to the mock reader
    pub fn with_setting(mut self, key: &str, value: &str) -> Self {
        self.settings.insert(key.to_owned(), value.to_owned());
        self
    }
}

#[cfg(test)]
impl SettingsReader for MockSettingsReader {
    fn get_setting(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.settings.get(key).cloned())
    }
}
