//! Harness settings module
//!
//! Typed access to the settings a [`SettingsReader`] exposes, with
//! validation of their values.

use thiserror::Error;

use super::settings_reader::SettingsReader;
use crate::outcome::RunMode;

/// Setting key rejecting duplicate test names within a suite
pub const STRICT_NAMES_KEY: &str = "TESTHARNESS_STRICT_NAMES";
/// Setting key toggling millisecond timings in the console report
pub const TIMINGS_KEY: &str = "TESTHARNESS_TIMINGS";
/// Setting key selecting functional or perf runs
pub const MODE_KEY: &str = "TESTHARNESS_MODE";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A setting is present but has an unusable value
    #[error("invalid setting value: {key}='{value}' (expected: {expected})")]
    InvalidSetting {
        key: String,
        value: String,
        expected: String,
    },
    /// A setting could not be read at all
    #[error("failed to read setting {key}: {error}")]
    ReadFailed { key: String, error: String },
}

/// Typed settings operations
pub struct HarnessSettings;

impl HarnessSettings {
    /// Whether duplicate names are rejected
    pub fn get_strict_names_with_reader<R: SettingsReader>(
        reader: &R,
    ) -> Result<Option<bool>, ConfigError> {
        reader
            .get_setting(STRICT_NAMES_KEY)?
            .map(|value| Self::parse_boolean_value(&value, STRICT_NAMES_KEY))
            .transpose()
    }

    /// Whether timings are shown
    pub fn get_timings_with_reader<R: SettingsReader>(
        reader: &R,
    ) -> Result<Option<bool>, ConfigError> {
        reader
            .get_setting(TIMINGS_KEY)?
            .map(|value| Self::parse_boolean_value(&value, TIMINGS_KEY))
            .transpose()
    }

    /// Run mode
    pub fn get_mode_with_reader<R: SettingsReader>(
        reader: &R,
    ) -> Result<Option<RunMode>, ConfigError> {
        reader
            .get_setting(MODE_KEY)?
            .map(|value| Self::parse_mode(&value))
            .transpose()
    }

    fn parse_boolean_value(value: &str, key: &str) -> Result<bool, ConfigError> {
        let normalized = value.to_lowercase();

        ["true", "1", "yes", "on"]
            .iter()
            .any(|&v| v == normalized)
            .then_some(true)
            .or_else(|| {
                ["false", "0", "no", "off"]
                    .iter()
                    .any(|&v| v == normalized)
                    .then_some(false)
            })
            .ok_or_else(|| ConfigError::InvalidSetting {
                key: key.to_owned(),
                value: value.to_owned(),
                expected: "true, false, 1, 0, yes, no, on, or off".to_owned(),
            })
    }

    fn parse_mode(value: &str) -> Result<RunMode, ConfigError> {
        match value.to_lowercase().as_str() {
            "functional" | "test" | "tests" => Ok(RunMode::Functional),
            "perf" | "performance" => Ok(RunMode::Perf),
            _ => Err(ConfigError::InvalidSetting {
                key: MODE_KEY.to_owned(),
                value: value.to_owned(),
                expected: "functional or perf".to_owned(),
            }),
        }
    }
}
