//! Configuration module for the harness
//!
//! Layered configuration combining command-line flags with environment
//! settings:
//!
//! - [`settings_reader`] - raw setting lookup, backed by environment variables
//! - [`settings`] - typed, validated access to individual settings
//! - [`harness_config`] - the resolved [`HarnessConfig`] and its builder
//!
//! Invalid setting values are reported as [`ConfigError`]; only absent
//! settings fall back to defaults.
//!
//! ```rust
//! use testharness::config::{CliArgs, HarnessConfig};
//!
//! let config = HarnessConfig::from_cli(CliArgs::default())?;
//! println!("duplicates allowed: {}", config.allow_duplicate_names());
//! # Ok::<(), testharness::config::ConfigError>(())
//! ```

pub mod harness_config;
pub mod settings;
pub mod settings_reader;

pub use harness_config::{CliArgs, ConfigBuilder, HarnessConfig};
pub use settings::{ConfigError, HarnessSettings};
pub use settings_reader::{EnvSettingsReader, SettingsReader};

#[cfg(test)]
pub use settings_reader::MockSettingsReader;
