//! Harness configuration module
//!
//! Combines command-line flags with environment settings. Priority:
//!
//! 1. CLI flags (highest priority)
//! 2. Environment settings
//! 3. Defaults

use super::settings::HarnessSettings;
use super::settings_reader::{EnvSettingsReader, SettingsReader};
use super::ConfigError;
use crate::outcome::RunMode;

/// Command-line flags relevant to the harness, independent of the parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Run perf tests instead of functional tests
    pub perf: bool,
    /// Reject duplicate test names within a suite
    pub strict_names: bool,
    /// Hide millisecond timings in the report
    pub no_timings: bool,
}

/// Resolved harness configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    allow_duplicate_names: bool,
    show_timings: bool,
    mode: RunMode,
}

/// Configuration builder
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    allow_duplicate_names: Option<bool>,
    show_timings: Option<bool>,
    mode: Option<RunMode>,
}

impl ConfigBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allow_duplicate_names: None,
            show_timings: None,
            mode: None,
        }
    }

    #[must_use]
    pub const fn with_duplicate_names(mut self, allowed: bool) -> Self {
        self.allow_duplicate_names = Some(allowed);
        self
    }

    #[must_use]
    pub const fn with_timings(mut self, shown: bool) -> Self {
        self.show_timings = Some(shown);
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Build the final config; unset values take their defaults
    pub fn build(self) -> HarnessConfig {
        HarnessConfig {
            allow_duplicate_names: self.allow_duplicate_names.unwrap_or(true),
            show_timings: self.show_timings.unwrap_or(true),
            mode: self.mode.unwrap_or_default(),
        }
    }
}

impl HarnessConfig {
    /// Resolve the configuration from CLI flags and the process environment
    pub fn from_cli(cli_args: CliArgs) -> Result<Self, ConfigError> {
        Self::from_cli_with_reader(cli_args, &EnvSettingsReader)
    }

    /// Resolve with a custom settings reader (for testing)
    pub fn from_cli_with_reader<R: SettingsReader>(
        cli_args: CliArgs,
        reader: &R,
    ) -> Result<Self, ConfigError> {
        let strict = match cli_args.strict_names.then_some(true) {
            Some(strict) => Some(strict),
            None => HarnessSettings::get_strict_names_with_reader(reader)?,
        };

        let timings = match cli_args.no_timings.then_some(false) {
            Some(shown) => Some(shown),
            None => HarnessSettings::get_timings_with_reader(reader)?,
        };

        let mode = match cli_args.perf.then_some(RunMode::Perf) {
            Some(mode) => Some(mode),
            None => HarnessSettings::get_mode_with_reader(reader)?,
        };

        let mut builder = ConfigBuilder::new();
        if let Some(strict) = strict {
            builder = builder.with_duplicate_names(!strict);
        }
        if let Some(shown) = timings {
            builder = builder.with_timings(shown);
        }
        if let Some(mode) = mode {
            builder = builder.with_mode(mode);
        }
        Ok(builder.build())
    }

    /// Whether a suite accepts several tests with the same name
    pub fn allow_duplicate_names(&self) -> bool {
        self.allow_duplicate_names
    }

    pub fn show_timings(&self) -> bool {
        self.show_timings
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}
