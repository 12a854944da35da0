//! Command-line front end for harness binaries.
//!
//! A test binary built with `harness = false` hands its registrations to
//! [`run_main`], which parses the flags, resolves the configuration and runs
//! in the selected mode:
//!
//! ```no_run
//! use std::process::ExitCode;
//! use testharness::{TestContext, TestResult, Tester};
//!
//! fn main() -> ExitCode {
//!     testharness::run_main(|tester: &mut Tester| {
//!         tester.register("math", "add", |ctx: &mut TestContext| -> TestResult {
//!             ctx.require_eq(1 + 1, 2, "1 + 1, 2")
//!         });
//!     })
//! }
//! ```

use std::process::ExitCode;

use clap::{ArgAction, Parser};

use crate::config::{CliArgs, ConfigError, HarnessConfig};
use crate::error::{HarnessError, Result};
use crate::logging::init_tracing;
use crate::tester::Tester;

/// Registration-driven test and benchmark runner
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct HarnessArgs {
    /// Run every test in perf mode and report timings of successful runs
    #[arg(long, action = ArgAction::SetTrue)]
    pub perf: bool,

    /// Reject tests registered twice under the same name in one suite
    #[arg(long, action = ArgAction::SetTrue)]
    pub strict_names: bool,

    /// Omit millisecond timings from the report
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_timings: bool,
}

impl From<HarnessArgs> for CliArgs {
    fn from(args: HarnessArgs) -> Self {
        Self {
            perf: args.perf,
            strict_names: args.strict_names,
            no_timings: args.no_timings,
        }
    }
}

impl HarnessArgs {
    /// Resolve flags against environment settings and defaults
    pub fn into_config(self) -> Result<HarnessConfig> {
        Ok(HarnessConfig::from_cli(CliArgs::from(self))?)
    }
}

/// Short operator-facing description of a configuration error
pub fn config_error_message(error: &ConfigError) -> String {
    match error {
        ConfigError::InvalidSetting { .. } => format!("Invalid setting: {error}"),
        ConfigError::ReadFailed { .. } => format!("Configuration error: {error}"),
    }
}

/// Parse the process arguments, build a [`Tester`], let `register` populate
/// it and run. Returns exit code 0 iff every test passed and every
/// environment hook succeeded.
pub fn run_main<F>(register: F) -> ExitCode
where
    F: FnOnce(&mut Tester),
{
    init_tracing();

    let config = match HarnessArgs::parse().into_config() {
        Ok(config) => config,
        Err(HarnessError::Config(error)) => {
            eprintln!("{}", config_error_message(&error));
            return ExitCode::FAILURE;
        }
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut tester = Tester::with_config(config);
    register(&mut tester);
    let outcome = tester.run_configured();
    ExitCode::from(&outcome)
}
