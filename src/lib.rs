//! testharness library
//!
//! A registration-driven test and benchmark harness. Test bodies are
//! registered into named suites on a [`Tester`], then executed in
//! registration order with pass/fail/fatal tracking and timing, either as
//! functional tests or as perf measurements.
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```rust
//! use testharness::{require_eq, expect_true, SilentReporter, TestContext, TestResult, Tester};
//!
//! let mut tester = Tester::new().with_reporter(SilentReporter);
//! tester.register("math", "add_passes", |ctx: &mut TestContext| -> TestResult {
//!     expect_true!(ctx, 1 + 1 == 2);
//!     require_eq!(ctx, 2 * 2, 4);
//!     Ok(())
//! });
//! tester.register("math", "DISABLED_slow", |_ctx: &mut TestContext| -> TestResult {
//!     unreachable!("disabled tests never run")
//! });
//!
//! let outcome = tester.run_all();
//! assert_eq!(outcome.passed, 1);
//! assert_eq!(outcome.disabled, 1);
//! assert_eq!(outcome.exit_code(), 0);
//! ```

#[macro_use]
mod assertions;

pub mod body;
pub mod cli;
pub mod config;
pub mod context;
pub mod environment;
pub mod error;
pub mod failure;
pub mod logging;
pub mod outcome;
pub mod report;
pub mod test_case;
pub mod tester;
pub mod timer;
pub mod typed;
pub mod utils;

pub use body::{Fixture, FixtureTest, TestBody};
pub use cli::{run_main, HarnessArgs};
pub use config::{ConfigError, HarnessConfig};
pub use context::{FailureMessage, Fatal, TestContext, TestResult};
pub use environment::{Environment, FnEnvironment};
pub use error::{HarnessError, Result};
pub use failure::FailureState;
pub use logging::init_tracing;
pub use outcome::{PerfSample, RunMode, RunOutcome, TestRecord, TestStatus};
pub use report::{ConsoleReporter, Reporter, SilentReporter};
pub use test_case::{TestCase, DISABLED_PREFIX};
pub use tester::Tester;
pub use timer::Timer;
pub use typed::{TypeDescriptor, TypeList, TypedCase};
pub use utils::{WorkDirEnvironment, WorkDirFixture};
