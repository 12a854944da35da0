//! The registry: suites, environments and the run drivers.

use std::collections::HashMap;

use crate::body::{Fixture, FixtureTest, TestBody};
use crate::config::HarnessConfig;
use crate::context::{TestContext, TestResult};
use crate::environment::Environment;
use crate::error::{HarnessError, Result};
use crate::outcome::{RunMode, RunOutcome};
use crate::report::{ConsoleReporter, Reporter};
use crate::test_case::TestCase;
use crate::timer::Timer;
use crate::typed::{self, TypeList};

/// Registry of every suite and environment of one run
///
/// Build one `Tester`, register tests and environments on it, then call
/// [`run_all`](Tester::run_all) or [`run_perf`](Tester::run_perf).
pub struct Tester {
    config: HarnessConfig,
    case_index: HashMap<String, usize>,
    cases: Vec<TestCase>,
    environments: Vec<Box<dyn Environment>>,
    reporter: Box<dyn Reporter>,
}

impl Tester {
    /// Registry with default configuration reporting to stdout
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        let reporter = ConsoleReporter::stdout().with_timings(config.show_timings());
        Self {
            config,
            case_index: HashMap::new(),
            cases: Vec::new(),
            environments: Vec::new(),
            reporter: Box::new(reporter),
        }
    }

    /// Replace the reporter receiving run events
    #[must_use]
    pub fn with_reporter<R: Reporter + 'static>(mut self, reporter: R) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Register `body` as `suite.test`. The suite is created on first use;
    /// suites run in the order their names were first registered.
    pub fn register<S, T, B>(&mut self, suite: S, test: T, body: B) -> bool
    where
        S: AsRef<str>,
        T: Into<String>,
        B: TestBody + 'static,
    {
        self.register_boxed(suite.as_ref(), test.into(), Box::new(body))
    }

    /// Register a test backed by fixture `F`
    pub fn register_fixture<F, S, T, B>(&mut self, suite: S, test: T, body: B) -> bool
    where
        F: Fixture + 'static,
        S: AsRef<str>,
        T: Into<String>,
        B: FnMut(&mut F, &mut TestContext) -> TestResult + 'static,
    {
        self.register(suite, test, FixtureTest::<F, B>::new(body))
    }

    /// Register one instantiation of `C` per type in `L`, each under its
    /// own `[index] suite<type>` suite. Returns the number of suites added.
    pub fn register_typed<C, L>(&mut self, suite: &str, test: &str) -> Result<usize>
    where
        L: TypeList<C>,
    {
        typed::expand(self, suite, test, &L::descriptors())
    }

    pub(crate) fn register_boxed(
        &mut self,
        suite: &str,
        test: String,
        body: Box<dyn TestBody>,
    ) -> bool {
        let index = match self.case_index.get(suite) {
            Some(&index) => index,
            None => {
                let index = self.cases.len();
                self.cases.push(
                    TestCase::new(suite).with_duplicate_names(self.config.allow_duplicate_names()),
                );
                self.case_index.insert(suite.to_owned(), index);
                index
            }
        };

        tracing::debug!(suite, test = %test, "registering test");
        self.cases[index].insert(test, body)
    }

    /// Append a global environment. Environments are set up in registration
    /// order before any suite runs.
    pub fn add_environment<E: Environment + 'static>(&mut self, env: E) {
        self.environments.push(Box::new(env));
    }

    /// Total registered tests, disabled included
    pub fn tests_count(&self) -> usize {
        self.cases.iter().map(TestCase::count).sum()
    }

    pub fn suites_count(&self) -> usize {
        self.cases.len()
    }

    /// Suite names in execution order
    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(TestCase::name)
    }

    /// Look up a suite by name
    pub fn suite(&self, name: &str) -> Option<&TestCase> {
        self.case_index.get(name).map(|&index| &self.cases[index])
    }

    /// Run every functional test
    pub fn run_all(&mut self) -> RunOutcome {
        self.run(RunMode::Functional)
    }

    /// Run every test in perf mode, recording timings of successful runs
    pub fn run_perf(&mut self) -> RunOutcome {
        self.run(RunMode::Perf)
    }

    /// Run in the mode selected by the configuration
    pub fn run_configured(&mut self) -> RunOutcome {
        self.run(self.config.mode())
    }

    fn run(&mut self, mode: RunMode) -> RunOutcome {
        let mut outcome = RunOutcome {
            mode,
            tests: self.tests_count(),
            suites: self.cases.len(),
            ..RunOutcome::default()
        };
        tracing::info!(?mode, tests = outcome.tests, suites = outcome.suites, "starting run");

        let mut total = Timer::started();
        if let Err(error) = self.set_up_environments() {
            outcome.elapsed_ms = total.stop();
            outcome.aborted = Some(error);
            self.reporter.run_finished(&outcome);
            return outcome;
        }

        self.reporter.run_started(mode, outcome.tests, outcome.suites);
        for case in &mut self.cases {
            let summary = case.run_all(mode, self.reporter.as_mut());
            outcome.absorb(summary);
        }

        if let Err(error) = self.tear_down_environments() {
            outcome.aborted = Some(error);
        }
        outcome.elapsed_ms = total.stop();

        tracing::info!(
            passed = outcome.passed,
            failed = outcome.failed,
            disabled = outcome.disabled,
            "run finished"
        );
        self.reporter.run_finished(&outcome);
        outcome
    }

    /// Set environments up in order. On the first failure the environments
    /// already set up are torn down, best effort, and the error is returned.
    fn set_up_environments(&mut self) -> Result<()> {
        for index in 0..self.environments.len() {
            if let Err(source) = self.environments[index].set_up() {
                tracing::error!(
                    environment = self.environments[index].name(),
                    error = %source,
                    "environment set-up failed"
                );
                for earlier in self.environments[..index].iter_mut() {
                    if let Err(error) = earlier.tear_down() {
                        tracing::warn!(environment = earlier.name(), %error, "tear-down after aborted set-up failed");
                    }
                }
                return Err(HarnessError::EnvironmentSetUp { index, source });
            }
        }
        Ok(())
    }

    /// Tear environments down in order, stopping at the first failure
    fn tear_down_environments(&mut self) -> Result<()> {
        for (index, env) in self.environments.iter_mut().enumerate() {
            if let Err(source) = env.tear_down() {
                tracing::error!(environment = env.name(), error = %source, "environment tear-down failed");
                return Err(HarnessError::EnvironmentTearDown { index, source });
            }
        }
        Ok(())
    }
}

impl Default for Tester {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::FnEnvironment;
    use crate::report::SilentReporter;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn silent() -> Tester {
        Tester::new().with_reporter(SilentReporter)
    }

    /// **What is tested:** The passing math example: one passing test and one disabled test
    /// **Why it is tested:** Reference scenario for the run contract
    /// **Test conditions:** Suite math with add_passes and DISABLED_slow
    /// **Expectations:** add_passes OK, DISABLED_slow skipped, no failures, exit code 0
    #[test]
    fn test_math_example_passes() {
        let mut tester = silent();
        tester.register("math", "add_passes", |ctx: &mut TestContext| -> TestResult {
            ctx.expect_true(1 + 1 == 2, "1 + 1 == 2");
            Ok(())
        });
        tester.register("math", "DISABLED_slow", |_ctx: &mut TestContext| -> TestResult {
            panic!("disabled test must never run");
        });

        let outcome = tester.run_all();

        assert_eq!(outcome.passed, 1);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.disabled, 1);
        assert_eq!(outcome.exit_code(), 0);
    }

    /// **What is tested:** The failing math example: fatal test followed by a passing one
    /// **Why it is tested:** Reference scenario for fatal isolation
    /// **Test conditions:** Suite math with a fatal-failing test then an always-passing test
    /// **Expectations:** 1 failure, 1 pass, exit code 1
    #[test]
    fn test_math_example_fatal() {
        let mut tester = silent();
        tester.register("math", "fatal", |ctx: &mut TestContext| -> TestResult {
            ctx.require_eq(1 + 1, 3, "1 + 1, 3")?;
            Ok(())
        });
        tester.register("math", "passes", |_ctx: &mut TestContext| -> TestResult { Ok(()) });

        let outcome = tester.run_all();

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.passed, 1);
        assert_eq!(outcome.exit_code(), 1);
    }

    /// **What is tested:** Re-registration under an existing suite name appends
    /// **Why it is tested:** At most one TestCase per suite name
    /// **Test conditions:** Interleaved registrations into two suites
    /// **Expectations:** Two suites in first-seen order, counts 2 and 1
    #[test]
    fn test_suite_order_and_append() {
        let mut tester = silent();
        let ok = |_ctx: &mut TestContext| -> TestResult { Ok(()) };
        tester.register("b", "one", ok);
        tester.register("a", "one", ok);
        tester.register("b", "two", ok);

        assert_eq!(tester.suite_names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(tester.suite("b").map(TestCase::count), Some(2));
        assert_eq!(tester.tests_count(), 3);
        assert_eq!(tester.suites_count(), 2);
    }

    /// **What is tested:** Environment set-up failure aborts the run
    /// **Why it is tested:** Tests must not run in an unprepared environment
    /// **Test conditions:** Two environments, the second fails set-up; one registered test
    /// **Expectations:** No test runs, first environment torn down, exit code 1
    #[test]
    fn test_environment_set_up_failure_aborts() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut tester = silent();

        let (e1, e2) = (Rc::clone(&events), Rc::clone(&events));
        tester.add_environment(FnEnvironment::new(
            "first",
            move || {
                e1.borrow_mut().push("first.set_up");
                Ok(())
            },
            move || {
                e2.borrow_mut().push("first.tear_down");
                Ok(())
            },
        ));
        let e3 = Rc::clone(&events);
        tester.add_environment(FnEnvironment::new(
            "second",
            || Err(anyhow::anyhow!("unavailable")),
            move || {
                e3.borrow_mut().push("second.tear_down");
                Ok(())
            },
        ));
        let e4 = Rc::clone(&events);
        tester.register("s", "t", move |_ctx: &mut TestContext| -> TestResult {
            e4.borrow_mut().push("test");
            Ok(())
        });

        let outcome = tester.run_all();

        assert_eq!(outcome.exit_code(), 1);
        assert!(matches!(
            outcome.aborted,
            Some(HarnessError::EnvironmentSetUp { index: 1, .. })
        ));
        assert_eq!(*events.borrow(), vec!["first.set_up", "first.tear_down"]);
        assert!(outcome.records.is_empty());
    }

    /// **What is tested:** Environment tear-down failure fails an otherwise green run
    /// **Why it is tested:** Exit code must be non-zero when any hook fails
    /// **Test conditions:** One passing test, environment failing tear-down
    /// **Expectations:** Test passed, exit code 1
    #[test]
    fn test_environment_tear_down_failure() {
        let mut tester = silent();
        tester.add_environment(FnEnvironment::new(
            "env",
            || Ok(()),
            || Err(anyhow::anyhow!("leak")),
        ));
        tester.register("s", "t", |_ctx: &mut TestContext| -> TestResult { Ok(()) });

        let outcome = tester.run_all();

        assert_eq!(outcome.passed, 1);
        assert_eq!(outcome.exit_code(), 1);
        assert!(matches!(
            outcome.aborted,
            Some(HarnessError::EnvironmentTearDown { index: 0, .. })
        ));
    }

    /// **What is tested:** Perf runs use the same lifecycle and return samples
    /// **Why it is tested:** The perf path must honor environments and ordering
    /// **Test conditions:** Environment counting hook calls, two perf tests
    /// **Expectations:** Hooks called once each, one sample per passing test
    #[test]
    fn test_run_perf_samples() {
        let calls = Rc::new(RefCell::new(0));
        let (c1, c2) = (Rc::clone(&calls), Rc::clone(&calls));
        let mut tester = silent();
        tester.add_environment(FnEnvironment::new(
            "counter",
            move || {
                *c1.borrow_mut() += 1;
                Ok(())
            },
            move || {
                *c2.borrow_mut() += 1;
                Ok(())
            },
        ));
        tester.register("perf", "sum", |ctx: &mut TestContext| -> TestResult {
            let total: u64 = (0..1_000u64).sum();
            ctx.require_eq(total, 499_500u64, "total, 499_500")
        });
        tester.register("perf", "DISABLED_huge", |_ctx: &mut TestContext| -> TestResult {
            panic!("never runs");
        });

        let outcome = tester.run_perf();

        assert_eq!(*calls.borrow(), 2);
        assert_eq!(outcome.mode, RunMode::Perf);
        assert_eq!(outcome.samples().len(), 1);
        assert_eq!(outcome.exit_code(), 0);
    }

    /// **What is tested:** Strict configuration rejects duplicate registrations
    /// **Why it is tested:** The optional uniqueness check flows from config to every suite
    /// **Test conditions:** Tester with duplicates disallowed, same name registered twice
    /// **Expectations:** Second registration returns false
    #[test]
    fn test_strict_names_from_config() {
        let config = crate::config::ConfigBuilder::new()
            .with_duplicate_names(false)
            .build();
        let mut tester = Tester::with_config(config).with_reporter(SilentReporter);
        let ok = |_ctx: &mut TestContext| -> TestResult { Ok(()) };

        assert!(tester.register("s", "t", ok));
        assert!(!tester.register("s", "t", ok));
        assert_eq!(tester.tests_count(), 1);
    }
}
