//! One suite: an ordered list of named test bodies.

use std::panic::{self, AssertUnwindSafe};

use crate::body::TestBody;
use crate::context::TestContext;
use crate::outcome::{CaseSummary, RunMode, TestRecord, TestStatus};
use crate::report::Reporter;
use crate::timer::Timer;

/// Name prefix marking a test that is listed but never run
pub const DISABLED_PREFIX: &str = "DISABLED";

/// Whether `test_name` carries the disabled marker
pub fn is_disabled(test_name: &str) -> bool {
    test_name.starts_with(DISABLED_PREFIX)
}

struct TestEntry {
    name: String,
    body: Box<dyn TestBody>,
}

/// Ordered collection of the tests registered under one suite name
pub struct TestCase {
    name: String,
    tests: Vec<TestEntry>,
    allow_duplicate_names: bool,
}

impl TestCase {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
            allow_duplicate_names: true,
        }
    }

    /// Whether later insertions may reuse a name already present
    #[must_use]
    pub fn with_duplicate_names(mut self, allowed: bool) -> Self {
        self.allow_duplicate_names = allowed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a test. Always succeeds unless duplicate names are forbidden
    /// and `test_name` is already registered.
    pub fn insert<S: Into<String>>(&mut self, test_name: S, body: Box<dyn TestBody>) -> bool {
        let name = test_name.into();
        if !self.allow_duplicate_names && self.tests.iter().any(|entry| entry.name == name) {
            tracing::warn!(suite = %self.name, test = %name, "duplicate test name rejected");
            return false;
        }
        self.tests.push(TestEntry { name, body });
        true
    }

    /// Number of registered tests, disabled ones included
    pub fn count(&self) -> usize {
        self.tests.len()
    }

    /// Test names in execution order
    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|entry| entry.name.as_str())
    }

    /// Run every test in insertion order and report each one
    pub fn run_all(&mut self, mode: RunMode, reporter: &mut dyn Reporter) -> CaseSummary {
        reporter.suite_started(&self.name, self.tests.len());
        let mut suite_timer = Timer::started();

        let mut summary = CaseSummary::default();
        let mut ctx = TestContext::new(self.name.as_str(), "");

        for entry in &mut self.tests {
            if is_disabled(&entry.name) {
                let record = TestRecord {
                    suite: self.name.clone(),
                    name: entry.name.clone(),
                    status: TestStatus::Disabled,
                    elapsed_ms: 0.0,
                    measurement_ms: None,
                    messages: Vec::new(),
                };
                reporter.test_finished(&record);
                summary.disabled += 1;
                summary.records.push(record);
                continue;
            }

            ctx.begin(&self.name, &entry.name);
            reporter.test_started(&self.name, &entry.name);

            let mut test_timer = Timer::started();
            let measured = run_guarded(entry.body.as_mut(), &mut ctx, mode);
            let elapsed_ms = test_timer.stop();

            let status = if ctx.is_failed() {
                summary.failed += 1;
                TestStatus::Failed {
                    fatal: ctx.is_fatal(),
                }
            } else {
                summary.passed += 1;
                TestStatus::Passed
            };

            let record = TestRecord {
                suite: self.name.clone(),
                name: entry.name.clone(),
                status,
                elapsed_ms,
                measurement_ms: measured.filter(|_| !status.is_failed()),
                messages: ctx.take_messages(),
            };
            reporter.test_finished(&record);
            summary.records.push(record);
        }

        summary.elapsed_ms = suite_timer.stop();
        reporter.suite_finished(&self.name, self.tests.len(), summary.elapsed_ms);
        summary
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("tests", &self.test_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Invoke the body once. A panic is contained and recorded as a fatal
/// failure of this test only.
fn run_guarded(body: &mut dyn TestBody, ctx: &mut TestContext, mode: RunMode) -> Option<f64> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| match mode {
        RunMode::Functional => {
            if body.run(ctx).is_err() {
                ctx.ensure_fatal();
            }
            None
        }
        RunMode::Perf => Some(body.run_perf(ctx)),
    }));

    match result {
        Ok(measured) => measured,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "test body panicked".to_owned());
            tracing::debug!(suite = %ctx.suite_name(), test = %ctx.test_name(), "test body panicked");
            ctx.record_panic(format!("panicked: {message}"));
            None
        }
    }
}
