//! Per-test execution context and the assertion primitives.
//!
//! Non-fatal checks (`expect_*`) record a failure and let the body continue.
//! Fatal checks (`require_*`) record a failure and return `Err(Fatal)`, which
//! the body propagates with `?` to stop immediately.

use std::fmt::{self, Debug};
use std::panic::Location;

use crate::failure::FailureState;

/// Marker returned by fatal checks; ends the current test body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fatal;

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fatal failure")
    }
}

impl std::error::Error for Fatal {}

/// Return type of every test body and fixture hook
pub type TestResult = std::result::Result<(), Fatal>;

/// One recorded assertion failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMessage {
    pub file: &'static str,
    pub line: u32,
    pub message: String,
    pub fatal: bool,
}

impl fmt::Display for FailureMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: Failure\n  {}", self.file, self.line, self.message)
    }
}

/// State lent to a test body while it runs
#[derive(Debug, Default)]
pub struct TestContext {
    suite: String,
    test: String,
    state: FailureState,
    messages: Vec<FailureMessage>,
}

impl TestContext {
    pub fn new<S: Into<String>, T: Into<String>>(suite: S, test: T) -> Self {
        Self {
            suite: suite.into(),
            test: test.into(),
            state: FailureState::new(),
            messages: Vec::new(),
        }
    }

    /// Prepare the context for the next test: names are replaced, the
    /// failure state and collected messages are cleared.
    pub(crate) fn begin(&mut self, suite: &str, test: &str) {
        self.suite.clear();
        self.suite.push_str(suite);
        self.test.clear();
        self.test.push_str(test);
        self.state.reset();
        self.messages.clear();
    }

    pub fn suite_name(&self) -> &str {
        &self.suite
    }

    pub fn test_name(&self) -> &str {
        &self.test
    }

    pub fn state(&self) -> &FailureState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    pub fn is_fatal(&self) -> bool {
        self.state.is_fatal()
    }

    /// Messages recorded since the test began
    pub fn messages(&self) -> &[FailureMessage] {
        &self.messages
    }

    pub(crate) fn take_messages(&mut self) -> Vec<FailureMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Record a non-fatal failure with a message
    #[track_caller]
    pub fn fail<M: Into<String>>(&mut self, message: M) {
        self.record(Location::caller(), message.into(), false);
    }

    /// Record a fatal failure; the caller returns the result with `?` or `return`
    #[track_caller]
    pub fn fatal<M: Into<String>>(&mut self, message: M) -> TestResult {
        self.record(Location::caller(), message.into(), true);
        Err(Fatal)
    }

    /// Non-fatal check that `cond` holds. Returns `cond`.
    #[track_caller]
    pub fn expect_true(&mut self, cond: bool, expr: &str) -> bool {
        if !cond {
            self.record(
                Location::caller(),
                format!("Value of: {expr}\n  Actual: false\nExpected: true"),
                false,
            );
        }
        cond
    }

    /// Non-fatal check that `cond` does not hold. Returns `!cond`.
    #[track_caller]
    pub fn expect_false(&mut self, cond: bool, expr: &str) -> bool {
        if cond {
            self.record(
                Location::caller(),
                format!("Value of: {expr}\n  Actual: true\nExpected: false"),
                false,
            );
        }
        !cond
    }

    /// Non-fatal equality check. Returns whether the values matched.
    #[track_caller]
    pub fn expect_eq<A, B>(&mut self, actual: A, expected: B, expr: &str) -> bool
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        let equal = actual == expected;
        if !equal {
            self.record(
                Location::caller(),
                format!("Expected equality of: {expr}\n  Actual: {actual:?}\nExpected: {expected:?}"),
                false,
            );
        }
        equal
    }

    /// Fatal check that `cond` holds
    #[track_caller]
    pub fn require_true(&mut self, cond: bool, expr: &str) -> TestResult {
        if cond {
            return Ok(());
        }
        self.record(
            Location::caller(),
            format!("Value of: {expr}\n  Actual: false\nExpected: true"),
            true,
        );
        Err(Fatal)
    }

    /// Fatal check that `cond` does not hold
    #[track_caller]
    pub fn require_false(&mut self, cond: bool, expr: &str) -> TestResult {
        if !cond {
            return Ok(());
        }
        self.record(
            Location::caller(),
            format!("Value of: {expr}\n  Actual: true\nExpected: false"),
            true,
        );
        Err(Fatal)
    }

    /// Fatal equality check
    #[track_caller]
    pub fn require_eq<A, B>(&mut self, actual: A, expected: B, expr: &str) -> TestResult
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        if actual == expected {
            return Ok(());
        }
        self.record(
            Location::caller(),
            format!("Expected equality of: {expr}\n  Actual: {actual:?}\nExpected: {expected:?}"),
            true,
        );
        Err(Fatal)
    }

    /// Mark the state fatal without a new message, used when a body returns
    /// `Err(Fatal)` it built itself or panics.
    pub(crate) fn ensure_fatal(&mut self) {
        self.state.mark_fatal();
    }

    pub(crate) fn record_panic(&mut self, message: String) {
        self.messages.push(FailureMessage {
            file: "<panic>",
            line: 0,
            message,
            fatal: true,
        });
        self.state.mark_fatal();
    }

    fn record(&mut self, location: &'static Location<'static>, message: String, fatal: bool) {
        if fatal {
            self.state.mark_fatal();
            tracing::debug!(
                suite = %self.suite,
                test = %self.test,
                "fatal failure at {}:{}",
                location.file(),
                location.line()
            );
        } else {
            self.state.mark_failed();
        }
        self.messages.push(FailureMessage {
            file: location.file(),
            line: location.line(),
            message,
            fatal,
        });
    }
}
