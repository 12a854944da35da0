//! Failure tracking for a single test execution.
//!
//! A [`FailureState`] is owned by the [`TestContext`](crate::TestContext) that
//! the runner hands to each body. It is the only place that decides whether a
//! test passed, both for functional and perf runs.

/// Outcome flags of the test currently executing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FailureState {
    failed: bool,
    fatal: bool,
}

impl FailureState {
    /// Create a clean state
    pub const fn new() -> Self {
        Self {
            failed: false,
            fatal: false,
        }
    }

    /// Clear both flags. Called once before every test body.
    pub fn reset(&mut self) {
        self.failed = false;
        self.fatal = false;
    }

    /// Record a non-fatal failure
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    /// Record a fatal failure; implies failed
    pub fn mark_fatal(&mut self) {
        self.failed = true;
        self.fatal = true;
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}
