//! Error handling module
//!
//! Errors that abort a whole run or a registration step. Individual test
//! failures are not errors: they are recorded in the test's
//! [`FailureState`](crate::FailureState).

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for the harness
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Main error type for the harness
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An environment's set-up hook failed; no test was run
    #[error("environment #{index} set-up failed: {source}")]
    EnvironmentSetUp {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
    /// An environment's tear-down hook failed
    #[error("environment #{index} tear-down failed: {source}")]
    EnvironmentTearDown {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
    /// The registry refused a test
    #[error("failed to register test {suite}.{test}")]
    Registration { suite: String, test: String },
    /// Invalid harness configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Whether this error stopped a run (as opposed to a setup-time error)
    pub fn is_run_abort(&self) -> bool {
        matches!(
            self,
            HarnessError::EnvironmentSetUp { .. } | HarnessError::EnvironmentTearDown { .. }
        )
    }
}
