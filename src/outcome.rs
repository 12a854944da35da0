//! Result records produced by a run.

use crate::context::FailureMessage;
use crate::error::HarnessError;

/// Terminal state of one registered test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed { fatal: bool },
    /// Listed but never executed (name starts with `DISABLED`)
    Disabled,
}

impl TestStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, TestStatus::Failed { .. })
    }
}

/// Which path a suite is executed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Functional,
    Perf,
}

/// Per-test record
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub suite: String,
    pub name: String,
    pub status: TestStatus,
    /// Wall time of the whole invocation, zero for disabled tests
    pub elapsed_ms: f64,
    /// Measured region in perf mode, only for successful runs
    pub measurement_ms: Option<f64>,
    pub messages: Vec<FailureMessage>,
}

/// Timing result of a successful perf test
#[derive(Debug, Clone, PartialEq)]
pub struct PerfSample {
    pub suite: String,
    pub test: String,
    pub elapsed_ms: f64,
}

/// Aggregate of one suite run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseSummary {
    pub failed: usize,
    pub passed: usize,
    pub disabled: usize,
    pub elapsed_ms: f64,
    pub records: Vec<TestRecord>,
}

/// Aggregate of a whole run
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub mode: RunMode,
    pub tests: usize,
    pub suites: usize,
    pub passed: usize,
    pub failed: usize,
    pub disabled: usize,
    pub elapsed_ms: f64,
    pub records: Vec<TestRecord>,
    /// Set when an environment hook aborted the run
    pub aborted: Option<HarnessError>,
}

impl RunOutcome {
    /// 0 iff no test failed and every environment hook succeeded
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 && self.aborted.is_none() {
            0
        } else {
            1
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }

    /// Timing samples of successful perf runs, in execution order
    pub fn samples(&self) -> Vec<PerfSample> {
        self.records
            .iter()
            .filter_map(|record| {
                record.measurement_ms.map(|elapsed_ms| PerfSample {
                    suite: record.suite.clone(),
                    test: record.name.clone(),
                    elapsed_ms,
                })
            })
            .collect()
    }

    /// Look up the record for `suite.test`
    pub fn record(&self, suite: &str, test: &str) -> Option<&TestRecord> {
        self.records
            .iter()
            .find(|record| record.suite == suite && record.name == test)
    }

    pub(crate) fn absorb(&mut self, summary: CaseSummary) {
        self.failed += summary.failed;
        self.passed += summary.passed;
        self.disabled += summary.disabled;
        self.records.extend(summary.records);
    }
}

impl From<&RunOutcome> for std::process::ExitCode {
    fn from(outcome: &RunOutcome) -> Self {
        std::process::ExitCode::from(outcome.exit_code() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(suite: &str, name: &str, status: TestStatus, measured: Option<f64>) -> TestRecord {
        TestRecord {
            suite: suite.to_string(),
            name: name.to_string(),
            status,
            elapsed_ms: 1.0,
            measurement_ms: measured,
            messages: Vec::new(),
        }
    }

    /// **What is tested:** Exit code derivation from failures and aborts
    /// **Why it is tested:** The driver contract is 0 only for a fully clean run
    /// **Test conditions:** Clean outcome, outcome with a failure, outcome with an abort
    /// **Expectations:** 0, 1, 1
    #[test]
    fn test_exit_code() {
        let mut outcome = RunOutcome::default();
        assert_eq!(outcome.exit_code(), 0);

        outcome.failed = 1;
        assert_eq!(outcome.exit_code(), 1);

        let aborted = RunOutcome {
            aborted: Some(HarnessError::EnvironmentSetUp {
                index: 0,
                source: anyhow::anyhow!("no database"),
            }),
            ..RunOutcome::default()
        };
        assert_eq!(aborted.exit_code(), 1);
        assert!(!aborted.is_success());
    }

    /// **What is tested:** Samples only include successful measurements
    /// **Why it is tested:** Failed perf runs must not be reported as timings
    /// **Test conditions:** One measured and one failed record absorbed into an outcome
    /// **Expectations:** Exactly one sample with the measured value
    #[test]
    fn test_samples_skip_failures() {
        let mut outcome = RunOutcome::default();
        outcome.absorb(CaseSummary {
            failed: 1,
            passed: 1,
            disabled: 0,
            elapsed_ms: 2.0,
            records: vec![
                record("perf", "fast", TestStatus::Passed, Some(0.5)),
                record("perf", "broken", TestStatus::Failed { fatal: true }, None),
            ],
        });

        let samples = outcome.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].test, "fast");
        assert_eq!(samples[0].elapsed_ms, 0.5);
        assert!(outcome.record("perf", "broken").is_some_and(|r| r.status.is_failed()));
    }
}
