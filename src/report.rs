//! Console reporting.
//!
//! The [`Reporter`] trait receives run events in execution order. The
//! [`ConsoleReporter`] renders them in the familiar bracketed format:
//!
//! ```text
//! [==========] Running 2 tests from 1 test suites.
//! [----------] 2 tests from math
//! [RUN       ] math.add_passes
//! [       OK ] math.add_passes (0.01 ms)
//! [DISABLED  ] math.DISABLED_slow
//! [----------] 2 tests from math (0.03 ms)
//!
//! [==========] 2 tests from 1 test suites ran (0.05 ms).
//! [  PASSED  ] 1 tests.
//! ```

use std::io::{self, Write};

use crate::error::HarnessError;
use crate::outcome::{RunMode, RunOutcome, TestRecord, TestStatus};

/// Receiver of run events
pub trait Reporter {
    fn run_started(&mut self, _mode: RunMode, _tests: usize, _suites: usize) {}

    fn suite_started(&mut self, _suite: &str, _tests: usize) {}

    fn test_started(&mut self, _suite: &str, _test: &str) {}

    /// Called for executed and disabled tests alike
    fn test_finished(&mut self, _record: &TestRecord) {}

    fn suite_finished(&mut self, _suite: &str, _tests: usize, _elapsed_ms: f64) {}

    fn run_finished(&mut self, _outcome: &RunOutcome) {}
}

/// Reporter that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Bracketed line-oriented reporter
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    show_timings: bool,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_timings: true,
        }
    }

    #[must_use]
    pub fn with_timings(mut self, shown: bool) -> Self {
        self.show_timings = shown;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn timing(&self, elapsed_ms: f64) -> String {
        if self.show_timings {
            format!(" ({elapsed_ms} ms)")
        } else {
            String::new()
        }
    }

    // Report output is best effort; a closed stdout must not fail the run.
    fn line(&mut self, line: std::fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(line);
        let _ = self.out.write_all(b"\n");
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, mode: RunMode, tests: usize, suites: usize) {
        let what = match mode {
            RunMode::Functional => "tests",
            RunMode::Perf => "perf tests",
        };
        self.line(format_args!(
            "[==========] Running {tests} {what} from {suites} test suites."
        ));
    }

    fn suite_started(&mut self, suite: &str, tests: usize) {
        self.line(format_args!("[----------] {tests} tests from {suite}"));
    }

    fn test_started(&mut self, suite: &str, test: &str) {
        self.line(format_args!("[RUN       ] {suite}.{test}"));
    }

    fn test_finished(&mut self, record: &TestRecord) {
        let full_name = format!("{}.{}", record.suite, record.name);
        for message in &record.messages {
            self.line(format_args!("{message}"));
        }

        match (record.status, record.measurement_ms) {
            (TestStatus::Disabled, _) => {
                self.line(format_args!("[DISABLED  ] {full_name}"));
            }
            (TestStatus::Passed, Some(measured)) => {
                let timing = format!(" ({measured} ms)");
                self.line(format_args!("[      PERF ] {full_name}{timing}"));
            }
            (TestStatus::Passed, None) => {
                let timing = self.timing(record.elapsed_ms);
                self.line(format_args!("[       OK ] {full_name}{timing}"));
            }
            (TestStatus::Failed { .. }, _) => {
                let timing = self.timing(record.elapsed_ms);
                self.line(format_args!("[   FAILED ] {full_name}{timing}"));
            }
        }
    }

    fn suite_finished(&mut self, suite: &str, tests: usize, elapsed_ms: f64) {
        let timing = self.timing(elapsed_ms);
        self.line(format_args!("[----------] {tests} tests from {suite}{timing}"));
        self.line(format_args!(""));
    }

    fn run_finished(&mut self, outcome: &RunOutcome) {
        if let Some(error) = &outcome.aborted {
            self.line(format_args!("[  ABORTED ] {error}"));
            if matches!(error, HarnessError::EnvironmentSetUp { .. }) {
                self.line(format_args!("[==========] 0 tests ran."));
                let _ = self.out.flush();
                return;
            }
        }

        let timing = self.timing(outcome.elapsed_ms);
        self.line(format_args!(
            "[==========] {} tests from {} test suites ran{timing}.",
            outcome.tests, outcome.suites
        ));
        if outcome.failed != 0 {
            self.line(format_args!("[  FAILED  ] {} tests.", outcome.failed));
            for record in outcome.records.iter().filter(|r| r.status.is_failed()) {
                self.line(format_args!("[  FAILED  ] {}.{}", record.suite, record.name));
            }
        }
        if outcome.disabled != 0 {
            self.line(format_args!("[ DISABLED ] {} tests.", outcome.disabled));
        }
        self.line(format_args!("[  PASSED  ] {} tests.", outcome.passed));
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, status: TestStatus, measured: Option<f64>) -> TestRecord {
        TestRecord {
            suite: "math".to_string(),
            name: name.to_string(),
            status,
            elapsed_ms: 1.5,
            measurement_ms: measured,
            messages: Vec::new(),
        }
    }

    fn render(events: impl FnOnce(&mut ConsoleReporter<Vec<u8>>)) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new());
        events(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap_or_default()
    }

    /// **What is tested:** Per-test status lines
    /// **Why it is tested:** Operators scan for the bracketed prefixes
    /// **Test conditions:** Passed, failed, disabled and measured records
    /// **Expectations:** One line per record with the matching prefix and timing
    #[test]
    fn test_status_lines() {
        let output = render(|reporter| {
            reporter.test_started("math", "add");
            reporter.test_finished(&record("add", TestStatus::Passed, None));
            reporter.test_finished(&record("sub", TestStatus::Failed { fatal: false }, None));
            reporter.test_finished(&record("DISABLED_slow", TestStatus::Disabled, None));
            reporter.test_finished(&record("bench", TestStatus::Passed, Some(2.0)));
        });

        assert!(output.contains("[RUN       ] math.add\n"));
        assert!(output.contains("[       OK ] math.add (1.5 ms)\n"));
        assert!(output.contains("[   FAILED ] math.sub (1.5 ms)\n"));
        assert!(output.contains("[DISABLED  ] math.DISABLED_slow\n"));
        assert!(output.contains("[      PERF ] math.bench (2 ms)\n"));
    }

    /// **What is tested:** Hiding timings
    /// **Why it is tested:** Deterministic output is needed for snapshot-style comparisons
    /// **Test conditions:** Reporter with timings disabled
    /// **Expectations:** No millisecond suffixes on OK and suite lines
    #[test]
    fn test_timings_hidden() {
        let mut reporter = ConsoleReporter::new(Vec::new()).with_timings(false);
        reporter.test_finished(&record("add", TestStatus::Passed, None));
        reporter.suite_finished("math", 1, 3.0);
        let output = String::from_utf8(reporter.into_inner()).unwrap_or_default();

        assert_eq!(
            output,
            "[       OK ] math.add\n[----------] 1 tests from math\n\n"
        );
    }

    /// **What is tested:** Final summary lines
    /// **Why it is tested:** Totals are the last thing an operator reads
    /// **Test conditions:** Outcome with one pass, one failure and one disabled test
    /// **Expectations:** FAILED count, failing test name, DISABLED count and PASSED count
    #[test]
    fn test_summary_lines() {
        let outcome = RunOutcome {
            tests: 3,
            suites: 1,
            passed: 1,
            failed: 1,
            disabled: 1,
            records: vec![record("sub", TestStatus::Failed { fatal: true }, None)],
            ..RunOutcome::default()
        };
        let output = render(|reporter| reporter.run_finished(&outcome));

        assert!(output.contains("[==========] 3 tests from 1 test suites ran"));
        assert!(output.contains("[  FAILED  ] 1 tests.\n"));
        assert!(output.contains("[  FAILED  ] math.sub\n"));
        assert!(output.contains("[ DISABLED ] 1 tests.\n"));
        assert!(output.contains("[  PASSED  ] 1 tests.\n"));
    }

    /// **What is tested:** Footer of a run aborted by environment set-up
    /// **Why it is tested:** No test ran, so no totals may be claimed
    /// **Test conditions:** Outcome carrying a set-up error for a registry of two tests
    /// **Expectations:** Only the ABORTED line and a zero-tests footer
    #[test]
    fn test_aborted_set_up_footer() {
        let outcome = RunOutcome {
            tests: 2,
            suites: 1,
            aborted: Some(HarnessError::EnvironmentSetUp {
                index: 0,
                source: anyhow::anyhow!("no database"),
            }),
            ..RunOutcome::default()
        };
        let output = render(|reporter| reporter.run_finished(&outcome));

        assert_eq!(
            output,
            "[  ABORTED ] environment #0 set-up failed: no database\n[==========] 0 tests ran.\n"
        );
    }
}
