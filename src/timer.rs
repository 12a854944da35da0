//! Monotonic stopwatch used for per-test, per-suite and whole-run timings.

use std::time::{Duration, Instant};

/// Stopwatch measuring elapsed wall time in milliseconds
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Option<Instant>,
    accumulated: Duration,
}

impl Timer {
    /// Create a stopped timer
    pub const fn new() -> Self {
        Self {
            started: None,
            accumulated: Duration::ZERO,
        }
    }

    /// Create a timer that is already running
    pub fn started() -> Self {
        let mut timer = Self::new();
        timer.start();
        timer
    }

    /// Start (or resume) measuring
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Stop measuring and return the total elapsed milliseconds
    pub fn stop(&mut self) -> f64 {
        if let Some(started) = self.started.take() {
            self.accumulated += started.elapsed();
        }
        self.value_ms()
    }

    /// Elapsed milliseconds so far, including a running interval
    pub fn value_ms(&self) -> f64 {
        let running = self
            .started
            .map(|started| started.elapsed())
            .unwrap_or_default();
        (self.accumulated + running).as_secs_f64() * 1000.0
    }

    /// Whether the timer is currently running
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
