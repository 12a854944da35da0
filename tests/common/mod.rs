//! Shared helpers for the integration tests
//!
//! Each test binary includes this module with `mod common;` and uses only a
//! part of it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use testharness::{ConsoleReporter, TestContext, TestResult, Tester};

/// In-memory writer whose contents stay readable after the reporter owning a
/// clone of it has been moved into a [`Tester`]
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Ordered log of events shared between test bodies and assertions
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&self, event: S) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Body that records `suite.test` when invoked and passes
    pub fn recording_body(
        &self,
        name: &str,
    ) -> impl FnMut(&mut TestContext) -> TestResult + 'static {
        let log = self.clone();
        let name = name.to_owned();
        move |_ctx: &mut TestContext| -> TestResult {
            log.push(name.clone());
            Ok(())
        }
    }
}

/// Tester reporting to a buffer with timings hidden, for exact output checks
pub fn buffered_tester() -> (Tester, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let reporter = ConsoleReporter::new(buffer.clone()).with_timings(false);
    (Tester::new().with_reporter(reporter), buffer)
}
