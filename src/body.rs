//! The uniform test-body contract and fixture-backed tests.

use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use crate::context::{Fatal, TestContext, TestResult};
use crate::timer::Timer;

/// Anything the registry can run as a single test
///
/// Closures of the form `FnMut(&mut TestContext) -> TestResult` implement this
/// directly.
pub trait TestBody {
    /// Run the test once, reporting failures through `ctx`
    fn run(&mut self, ctx: &mut TestContext) -> TestResult;

    /// Run the test once in perf mode and return the measured milliseconds.
    ///
    /// The value is only a sample when `ctx` reports no failure afterwards.
    fn run_perf(&mut self, ctx: &mut TestContext) -> f64 {
        let mut timer = Timer::started();
        let result = self.run(ctx);
        let elapsed = timer.stop();
        if result.is_err() {
            ctx.ensure_fatal();
        }
        elapsed
    }
}

impl<F> TestBody for F
where
    F: FnMut(&mut TestContext) -> TestResult,
{
    fn run(&mut self, ctx: &mut TestContext) -> TestResult {
        self(ctx)
    }
}

/// Shared set-up/tear-down state for tests of one suite
///
/// A fresh value is built with `Default` for every test run.
pub trait Fixture: Default {
    fn set_up(&mut self, _ctx: &mut TestContext) -> TestResult {
        Ok(())
    }

    fn tear_down(&mut self, _ctx: &mut TestContext) {}
}

/// A test body bound to a fixture type
pub struct FixtureTest<F, B> {
    body: B,
    _fixture: PhantomData<fn() -> F>,
}

impl<F, B> FixtureTest<F, B>
where
    F: Fixture,
    B: FnMut(&mut F, &mut TestContext) -> TestResult,
{
    pub fn new(body: B) -> Self {
        Self {
            body,
            _fixture: PhantomData,
        }
    }

    /// Set the fixture up, run `measured` only when set-up left no failure,
    /// then always tear down. A panic in set-up or the body is re-raised
    /// after tear-down.
    fn with_fixture<R>(
        &mut self,
        ctx: &mut TestContext,
        measured: impl FnOnce(&mut B, &mut F, &mut TestContext) -> R,
    ) -> Option<R> {
        let mut fixture = F::default();
        let body = &mut self.body;
        let guarded = panic::catch_unwind(AssertUnwindSafe(|| {
            if fixture.set_up(ctx).is_err() {
                ctx.ensure_fatal();
            }
            if ctx.is_failed() {
                None
            } else {
                Some(measured(body, &mut fixture, ctx))
            }
        }));

        fixture.tear_down(ctx);
        match guarded {
            Ok(outcome) => outcome,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl<F, B> TestBody for FixtureTest<F, B>
where
    F: Fixture,
    B: FnMut(&mut F, &mut TestContext) -> TestResult,
{
    fn run(&mut self, ctx: &mut TestContext) -> TestResult {
        let result = self.with_fixture(ctx, |body, fixture, ctx| body(fixture, ctx));
        match result {
            Some(result) => result,
            None if ctx.is_fatal() => Err(Fatal),
            None => Ok(()),
        }
    }

    fn run_perf(&mut self, ctx: &mut TestContext) -> f64 {
        self.with_fixture(ctx, |body, fixture, ctx| {
            let mut timer = Timer::started();
            let result = body(fixture, ctx);
            let elapsed = timer.stop();
            if result.is_err() {
                ctx.ensure_fatal();
            }
            elapsed
        })
        .unwrap_or(0.0)
    }
}
