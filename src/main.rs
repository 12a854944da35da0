//! CLI entry point for testharness-selftest
//!
//! Registers a small fixed set of suites that exercises plain tests,
//! fixtures, typed tests and the DISABLED convention, then runs them through
//! the regular driver. One fixture fails its set-up on purpose, so a correct
//! harness exits with status 1.

use std::process::ExitCode;

use testharness::{
    expect_eq, expect_false, expect_true, Fixture, TestBody, TestContext, TestResult, Tester,
    TypedCase,
};

/// Fixture whose set-up check holds
#[derive(Default)]
struct PassingSetUp;

impl Fixture for PassingSetUp {
    fn set_up(&mut self, ctx: &mut TestContext) -> TestResult {
        expect_true!(ctx, 1 == 1);
        Ok(())
    }
}

/// Fixture whose set-up check fails, so its tests never reach the body
#[derive(Default)]
struct FailingSetUp;

impl Fixture for FailingSetUp {
    fn set_up(&mut self, ctx: &mut TestContext) -> TestResult {
        expect_true!(ctx, 1 == 2);
        Ok(())
    }
}

/// Typed template: cloning preserves equality
struct CloneRoundTrip;

impl<T> TypedCase<T> for CloneRoundTrip
where
    T: Clone + Default + PartialEq + std::fmt::Debug + 'static,
{
    fn instantiate() -> Box<dyn TestBody> {
        Box::new(|ctx: &mut TestContext| -> TestResult {
            let value = T::default();
            expect_eq!(ctx, value.clone(), value);
            Ok(())
        })
    }
}

fn register_self_tests(tester: &mut Tester) {
    tester.register("case_name_1", "test_name_1", |ctx: &mut TestContext| -> TestResult {
        expect_true!(ctx, 1 == 1);
        Ok(())
    });
    tester.register("case_name_1", "test_name_2", |ctx: &mut TestContext| -> TestResult {
        expect_false!(ctx, 1 == 2);
        Ok(())
    });
    tester.register("case_name_1", "DISABLED_test_name_3", |ctx: &mut TestContext| -> TestResult {
        ctx.fatal("disabled tests never run")
    });
    tester.register("case_name_2", "test_name_1", |ctx: &mut TestContext| -> TestResult {
        expect_eq!(ctx, 1, 1);
        Ok(())
    });

    tester.register_fixture::<PassingSetUp, _, _, _>(
        "test_fixture_1",
        "test_name_1",
        |_fixture: &mut PassingSetUp, ctx: &mut TestContext| -> TestResult {
            expect_true!(ctx, 1 == 1);
            Ok(())
        },
    );
    tester.register_fixture::<PassingSetUp, _, _, _>(
        "test_fixture_1",
        "test_name_2",
        |_fixture: &mut PassingSetUp, ctx: &mut TestContext| -> TestResult {
            expect_false!(ctx, 1 == 2);
            Ok(())
        },
    );
    tester.register_fixture::<FailingSetUp, _, _, _>(
        "test_fixture_2",
        "test_name_1",
        |_fixture: &mut FailingSetUp, ctx: &mut TestContext| -> TestResult {
            expect_true!(ctx, 1 == 1);
            Ok(())
        },
    );

    if let Err(error) =
        tester.register_typed::<CloneRoundTrip, (u8, i64, String)>("clone", "round_trip")
    {
        eprintln!("Registration error: {error}");
    }
}

fn main() -> ExitCode {
    testharness::run_main(register_self_tests)
}
