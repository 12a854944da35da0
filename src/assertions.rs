//! Assertion macros over [`TestContext`](crate::TestContext).
//!
//! `expect_*!` are non-fatal and evaluate to `bool`. `require_*!` are fatal:
//! they apply `?` to the check, so they can only be used inside a function
//! returning [`TestResult`](crate::TestResult).

/// Non-fatal check that a condition is true
#[macro_export]
macro_rules! expect_true {
    ($ctx:expr, $cond:expr $(,)?) => {
        $ctx.expect_true($cond, stringify!($cond))
    };
}

/// Non-fatal check that a condition is false
#[macro_export]
macro_rules! expect_false {
    ($ctx:expr, $cond:expr $(,)?) => {
        $ctx.expect_false($cond, stringify!($cond))
    };
}

/// Non-fatal equality check
#[macro_export]
macro_rules! expect_eq {
    ($ctx:expr, $actual:expr, $expected:expr $(,)?) => {
        $ctx.expect_eq($actual, $expected, concat!(stringify!($actual), ", ", stringify!($expected)))
    };
}

/// Fatal check that a condition is true; returns from the body on failure
#[macro_export]
macro_rules! require_true {
    ($ctx:expr, $cond:expr $(,)?) => {
        $ctx.require_true($cond, stringify!($cond))?
    };
}

/// Fatal check that a condition is false; returns from the body on failure
#[macro_export]
macro_rules! require_false {
    ($ctx:expr, $cond:expr $(,)?) => {
        $ctx.require_false($cond, stringify!($cond))?
    };
}

/// Fatal equality check; returns from the body on failure
#[macro_export]
macro_rules! require_eq {
    ($ctx:expr, $actual:expr, $expected:expr $(,)?) => {
        $ctx.require_eq($actual, $expected, concat!(stringify!($actual), ", ", stringify!($expected)))?
    };
}
