//! Diagnostic logging setup.
//!
//! The harness emits `tracing` events for registration, run start and finish,
//! environment failures and fatal aborts. Nothing is printed unless a
//! subscriber is installed, e.g. through [`init_tracing`].

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "RUST_LOG";

/// Initialize tracing for diagnostic output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=testharness=debug`.
/// Events go to stderr so the report on stdout stays intact.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var(LOG_ENV).is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the embedding binary.
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .try_init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **What is tested:** Repeated initialization
    /// **Why it is tested:** Drivers and tests may both call the initializer
    /// **Test conditions:** Calls `init_tracing` twice and emits an event
    /// **Expectations:** No panic; the once-guard is completed
    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::debug!("logging initialized");
        assert!(TRACING_INIT.is_completed());
    }
}
