//! Common test helpers for okerr integration tests.

use okerr::{Error, Outcome, err, ok};

/// Application error used to check that user `thiserror` types work as the
/// error side of an `Outcome`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Division by zero was requested.
    #[error("Cannot Divide By Zero")]
    DivisionByZero,

    /// A panic caught by a combinator.
    #[error(transparent)]
    Caught(#[from] Error),
}

/// Divides two integers, failing with [`AppError::DivisionByZero`].
pub fn divide(a: i64, b: i64) -> Outcome<i64, AppError> {
    if b == 0 {
        err(AppError::DivisionByZero)
    } else {
        ok(a / b)
    }
}

/// Divides two floats, failing with a named [`Error`].
pub fn divide_f64(a: f64, b: f64) -> Outcome<f64> {
    if b == 0.0 {
        err(Error::new("Cannot Divide By Zero").with_name("DivisionError"))
    } else {
        ok(a / b)
    }
}

/// Routes okerr's tracing output through the test writer.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "okerr=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
