//! `unwrap` and `expect` as the way back to unwinding.

use std::panic::{self, AssertUnwindSafe};

use okerr::{Error, ErrorLike, Outcome, err, err_from_text, ok, recover, wrap, wrap_throwable};

use crate::common::{AppError, divide};

#[test]
fn test_unwrap_rethrows_user_error_unchanged() {
    let payload = panic::catch_unwind(|| divide(1, 0).unwrap()).unwrap_err();
    let error = recover::<AppError>(payload).expect("payload should hold the stored error");
    assert!(matches!(error, AppError::DivisionByZero));
}

#[test]
fn test_expect_message_and_cause() {
    let payload = panic::catch_unwind(|| divide(1, 0).expect("division required")).unwrap_err();
    let error = recover::<Error>(payload).expect("payload should hold an okerr Error");
    assert_eq!(error.message(), "division required");

    let cause = ErrorLike::cause(&error).expect("cause should be the stored error");
    assert!(matches!(
        cause.downcast_ref::<AppError>(),
        Some(AppError::DivisionByZero)
    ));
}

#[test]
fn test_wrap_around_unwrap_keeps_user_error_message() {
    let outcome = wrap(|| divide(1, 0).unwrap());
    let error = outcome.error().expect("wrapped unwrap should fail");
    assert_eq!(error.message(), "Cannot Divide By Zero");

    let source = std::error::Error::source(error).expect("stored error should be the cause");
    assert!(matches!(
        source.downcast_ref::<AppError>(),
        Some(AppError::DivisionByZero)
    ));
}

#[test]
fn test_wrap_around_unwrap_of_io_error() {
    let outcome = wrap(|| {
        let read: Outcome<Vec<u8>, std::io::Error> = err(std::io::Error::other("disk full"));
        read.unwrap()
    });
    assert_eq!(outcome.error().map(Error::message), Some("disk full"));
}

#[test]
fn test_map_around_unwrap_returns_same_user_error() {
    let outcome = divide(4, 2).map(|x| divide(x, 0).unwrap());
    assert!(matches!(outcome, Outcome::Err(AppError::DivisionByZero)));
}

#[test]
fn test_wrap_throwable_around_expect() {
    let checked = wrap_throwable(|a: i64, b: i64| divide(a, b).expect("division required"));
    assert_eq!(checked((9, 3)).unwrap(), 3);

    let failed = checked((9, 0));
    let error = failed.error().expect("expect on Err should fail");
    assert_eq!(error.message(), "division required");
    let cause = ErrorLike::cause(error).expect("stored error should be the cause");
    assert!(matches!(
        cause.downcast_ref::<AppError>(),
        Some(AppError::DivisionByZero)
    ));
}

#[test]
fn test_repeated_inspection_is_stable() {
    let outcome: Outcome<i32> = err_from_text("fixed");
    let first = (outcome.is_ok(), outcome.is_error());
    for _ in 0..5 {
        assert_eq!((outcome.is_ok(), outcome.is_error()), first);
        assert_eq!(outcome.error().map(Error::message), Some("fixed"));
    }

    let shared: Outcome<i32> = ok(3);
    for _ in 0..5 {
        assert_eq!(shared.ok(), Some(&3));
    }
}

#[test]
fn test_unwrap_after_wrap_roundtrips_error() {
    let outcome =
        okerr::wrap(|| -> u8 { panic::panic_any(Error::new("inner").with_property("id", 9)) });
    let payload = panic::catch_unwind(AssertUnwindSafe(|| outcome.unwrap())).unwrap_err();
    let error = recover::<Error>(payload).unwrap();
    assert_eq!(error.message(), "inner");
    assert_eq!(error.property("id"), Some(&serde_json::json!(9)));
}

#[test]
fn test_question_mark_interop() {
    fn halve_twice(n: i64) -> Result<i64, AppError> {
        let once = divide(n, 2).into_result()?;
        divide(once, 2).into()
    }

    assert_eq!(halve_twice(20).unwrap(), 5);
    let failed: Outcome<i64, AppError> = err(AppError::DivisionByZero);
    assert!(Result::from(failed).is_err());
}
