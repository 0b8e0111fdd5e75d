#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! okerr Library
//!
//! An [`Outcome`] sum type with combinators that catch panics in callbacks,
//! normalization of arbitrary panic payloads into error values, and wrappers
//! that turn panicking functions and futures into `Outcome`-returning ones.
//!
//! # Modules
//!
//! - [`error`]: Error-like values, custom errors, and contract errors
//! - [`normalize`]: Panic payload normalization
//! - [`outcome`]: The `Outcome` type and its combinators
//! - [`wrap`]: Function and future wrappers

pub mod error;
pub mod normalize;
pub mod outcome;
mod proptests;
pub mod wrap;

use serde::Serialize;

// Re-exports for convenience
pub use error::{ContractError, CustomError, Error, ErrorLike};
pub use normalize::{create_custom_error, normalize, recover, to_error};
pub use outcome::Outcome;
pub use wrap::{Throwable, wrap, wrap_throwable};
#[cfg(feature = "async")]
pub use wrap::{AsyncThrowable, Settle, wrap_async, wrap_async_throwable};

/// Builds a successful outcome.
pub fn ok<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Ok(value)
}

/// Builds a failed outcome from an error-like value.
///
/// The error-like requirement is checked at compile time; use
/// [`Outcome::err_checked`] for values that are only known at runtime.
pub fn err<T, E: ErrorLike>(error: E) -> Outcome<T, E> {
    Outcome::Err(error)
}

/// Builds a failed outcome holding a new [`Error`] with the given message.
pub fn err_from_text<T, S: Into<String>>(message: S) -> Outcome<T, Error> {
    Outcome::Err(Error::new(message))
}

/// Builds a failed outcome holding a [`CustomError`] made from `props`.
///
/// See [`create_custom_error`] for how the message and cause are chosen.
///
/// ```
/// use okerr::{Outcome, CustomError, err_from_object};
/// use serde_json::{Value, json};
///
/// let outcome: Outcome<(), CustomError<Value>> =
///     err_from_object(Some(json!({"message": "Not found", "code": 404})));
/// let error = outcome.error().unwrap();
/// assert_eq!(error["code"], 404);
/// assert_eq!(error.message(), "Not found");
/// ```
pub fn err_from_object<T, P>(props: Option<P>) -> Outcome<T, CustomError<P>>
where
    P: Serialize + Default,
{
    Outcome::Err(create_custom_error(props))
}
