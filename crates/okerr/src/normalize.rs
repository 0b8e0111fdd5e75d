//! Turning caught panic payloads into error values.
//!
//! A panic can carry anything. [`normalize`] maps every payload onto an
//! [`Error`]; [`to_error`] does the same for any target error type that can
//! be built from one, keeping payloads that already are that type as they
//! are.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{
    Cause, CustomError, DEFAULT_CUSTOM_MESSAGE, Error, ErrorLike, UNKNOWN_ERROR_MESSAGE,
};

/// Converts a panic payload into an `E`.
///
/// A payload that holds an `E` (see [`recover`]) is returned unchanged.
/// Anything else goes through [`normalize`] and then `E::from`.
pub fn to_error<E>(payload: Box<dyn Any + Send>) -> E
where
    E: ErrorLike + From<Error>,
{
    match recover::<E>(payload) {
        Ok(error) => error,
        Err(payload) => E::from(normalize(payload)),
    }
}

/// Takes an `E` back out of a panic payload.
///
/// Finds the error whether it was thrown directly with `panic_any(e)` or
/// boxed as a `Box<dyn std::error::Error + Send + Sync>`, which is how
/// [`Outcome::unwrap`](crate::Outcome::unwrap) and
/// [`Outcome::expect`](crate::Outcome::expect) unwind. Any other payload is
/// handed back untouched.
///
/// ```
/// use std::panic::{self, AssertUnwindSafe};
/// use okerr::{Error, Outcome, err_from_text, recover};
///
/// let failed: Outcome<i32> = err_from_text("gone");
/// let payload = panic::catch_unwind(AssertUnwindSafe(|| failed.unwrap())).unwrap_err();
/// let error = recover::<Error>(payload).unwrap();
/// assert_eq!(error.message(), "gone");
/// ```
pub fn recover<E: ErrorLike>(payload: Box<dyn Any + Send>) -> Result<E, Box<dyn Any + Send>> {
    let payload = match payload.downcast::<E>() {
        Ok(error) => return Ok(*error),
        Err(payload) => payload,
    };
    match payload.downcast::<Box<dyn std::error::Error + Send + Sync>>() {
        Ok(boxed) => match (*boxed).downcast::<E>() {
            Ok(error) => Ok(*error),
            Err(boxed) => {
                let payload: Box<dyn Any + Send> = Box::new(boxed);
                Err(payload)
            }
        },
        Err(payload) => Err(payload),
    }
}

/// Converts a panic payload into an [`Error`].
///
/// | payload | result |
/// |---|---|
/// | `Error`, directly or boxed | the same error |
/// | `CustomError` (map form), directly or boxed | flattened into an `Error` |
/// | any other `Box<dyn std::error::Error + Send + Sync>` | its message, with the error as cause |
/// | `String`, `&'static str` | an error with that message |
/// | `serde_json::Map`, `Value::Object` | a custom error built from the fields |
/// | `Value::String` | an error with that message |
/// | anything else | `"Unknown error"`, with the payload as cause |
pub fn normalize(payload: Box<dyn Any + Send>) -> Error {
    let payload = match recover::<Error>(payload) {
        Ok(error) => return error,
        Err(payload) => payload,
    };
    let payload = match recover::<CustomError>(payload) {
        Ok(custom) => return Error::from(custom),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Box<dyn std::error::Error + Send + Sync>>() {
        Ok(error) => {
            let error = *error;
            return Error::new(error.to_string()).with_cause(Cause::Error(error));
        }
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<String>() {
        Ok(message) => return Error::new(*message),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<&'static str>() {
        Ok(message) => return Error::new(*message),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Map<String, Value>>() {
        Ok(fields) => return create_custom_error(Some(*fields)).into(),
        Err(payload) => payload,
    };
    match payload.downcast::<Value>() {
        Ok(value) => from_value(*value),
        Err(payload) => {
            tracing::warn!("unrecognised panic payload, reporting as unknown error");
            Error::new(UNKNOWN_ERROR_MESSAGE).with_cause(payload)
        }
    }
}

fn from_value(value: Value) -> Error {
    match value {
        Value::String(message) => Error::new(message),
        Value::Object(fields) => create_custom_error(Some(fields)).into(),
        other => {
            tracing::warn!(payload = %other, "non-object JSON panic payload, reporting as unknown error");
            Error::new(UNKNOWN_ERROR_MESSAGE).with_cause(other)
        }
    }
}

/// Builds a [`CustomError`] from a property bag.
///
/// The message is the bag's `message` field when it serializes to a string,
/// otherwise [`DEFAULT_CUSTOM_MESSAGE`]. A non-null `cause` field becomes the
/// error's cause. The bag itself is kept whole as the error's properties.
/// `None` gives the default message and `P::default()`.
///
/// ```
/// use okerr::create_custom_error;
/// use serde_json::json;
///
/// let err = create_custom_error(Some(json!({"message": "Not found", "code": 404})));
/// assert_eq!(err.message(), "Not found");
/// assert_eq!(err["code"], 404);
///
/// let bare = create_custom_error::<serde_json::Value>(None);
/// assert_eq!(bare.message(), "Custom error");
/// ```
pub fn create_custom_error<P>(props: Option<P>) -> CustomError<P>
where
    P: Serialize + Default,
{
    let props = props.unwrap_or_default();
    let (message, cause) = match serde_json::to_value(&props) {
        Ok(Value::Object(mut fields)) => {
            let message = match fields.remove("message") {
                Some(Value::String(message)) => Some(message),
                _ => None,
            };
            let cause = fields
                .remove("cause")
                .filter(|cause| !cause.is_null())
                .map(Cause::Value);
            (message, cause)
        }
        _ => (None, None),
    };
    let message = message.unwrap_or_else(|| DEFAULT_CUSTOM_MESSAGE.to_string());
    CustomError::from_parts(message, cause, props)
}

/// Runs `f`, turning a panic into a normalized `E`.
///
/// The panic hook has already run by the time the payload is caught.
pub(crate) fn catch<R, E, F>(operation: &'static str, f: F) -> Result<R, E>
where
    F: FnOnce() -> R,
    E: ErrorLike + From<Error>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let error: E = to_error(payload);
        tracing::debug!(operation, error = %error, "caught panic");
        error
    })
}
