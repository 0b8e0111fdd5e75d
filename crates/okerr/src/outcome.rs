//! The [`Outcome`] sum type and its combinators.

use std::panic;

use serde_json::Value;

use crate::error::{Cause, ContractError, Error, ErrorLike};
use crate::normalize::catch;

/// The outcome of a fallible operation: a success value or an error.
///
/// An `Outcome` is an immutable value. Every combinator consumes it and
/// returns a new one (or a plain value); none mutate in place.
///
/// Combinators that run user callbacks ([`map`](Outcome::map),
/// [`pipe`](Outcome::pipe), [`match_with`](Outcome::match_with)) catch panics
/// in those callbacks and report them as `Err`. Unwinding happens only at
/// the two terminals [`unwrap`](Outcome::unwrap) and
/// [`expect`](Outcome::expect), and from [`or_else`](Outcome::or_else)'s
/// fallback.
///
/// Catching happens after the process-wide panic hook has run, so a caught
/// panic is still printed by the default hook.
///
/// # Examples
///
/// ```
/// use okerr::{Error, Outcome, err_from_text, ok};
///
/// fn parse(input: &str) -> Outcome<i64> {
///     match input.parse() {
///         Ok(n) => ok(n),
///         Err(_) => err_from_text(format!("not a number: {input}")),
///     }
/// }
///
/// let doubled = parse("21").map(|n| n * 2);
/// assert_eq!(doubled.unwrap_or(0), 42);
///
/// let failed = parse("x").pipe(|n| ok(n + 1));
/// assert_eq!(failed.error().map(Error::message), Some("not a number: x"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "this `Outcome` may be an `Err` variant, which should be handled"]
pub enum Outcome<T, E = Error> {
    /// The operation succeeded.
    Ok(T),
    /// The operation failed.
    Err(E),
}

impl<T, E> Outcome<T, E> {
    /// Builds an `Outcome` from a standard `Result`.
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Err(error),
        }
    }

    /// Returns `true` if this is `Ok`.
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns `true` if this is `Err`.
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    /// Returns `true` if this is `Ok` and the value satisfies `f`.
    pub fn is_ok_and<F>(self, f: F) -> bool
    where
        F: FnOnce(T) -> bool,
    {
        match self {
            Outcome::Ok(value) => f(value),
            Outcome::Err(_) => false,
        }
    }

    /// Returns `true` if this is `Err` and the error satisfies `f`.
    pub fn is_error_and<F>(self, f: F) -> bool
    where
        F: FnOnce(E) -> bool,
    {
        match self {
            Outcome::Ok(_) => false,
            Outcome::Err(error) => f(error),
        }
    }

    /// The success value, if any.
    pub fn ok(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    /// The error, if any.
    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(error) => Some(error),
        }
    }

    /// Converts `&Outcome<T, E>` into `Outcome<&T, &E>`.
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Converts into a standard `Result`, for use with `?`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }

    /// Returns the success value, or `fallback` on `Err`.
    ///
    /// Never panics.
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(_) => fallback,
        }
    }

    /// Returns the success value, or computes one from a closure.
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(_) => f(),
        }
    }

    /// Returns the success value, or recovers one from the error.
    ///
    /// `f` is only called on `Err`. A panic inside `f` is not caught: the
    /// fallback is the last step, with nothing left to report a failure to.
    pub fn or_else<F>(self, f: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => f(error),
        }
    }

    /// Maps the error, leaving a success value untouched.
    pub fn map_err<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(f(error)),
        }
    }

    /// Calls `f` with a reference to the success value, if any.
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Outcome::Ok(value) = &self {
            f(value);
        }
        self
    }

    /// Calls `f` with a reference to the error, if any.
    pub fn inspect_err<F>(self, f: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Outcome::Err(error) = &self {
            f(error);
        }
        self
    }
}

impl<T> Outcome<T, Error> {
    /// Builds a failed outcome from a dynamically typed value.
    ///
    /// The value must be an object with a string `message` field; `name` and
    /// a non-null `cause` are lifted, every other field becomes a property.
    /// Anything else is a misuse of the API and fails with
    /// [`ContractError::InvalidArgument`]. Plain property bags without a
    /// message belong in [`err_from_object`](crate::err_from_object).
    pub fn err_checked(value: Value) -> crate::error::Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(not_error_like());
        };
        let Some(Value::String(message)) = fields.remove("message") else {
            return Err(not_error_like());
        };

        let mut error = Error::new(message);
        if let Some(Value::String(name)) = fields.remove("name") {
            error = error.with_name(name);
        }
        if let Some(cause) = fields.remove("cause").filter(|cause| !cause.is_null()) {
            error = error.with_cause(Cause::Value(cause));
        }
        Ok(Outcome::Err(error.with_properties(fields)))
    }
}

fn not_error_like() -> ContractError {
    ContractError::invalid_argument(
        "`Outcome::err_checked` needs an error-like value with a string `message`; \
         use `err_from_object` to build an error from plain properties",
    )
}

impl<T, E: ErrorLike> Outcome<T, E> {
    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// On `Err`, unwinds with the stored error boxed as a
    /// `Box<dyn std::error::Error + Send + Sync>`. Catching combinators and
    /// wrappers recognise that payload, so the error keeps its message, and
    /// [`recover`](crate::recover) gives back the stored error itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use okerr::{Outcome, ok};
    ///
    /// let outcome: Outcome<i32> = ok(42);
    /// assert_eq!(outcome.unwrap(), 42);
    /// ```
    #[track_caller]
    #[allow(clippy::panic)]
    pub fn unwrap(self) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => {
                tracing::debug!(error = %error, "unwrap on Err, unwinding with stored error");
                unwind(Box::new(error))
            }
        }
    }

    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// On `Err`, unwinds with a new [`Error`] whose message is `message` and
    /// whose cause is the stored error, boxed the same way as in
    /// [`unwrap`](Outcome::unwrap).
    #[track_caller]
    #[allow(clippy::panic)]
    pub fn expect<S: Into<String>>(self, message: S) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => {
                let wrapped = Error::new(message).caused_by(error);
                tracing::debug!(error = %wrapped, "expect on Err, unwinding");
                unwind(Box::new(wrapped))
            }
        }
    }
}

#[track_caller]
#[allow(clippy::panic)]
fn unwind(error: Box<dyn std::error::Error + Send + Sync>) -> ! {
    panic::panic_any(error)
}

impl<T, E> Outcome<T, E>
where
    E: ErrorLike + From<Error>,
{
    /// Transforms the success value.
    ///
    /// `Err` passes through and `f` is not called. A panic in `f` becomes an
    /// `Err` holding the normalized panic payload. The panic hook still runs
    /// first, so the default hook prints the panic to stderr; replace it with
    /// [`std::panic::set_hook`] to keep caught panics quiet.
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Ok(value) => Outcome::from_result(catch("map", move || f(value))),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Chains another fallible step.
    ///
    /// The first `Err` in a chain of `pipe` calls is carried through to the
    /// end and none of the later steps run. A panic in `f` becomes an `Err`.
    ///
    /// ```
    /// use okerr::{Outcome, err_from_text, ok};
    ///
    /// let mut ran_last = false;
    /// let outcome: Outcome<i32> = ok(1)
    ///     .pipe(|n| ok(n + 1))
    ///     .pipe(|_| err_from_text("stage two failed"))
    ///     .pipe(|n: i32| {
    ///         ran_last = true;
    ///         ok(n * 10)
    ///     });
    /// assert!(outcome.is_error());
    /// assert!(!ran_last);
    /// ```
    pub fn pipe<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        match self {
            Outcome::Ok(value) => match catch("pipe", move || f(value)) {
                Ok(next) => next,
                Err(error) => Outcome::Err(error),
            },
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Folds both variants into one value.
    ///
    /// A panic in `on_ok` is normalized and handed to `on_err`, so
    /// `on_err` sees both real failures and faults in the success branch.
    /// A panic in `on_err` is not caught.
    pub fn match_with<U, OkFn, ErrFn>(self, on_ok: OkFn, on_err: ErrFn) -> U
    where
        OkFn: FnOnce(T) -> U,
        ErrFn: FnOnce(E) -> U,
    {
        match self {
            Outcome::Ok(value) => match catch("match_with", move || on_ok(value)) {
                Ok(folded) => folded,
                Err(error) => on_err(error),
            },
            Outcome::Err(error) => on_err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        Outcome::from_result(result)
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}
