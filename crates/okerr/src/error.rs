//! Error-like values carried by failed [`Outcome`](crate::Outcome)s.
//!
//! Anything implementing [`std::error::Error`] (and `Send + Sync + 'static`)
//! is [`ErrorLike`]. The crate also ships two concrete error values:
//!
//! - [`Error`]: a message, an optional [`Cause`], and an open property map.
//!   This is what normalization produces for caught panics.
//! - [`CustomError`]: a message and cause plus a typed property bag, used to
//!   attach structured data (status codes, subsystem names) to a failure.
//!
//! [`ContractError`] is separate: it reports misuse of the API itself and is
//! never carried inside an `Outcome`.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};

/// Name given to errors built with [`Error::new`].
pub const DEFAULT_ERROR_NAME: &str = "Error";

/// Name given to errors converted from a [`CustomError`].
pub const CUSTOM_ERROR_NAME: &str = "CustomError";

/// Message used when a caught value cannot be turned into an error.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Message used by custom errors whose properties carry no `message`.
pub const DEFAULT_CUSTOM_MESSAGE: &str = "Custom error";

/// Result type alias for operations that can violate the API contract.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Misuse of the `okerr` API.
///
/// These are programmer errors rather than domain failures, so they are
/// reported directly and never wrapped in an [`Outcome`](crate::Outcome).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ContractError {
    /// An argument did not satisfy the documented contract.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },
}

impl ContractError {
    /// Creates a new invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        ContractError::InvalidArgument {
            message: message.into(),
        }
    }
}

// ============================================================================
// ErrorLike
// ============================================================================

/// The capability every failure value must have: a message and an optional
/// cause.
///
/// Blanket-implemented for all `std::error::Error + Send + Sync + 'static`
/// types, so `thiserror` enums qualify without extra code.
pub trait ErrorLike: std::error::Error + Send + Sync + 'static {
    /// Human-readable message (the `Display` text).
    fn message(&self) -> String {
        self.to_string()
    }

    /// The underlying error, if any.
    fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source()
    }
}

impl<E> ErrorLike for E where E: std::error::Error + Send + Sync + 'static {}

// ============================================================================
// Cause
// ============================================================================

/// What a failure was caused by.
pub enum Cause {
    /// Another error.
    Error(Box<dyn std::error::Error + Send + Sync>),
    /// A structured value, e.g. a `cause` property or a non-object JSON
    /// panic payload.
    Value(Value),
    /// A panic payload of a type normalization does not recognise.
    Opaque(OpaquePayload),
}

impl Cause {
    /// Wraps an error as a cause.
    pub fn error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Cause::Error(Box::new(error))
    }

    /// Returns the cause as an error, if it is one.
    pub fn as_error(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Cause::Error(error) => {
                let error: &(dyn std::error::Error + 'static) = &**error;
                Some(error)
            }
            _ => None,
        }
    }

    /// Returns the cause as a JSON value, if it is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cause::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the opaque panic payload, if the cause is one.
    pub fn as_opaque(&self) -> Option<&OpaquePayload> {
        match self {
            Cause::Opaque(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<Value> for Cause {
    fn from(value: Value) -> Self {
        Cause::Value(value)
    }
}

impl From<Box<dyn Any + Send>> for Cause {
    fn from(payload: Box<dyn Any + Send>) -> Self {
        Cause::Opaque(OpaquePayload::new(payload))
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Cause::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Cause::Opaque(payload) => f.debug_tuple("Opaque").field(payload).finish(),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error(error) => write!(f, "{error}"),
            Cause::Value(value) => write!(f, "{value}"),
            Cause::Opaque(_) => f.write_str("<opaque panic payload>"),
        }
    }
}

/// A panic payload kept as the cause of an unknown error.
///
/// Payloads are only `Send`; the mutex makes the holder `Sync` so the
/// surrounding [`Error`] stays `ErrorLike`.
pub struct OpaquePayload(Mutex<Box<dyn Any + Send>>);

impl OpaquePayload {
    fn new(payload: Box<dyn Any + Send>) -> Self {
        Self(Mutex::new(payload))
    }

    /// Returns `true` if the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is::<T>()
    }

    /// Gives back the original payload, e.g. to `resume_unwind` with it.
    pub fn into_inner(self) -> Box<dyn Any + Send> {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for OpaquePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaquePayload(..)")
    }
}

// ============================================================================
// Error
// ============================================================================

/// A general-purpose error value.
///
/// `Display` prints the message only; `source()` is the cause when the cause
/// is itself an error.
#[derive(Debug)]
pub struct Error {
    name: Cow<'static, str>,
    message: String,
    cause: Option<Cause>,
    properties: Map<String, Value>,
}

impl Error {
    /// Creates an error with the given message.
    ///
    /// # Examples
    ///
    /// ```
    /// use okerr::Error;
    ///
    /// let err = Error::new("disk full");
    /// assert_eq!(err.message(), "disk full");
    /// assert_eq!(err.name(), "Error");
    /// ```
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            name: Cow::Borrowed(DEFAULT_ERROR_NAME),
            message: message.into(),
            cause: None,
            properties: Map::new(),
        }
    }

    /// Sets the error's name (its kind, e.g. `"DivisionError"`).
    pub fn with_name<S: Into<Cow<'static, str>>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the cause.
    pub fn with_cause<C: Into<Cause>>(mut self, cause: C) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Sets another error as the cause.
    pub fn caused_by<E>(self, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.with_cause(Cause::error(error))
    }

    /// Adds one extra property.
    pub fn with_property<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds extra properties; existing keys are overwritten.
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// The error's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The error's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error's cause.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// All extra properties.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// One extra property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Consumes the error, returning its cause.
    pub fn into_cause(self) -> Option<Cause> {
        self.cause
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().and_then(Cause::as_error)
    }
}

impl From<CustomError> for Error {
    fn from(custom: CustomError) -> Self {
        let CustomError {
            message,
            cause,
            props: mut properties,
        } = custom;
        properties.remove("message");
        properties.remove("cause");
        Self {
            name: Cow::Borrowed(CUSTOM_ERROR_NAME),
            message,
            cause,
            properties,
        }
    }
}

impl From<CustomError<Value>> for Error {
    fn from(custom: CustomError<Value>) -> Self {
        let CustomError {
            message,
            cause,
            props,
        } = custom;
        CustomError {
            message,
            cause,
            props: object_fields(props),
        }
        .into()
    }
}

// ============================================================================
// CustomError
// ============================================================================

/// An error carrying a typed bag of extra properties.
///
/// Built with [`create_custom_error`](crate::create_custom_error) or
/// [`err_from_object`](crate::err_from_object). Derefs to the property bag,
/// so typed fields read directly off the error.
///
/// ```
/// use okerr::create_custom_error;
/// use serde::Serialize;
///
/// #[derive(Default, Serialize)]
/// struct Http {
///     message: String,
///     status: u16,
/// }
///
/// let err = create_custom_error(Some(Http { message: "Not found".into(), status: 404 }));
/// assert_eq!(err.status, 404);
/// assert_eq!(err.message(), "Not found");
/// ```
#[derive(Debug)]
pub struct CustomError<P = Map<String, Value>> {
    message: String,
    cause: Option<Cause>,
    props: P,
}

impl<P> CustomError<P> {
    pub(crate) fn from_parts(message: String, cause: Option<Cause>, props: P) -> Self {
        Self {
            message,
            cause,
            props,
        }
    }

    /// The error's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error's cause.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// The property bag.
    pub fn props(&self) -> &P {
        &self.props
    }

    /// Consumes the error, returning the property bag.
    pub fn into_props(self) -> P {
        self.props
    }
}

impl<P: Serialize> CustomError<P> {
    /// Reads one property by name, through its serialized form.
    pub fn property(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(&self.props) {
            Ok(Value::Object(mut map)) => map.remove(key),
            _ => None,
        }
    }

    /// Flattens the property bag into an untyped [`Error`].
    pub fn into_error(self) -> Error {
        let props = serde_json::to_value(&self.props)
            .map(object_fields)
            .unwrap_or_default();
        CustomError {
            message: self.message,
            cause: self.cause,
            props,
        }
        .into()
    }
}

impl<P> Deref for CustomError<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.props
    }
}

impl<P> fmt::Display for CustomError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<P: fmt::Debug> std::error::Error for CustomError<P> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().and_then(Cause::as_error)
    }
}

impl From<Error> for CustomError {
    fn from(error: Error) -> Self {
        Self {
            message: error.message,
            cause: error.cause,
            props: error.properties,
        }
    }
}

fn object_fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
