use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::{atomic, Atomic, ReadExecutor};

/// Error kinds for docflux operations.
///
/// This enum represents all failure categories that can surface from a
/// subscription. Every store-side failure is caught at the executor boundary
/// and delivered to the consumer as a single `on_error` signal carrying a
/// [`DocfluxError`] with one of these kinds.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::errors::{DocfluxError, ErrorKind, DocfluxResult};
///
/// fn example() -> DocfluxResult<()> {
///     Err(DocfluxError::new("store is closed", ErrorKind::ConnectionFailure))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The client or store has been closed and can no longer serve operations.
    ConnectionFailure,
    /// The store rejected the operation (e.g. malformed filter operand,
    /// invalid update specification).
    OperationFailure,
    /// Error during filter construction or evaluation.
    FilterError,
    /// The configured operation timeout expired before the subscription
    /// reached a terminal state.
    Timeout,
    /// Internal protocol breach: an item delivery was attempted against zero
    /// outstanding demand. Fatal to the affected subscription.
    ProtocolViolation,
    /// The operation is not valid in the current context (e.g. empty document
    /// key, manual assignment of the reserved id field).
    InvalidOperation,
    /// Internal error (usually indicates a bug).
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConnectionFailure => write!(f, "Connection failure"),
            ErrorKind::OperationFailure => write!(f, "Operation failure"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::ProtocolViolation => write!(f, "Protocol violation"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom docflux error type.
///
/// `DocfluxError` encapsulates error information including the error message,
/// kind, and optional cause. It supports error chaining and backtraces for
/// debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::errors::{DocfluxError, ErrorKind};
///
/// // Create a simple error
/// let err = DocfluxError::new("malformed filter", ErrorKind::OperationFailure);
///
/// // Create an error with a cause
/// let cause = DocfluxError::new("operand is an array", ErrorKind::FilterError);
/// let err = DocfluxError::new_with_cause("query rejected", ErrorKind::OperationFailure, cause);
/// ```
///
/// # Type alias
///
/// The `DocfluxResult<T>` type alias is equivalent to `Result<T, DocfluxError>`
/// and is used throughout the codebase for operations that can fail.
#[derive(Clone)]
pub struct DocfluxError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocfluxError>>,
    backtrace: Atomic<Backtrace>,
}

impl DocfluxError {
    /// Creates a new `DocfluxError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    ///
    /// # Returns
    ///
    /// A new `DocfluxError` instance.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocfluxError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `DocfluxError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error that caused this error
    ///
    /// # Returns
    ///
    /// A new `DocfluxError` instance with the cause error attached.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocfluxError) -> Self {
        DocfluxError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<DocfluxError>> {
        self.cause.as_ref()
    }
}

impl Display for DocfluxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocfluxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => self
                .backtrace
                .read_with(|backtrace| write!(f, "{}\n{:?}", self.message, backtrace)),
        }
    }
}

impl Error for DocfluxError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docflux operations.
///
/// `DocfluxResult<T>` is shorthand for `Result<T, DocfluxError>`.
/// All fallible docflux operations return this type.
pub type DocfluxResult<T> = Result<T, DocfluxError>;

#[cfg(feature = "serde")]
impl serde::de::Error for DocfluxError {
    fn custom<T: Display>(msg: T) -> Self {
        DocfluxError::new(&msg.to_string(), ErrorKind::InternalError)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for DocfluxError {
    fn custom<T: Display>(msg: T) -> Self {
        DocfluxError::new(&msg.to_string(), ErrorKind::InternalError)
    }
}

// From trait implementations for automatic error conversion
impl From<std::io::Error> for DocfluxError {
    fn from(err: std::io::Error) -> Self {
        DocfluxError::new(&format!("IO error: {}", err), ErrorKind::ConnectionFailure)
    }
}

impl From<std::num::ParseIntError> for DocfluxError {
    fn from(err: std::num::ParseIntError) -> Self {
        DocfluxError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidOperation,
        )
    }
}

impl From<regex::Error> for DocfluxError {
    fn from(err: regex::Error) -> Self {
        DocfluxError::new(
            &format!("Invalid regex pattern: {}", err),
            ErrorKind::FilterError,
        )
    }
}

impl From<String> for DocfluxError {
    fn from(msg: String) -> Self {
        DocfluxError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for DocfluxError {
    fn from(msg: &str) -> Self {
        DocfluxError::new(msg, ErrorKind::InternalError)
    }
}
