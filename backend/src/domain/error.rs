//! Transport-agnostic failure type shared by every inbound adapter.
//!
//! Each adapter decides the final shape: the HTTP layer maps these onto
//! status codes and JSON bodies, the WebSocket layer onto close frames.
//! Expected operation failures (validation, expired sessions, masked
//! persistence faults) travel in the [`crate::domain::outcome::ActionResult`]
//! envelope instead; this type covers the surfaces outside that contract,
//! such as the sign-in flow and malformed query strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Machine-readable code naming the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation or could not be understood.
    InvalidRequest,
    /// No signed-in account, or the session is no longer valid.
    Unauthorized,
    /// The account may not act on the addressed resource.
    Forbidden,
    /// Nothing exists under the requested identifier.
    NotFound,
    /// A fault inside the domain that callers cannot fix.
    InternalError,
}

/// Error payload surfaced outside the action envelope.
///
/// ## Invariants
/// - `message` is never blank after trimming.
///
/// # Examples
/// ```
/// use daylist_backend::domain::{Error, ErrorCode};
///
/// let err = Error::unauthorized("session expired");
/// assert_eq!(err.code(), ErrorCode::Unauthorized);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorRepr", into = "ErrorRepr")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "unknown sign-in provider")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Rejections produced by the validating constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The supplied message was empty once trimmed.
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => f.write_str("message must not be blank"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Like [`Self::try_new`] but panics on a blank message; meant for
    /// statically known messages.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(error) => error,
            Err(err) => panic!("error construction rejected: {err}"),
        }
    }

    /// Validating constructor; rejects blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Machine-readable failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message shown to the caller.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured context attached to the error, if any.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Carry structured context alongside the message.
    ///
    /// # Examples
    /// ```
    /// use daylist_backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad")
    ///     .with_details(json!({ "field": "dueOn" }));
    /// assert_eq!(err.details(), Some(&json!({ "field": "dueOn" })));
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Shorthand for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Shorthand for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Shorthand for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Shorthand for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Shorthand for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

// Serde funnels construction through `try_new` via this mirror struct, so a
// deserialised payload honours the same invariants as a constructed one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorRepr {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorRepr {
    fn from(value: Error) -> Self {
        let Error {
            code,
            message,
            details,
        } = value;
        Self {
            code,
            message,
            details,
        }
    }
}

impl TryFrom<ErrorRepr> for Error {
    type Error = ErrorValidationError;

    fn try_from(repr: ErrorRepr) -> Result<Self, Self::Error> {
        let validated = Self::try_new(repr.code, repr.message)?;
        Ok(Self {
            details: repr.details,
            ..validated
        })
    }
}

#[cfg(test)]
mod tests;
