//! Success/error envelope returned by every user-facing operation.
//!
//! Operations communicate expected failures (validation, expired sessions,
//! masked internal faults) as values, not as `Err`. The envelope has exactly
//! two shapes on the wire: `{"data": …}` or `{"errors": […]}`, and consumers
//! branch on which key is present before trusting the payload.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed message standing in for any unexpected internal failure.
///
/// The real cause is logged server-side and never reaches the caller.
pub const GENERIC_INTERNAL_MESSAGE: &str =
    "We are aware of this error and are working to fix it. Please try again later.";

/// A single user-facing problem with a submission.
///
/// `path` names the offending field; a generic failure that is not tied to
/// one field carries an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "name")]
    path: String,
    #[schema(example = "The task name is required.")]
    message: String,
}

impl FieldError {
    /// Build an error attached to the named field.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Field the error belongs to; empty for submission-wide failures.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Message shown to the user verbatim.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Tagged outcome of one operation.
///
/// ## Invariants
/// - Exactly one variant is ever present; there is no "success with errors".
/// - `Failure` carries at least one entry; constructors uphold this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ActionResult<T> {
    /// The operation completed; `data` is the persisted or fetched value.
    Success {
        /// Operation payload.
        data: T,
    },
    /// The operation was rejected or failed; nothing was persisted beyond
    /// what the errors describe.
    Failure {
        /// Ordered user-facing errors.
        errors: Vec<FieldError>,
    },
}

impl<T> ActionResult<T> {
    /// Wrap a completed operation's payload.
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Wrap per-field validation errors, preserving their order.
    pub fn failure(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            return Self::masked_internal();
        }
        Self::Failure { errors }
    }

    /// Wrap a submission-wide failure under the empty path.
    pub fn failure_message(message: impl Into<String>) -> Self {
        Self::Failure {
            errors: vec![FieldError::new("", message)],
        }
    }

    /// The fixed masked envelope for unexpected internal failures.
    pub fn masked_internal() -> Self {
        Self::failure_message(GENERIC_INTERNAL_MESSAGE)
    }

    /// Whether the success variant is present.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Payload of the success variant, if present.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Errors of the failure variant; empty for successes.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { errors } => errors.as_slice(),
        }
    }

    /// Convert into a [`Result`], forcing callers to branch.
    pub fn into_result(self) -> Result<T, Vec<FieldError>> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { errors } => Err(errors),
        }
    }

    /// Map the success payload, passing failures through untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Success { data } => ActionResult::Success { data: f(data) },
            Self::Failure { errors } => ActionResult::Failure { errors },
        }
    }
}
