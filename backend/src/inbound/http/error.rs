//! Turns domain errors into HTTP responses.
//!
//! The domain error type knows nothing about HTTP; this adapter gives it a
//! status code and a JSON body. Envelope endpoints never take this path for
//! expected failures; it covers the surfaces outside the envelope contract,
//! such as malformed queries and the sign-in flow.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn redact_if_internal(error: &Error) -> Error {
    if error.code() == ErrorCode::InternalError {
        return Error::internal("Internal server error");
    }
    error.clone()
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Framework failures never reach clients verbatim.
        error!(error = %err, "actix error converted at the transport boundary");
        Error::internal("Internal server error")
    }
}
