//! Decoding of URL-encoded form bodies into domain submissions.

use actix_web::web;

use crate::domain::SubmissionInput;

/// Body type shared by the form-submission endpoints.
///
/// Decoding into pairs keeps duplicate keys visible so last-wins resolution
/// happens in [`SubmissionInput`] rather than in the framework.
pub type FormBody = web::Form<Vec<(String, String)>>;

/// Flatten a decoded form body into a submission snapshot.
pub fn submission(body: FormBody) -> SubmissionInput {
    SubmissionInput::from_pairs(body.into_inner())
}
