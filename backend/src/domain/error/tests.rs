//! Tests for the error payload construction and serde bridge.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::invalid_request(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::unauthorized(Error::unauthorized("no auth"), ErrorCode::Unauthorized)]
#[case::forbidden(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_codes(#[case] err: Error, #[case] expected: ErrorCode) {
    assert_eq!(err.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn details_round_trip_through_builder() {
    let err = Error::invalid_request("bad").with_details(json!({"field": "dueOn"}));
    assert_eq!(err.details(), Some(&json!({"field": "dueOn"})));
}

#[rstest]
fn serialises_to_camel_case_payload() {
    let err = Error::invalid_request("bad").with_details(json!({"field": "status"}));
    let value = serde_json::to_value(&err).expect("error serialises");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "bad",
            "details": {"field": "status"},
        })
    );
}

#[rstest]
fn details_are_omitted_when_absent() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("error serialises");
    assert_eq!(value, json!({"code": "not_found", "message": "missing"}));
}

#[rstest]
fn deserialisation_rejects_empty_messages() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({"code": "internal_error", "message": "  "}));
    assert!(result.is_err());
}

#[rstest]
fn deserialisation_preserves_details() {
    let err: Error = serde_json::from_value(json!({
        "code": "invalid_request",
        "message": "bad",
        "details": {"field": "name"},
    }))
    .expect("payload deserialises");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details(), Some(&json!({"field": "name"})));
}

#[rstest]
fn display_prints_the_message() {
    assert_eq!(Error::internal("boom").to_string(), "boom");
}
