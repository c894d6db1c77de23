//! OpenAPI schema definitions for the transport error type.
//!
//! The envelope and the aggregates it carries derive `ToSchema` directly
//! because they are the wire format. The transport [`crate::domain::Error`]
//! serialises through a DTO instead, so its OpenAPI shape is registered
//! here with utoipa's external schema support.

use utoipa::ToSchema;

/// Wire shape of [`crate::domain::ErrorCode`] for the OpenAPI document.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Request payload or parameters failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The caller must sign in before retrying.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The signed-in account does not own the resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// No resource exists under the requested identifier.
    #[schema(rename = "not_found")]
    NotFound,
    /// The server hit an unexpected fault.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Wire shape of [`crate::domain::Error`] for the OpenAPI document.
///
/// Error body returned by surfaces outside the envelope contract, such as
/// the sign-in flow and malformed query strings.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Registered with utoipa for documentation; never constructed at runtime"
)]
pub struct ErrorSchema {
    /// Machine-readable failure category.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message shown to the caller.
    #[schema(example = "unknown sign-in provider")]
    message: String,
    /// Structured context, such as the offending field and value.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use utoipa::PartialSchema;

    fn render_schema<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    // utoipa dots the module path when registering under `as`.
    #[rstest]
    #[case::code(ErrorCodeSchema::name().into_owned(), "crate.domain.ErrorCode")]
    #[case::payload(ErrorSchema::name().into_owned(), "crate.domain.Error")]
    fn names_register_under_the_domain_paths(#[case] name: String, #[case] expected: &str) {
        assert_eq!(name, expected);
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("unauthorized")]
    #[case("forbidden")]
    #[case("not_found")]
    #[case("internal_error")]
    fn every_wire_code_appears_in_the_schema(#[case] wire_name: &str) {
        let schema_json = render_schema::<ErrorCodeSchema>();
        assert!(schema_json.contains(wire_name), "missing {wire_name}");
    }

    #[rstest]
    fn error_schema_lists_the_payload_fields() {
        let schema_json = render_schema::<ErrorSchema>();
        for field in ["code", "message", "details"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
