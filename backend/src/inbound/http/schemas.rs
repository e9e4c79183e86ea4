//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their serialized shape and live in the inbound
//! adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or missing a required field.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or the bearer credential is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested issue, answer, or user does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The issue is not open, so the operation cannot proceed.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// The issue was already closed by an earlier request.
    #[schema(rename = "already_closed")]
    AlreadyClosed,
    /// The answer was already accepted by an earlier request.
    #[schema(rename = "already_accepted")]
    AlreadyAccepted,
    /// The transaction lost its conflict-retry budget.
    #[schema(rename = "conflict")]
    Conflict,
    /// A collaborating backend is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "only the issue owner may accept an answer")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn error_schema_builds() {
        let schema = ErrorSchema::schema();
        let rendered = serde_json::to_string(&schema).expect("schema serializes");
        assert!(rendered.contains("code"));
        assert!(rendered.contains("message"));
    }

    #[test]
    fn error_code_schema_lists_every_kind() {
        let schema = ErrorCodeSchema::schema();
        let rendered = serde_json::to_string(&schema).expect("schema serializes");
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "invalid_state",
            "already_closed",
            "already_accepted",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(rendered.contains(code), "schema should mention {code}");
        }
    }
}
