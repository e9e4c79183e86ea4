//! Domain-level error type.
//!
//! Transport agnostic: inbound adapters translate [`Error`] into HTTP
//! responses, and outbound adapters map their own failures into it through
//! the port error types. Every workflow failure carries a stable
//! machine-readable [`ErrorCode`] so callers can distinguish failure kinds
//! without parsing messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::trace::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or missing a required field.
    InvalidRequest,
    /// Authentication failed or the bearer credential is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested issue, answer, or user does not exist.
    NotFound,
    /// The issue is not open, so the operation cannot proceed.
    InvalidState,
    /// The issue was already closed by an earlier request.
    AlreadyClosed,
    /// The answer was already accepted by an earlier request.
    AlreadyAccepted,
    /// The transaction lost its conflict-retry budget against concurrent
    /// writers.
    Conflict,
    /// A collaborating backend (store, identity provider) is unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// Captures the ambient [`TraceId`] at construction time so adapters can
/// correlate the failure across logs and responses without threading the
/// identifier through every call.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("issue not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Attach a trace identifier, replacing any captured one.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details for clients.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "issueId" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier propagated into the response header.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidState`].
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// Convenience constructor for [`ErrorCode::AlreadyClosed`].
    pub fn already_closed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyClosed, message)
    }

    /// Convenience constructor for [`ErrorCode::AlreadyAccepted`].
    pub fn already_accepted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyAccepted, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
    #[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
    #[case(Error::forbidden("x"), ErrorCode::Forbidden)]
    #[case(Error::not_found("x"), ErrorCode::NotFound)]
    #[case(Error::invalid_state("x"), ErrorCode::InvalidState)]
    #[case(Error::already_closed("x"), ErrorCode::AlreadyClosed)]
    #[case(Error::already_accepted("x"), ErrorCode::AlreadyAccepted)]
    #[case(Error::conflict("x"), ErrorCode::Conflict)]
    #[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
    #[case(Error::internal("x"), ErrorCode::InternalError)]
    fn constructors_set_codes(#[case] err: Error, #[case] expected: ErrorCode) {
        assert_eq!(err.code(), expected);
    }

    #[test]
    fn codes_serialize_snake_case() {
        let encoded = serde_json::to_value(ErrorCode::AlreadyAccepted).expect("serializes");
        assert_eq!(encoded, json!("already_accepted"));
        let round: ErrorCode = serde_json::from_value(json!("invalid_state")).expect("parses");
        assert_eq!(round, ErrorCode::InvalidState);
    }

    #[test]
    fn details_and_trace_id_round_trip() {
        let err = Error::forbidden("nope")
            .with_trace_id("abc")
            .with_details(json!({ "field": "issueId" }));

        let value = serde_json::to_value(&err).expect("error serializes");
        assert_eq!(value.get("code"), Some(&json!("forbidden")));
        assert_eq!(value.get("traceId"), Some(&json!("abc")));
        assert_eq!(
            value.get("details").and_then(|d| d.get("field")),
            Some(&json!("issueId"))
        );
    }

    #[tokio::test]
    async fn new_captures_trace_id_in_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
            .parse()
            .expect("valid UUID");
        let expected = trace_id.to_string();
        let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
        assert_eq!(error.trace_id(), Some(expected.as_str()));
    }

    #[test]
    fn new_leaves_trace_id_empty_out_of_scope() {
        let error = Error::internal("boom");
        assert!(error.trace_id().is_none());
    }
}
