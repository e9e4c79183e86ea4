//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialize every field as optional so that a missing field
//! produces the adapter's own error envelope instead of a framework
//! deserialization error. The helpers here turn those options into typed
//! identifiers with field-scoped details.

use serde_json::json;

use crate::domain::{AnswerId, Error, IssueId};

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} is not a valid identifier")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_id",
    }))
}

/// Require a field to be present, without constraining its content.
pub(crate) fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_issue_id(value: Option<String>, field: FieldName) -> Result<IssueId, Error> {
    let raw = require_field(value, field)?;
    IssueId::new(raw.as_str()).map_err(|_| invalid_id_error(field, &raw))
}

pub(crate) fn parse_answer_id(value: Option<String>, field: FieldName) -> Result<AnswerId, Error> {
    let raw = require_field(value, field)?;
    AnswerId::new(raw.as_str()).map_err(|_| invalid_id_error(field, &raw))
}
