//! Organization records. Referenced by issues and profiles, never mutated by
//! the workflow.

use serde::{Deserialize, Serialize};

use super::id::define_document_id;

define_document_id! {
    /// Stable organization identifier.
    OrganizationId
}

/// Organization document stored under `organizations/{orgId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    name: String,
}

impl Organization {
    /// Build an organization record.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Display name of the organization.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
