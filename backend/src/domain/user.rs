//! User profile records and the closed role/status variant sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::define_document_id;
use super::organization::OrganizationId;

define_document_id! {
    /// Stable user identifier issued by the external identity provider.
    UserId
}

/// Closed set of user roles.
///
/// Every authorization checkpoint matches on this enum exhaustively; there is
/// no string comparison of roles anywhere in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Individual user with no organization affiliation.
    General,
    /// Employee of a registered organization.
    CompanyEmployee,
    /// Administrator of a registered organization.
    CompanyAdmin,
}

/// Account approval status. Stored on the profile; the workflow operations
/// never consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Awaiting approval.
    Pending,
    /// Approved and active.
    Active,
    /// Approval was declined.
    Rejected,
}

/// User profile document stored under `users/{userId}`.
///
/// `points` and `answersCount` default to zero when absent because the store
/// creates those fields lazily through the increment primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    name: String,
    email: String,
    role: Role,
    domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    organization_id: Option<OrganizationId>,
    status: UserStatus,
    #[serde(default)]
    points: u64,
    #[serde(default)]
    answers_count: u64,
    created_at: DateTime<Utc>,
}

impl User {
    /// Display name shown on content this user authors, falling back to the
    /// email address and finally a placeholder.
    pub fn display_label(&self) -> &str {
        if !self.name.trim().is_empty() {
            return self.name.as_str();
        }
        if !self.email.trim().is_empty() {
            return self.email.as_str();
        }
        "Anonymous"
    }

    /// Role assigned at signup.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Expertise tag chosen at signup.
    pub fn domain(&self) -> &str {
        self.domain.as_str()
    }

    /// Organization this user belongs to, when employed by one.
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.organization_id.as_ref()
    }

    /// Account approval status.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Points awarded for accepted answers.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Number of this user's answers that were accepted.
    pub fn answers_count(&self) -> u64 {
        self.answers_count
    }

    /// Whether this user may author answers. Company admins accept and close
    /// on behalf of their organization but never answer.
    pub fn may_author_answers(&self) -> bool {
        match self.role {
            Role::General | Role::CompanyEmployee => true,
            Role::CompanyAdmin => false,
        }
    }

    /// Whether this user administers the given organization.
    pub fn administers(&self, organization: &OrganizationId) -> bool {
        match self.role {
            Role::CompanyAdmin => self.organization_id.as_ref() == Some(organization),
            Role::General | Role::CompanyEmployee => false,
        }
    }
}

/// Builder-free constructor bundle for seeding and tests.
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role assigned at signup.
    pub role: Role,
    /// Expertise tag.
    pub domain: String,
    /// Organization membership, for employees and admins.
    pub organization_id: Option<OrganizationId>,
    /// Approval status.
    pub status: UserStatus,
}

/// User document as written at signup, before the store assigns `createdAt`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    name: String,
    email: String,
    role: Role,
    domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_id: Option<OrganizationId>,
    status: UserStatus,
    points: u64,
    answers_count: u64,
}

impl From<UserDraft> for NewUser {
    fn from(draft: UserDraft) -> Self {
        Self {
            name: draft.name,
            email: draft.email,
            role: draft.role,
            domain: draft.domain,
            organization_id: draft.organization_id,
            status: draft.status,
            points: 0,
            answers_count: 0,
        }
    }
}
