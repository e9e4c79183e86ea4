//! Issue records and the open/closed state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::define_document_id;
use super::organization::OrganizationId;
use super::user::{User, UserId};

define_document_id! {
    /// Stable issue identifier.
    IssueId
}

/// Issue lifecycle state.
///
/// `Open` is the initial state, established at intake. The only legal
/// transition is open → closed; `Closed` is terminal and additionally blocks
/// answer submission and acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Accepting answers; may be closed by the owner or a matching admin.
    Open,
    /// Terminal. No operation ever reopens a closed issue.
    Closed,
}

impl IssueStatus {
    /// Whether the issue still accepts answers and transitions.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether the issue reached its terminal state.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Issue document stored under `issues/{issueId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    title: String,
    description: String,
    domain: String,
    created_by: UserId,
    created_by_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    organization_id: Option<OrganizationId>,
    status: IssueStatus,
    created_at: DateTime<Utc>,
}

impl Issue {
    /// Title shown in feeds.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Problem description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Expertise tag the issue was filed under.
    pub fn domain(&self) -> &str {
        self.domain.as_str()
    }

    /// Identifier of the posting user.
    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Denormalized display name of the posting user.
    pub fn created_by_name(&self) -> &str {
        self.created_by_name.as_str()
    }

    /// Organization the issue belongs to, when the poster is employed.
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.organization_id.as_ref()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> IssueStatus {
        self.status
    }

    /// Whether the given subject may close this issue: the owner always may,
    /// and a company admin may when the issue belongs to their organization.
    pub fn may_be_closed_by(&self, subject: &UserId, actor: &User) -> bool {
        if &self.created_by == subject {
            return true;
        }
        self.organization_id
            .as_ref()
            .is_some_and(|org| actor.administers(org))
    }
}

/// Issue document as written at intake, before the store assigns `createdAt`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    /// Title shown in feeds.
    pub title: String,
    /// Problem description.
    pub description: String,
    /// Expertise tag the issue is filed under.
    pub domain: String,
    /// Identifier of the posting user.
    pub created_by: UserId,
    /// Denormalized display name of the posting user.
    pub created_by_name: String,
    /// Attached only when the poster belongs to an organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Always [`IssueStatus::Open`] at intake.
    pub status: IssueStatus,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::user::{Role, User};
    use rstest::rstest;
    use serde_json::json;

    fn issue(owner: &str, organization_id: Option<&str>) -> Issue {
        serde_json::from_value(json!({
            "title": "Broken deploy",
            "description": "Pipeline fails on main",
            "domain": "Cloud",
            "createdBy": owner,
            "createdByName": "Ada",
            "organizationId": organization_id,
            "status": "open",
            "createdAt": "2026-01-02T03:04:05Z",
        }))
        .expect("valid issue document")
    }

    fn actor(role: Role, organization_id: Option<&str>) -> User {
        serde_json::from_value(json!({
            "name": "Cora",
            "email": "cora@example.com",
            "role": serde_json::to_value(role).expect("role serializes"),
            "domain": "Cloud",
            "organizationId": organization_id,
            "status": "active",
            "createdAt": "2026-01-02T03:04:05Z",
        }))
        .expect("valid profile document")
    }

    #[test]
    fn status_tags_are_snake_case() {
        assert_eq!(
            serde_json::to_value(IssueStatus::Closed).expect("serializes"),
            json!("closed")
        );
        assert!(IssueStatus::Open.is_open());
        assert!(IssueStatus::Closed.is_closed());
    }

    #[rstest]
    // owner closes regardless of role or organization
    #[case("u1", None, Role::General, None, "u1", true)]
    // matching-organization admin closes a non-owned issue
    #[case("u1", Some("org-1"), Role::CompanyAdmin, Some("org-1"), "u2", true)]
    // admin of a different organization may not
    #[case("u1", Some("org-1"), Role::CompanyAdmin, Some("org-2"), "u2", false)]
    // admin may not close an issue with no organization
    #[case("u1", None, Role::CompanyAdmin, Some("org-1"), "u2", false)]
    // employees never close on behalf of others
    #[case("u1", Some("org-1"), Role::CompanyEmployee, Some("org-1"), "u2", false)]
    fn close_authorization_matrix(
        #[case] owner: &str,
        #[case] issue_org: Option<&str>,
        #[case] role: Role,
        #[case] actor_org: Option<&str>,
        #[case] subject: &str,
        #[case] expected: bool,
    ) {
        let issue = issue(owner, issue_org);
        let subject = UserId::new(subject).expect("valid user id");
        let actor = actor(role, actor_org);
        assert_eq!(issue.may_be_closed_by(&subject, &actor), expected);
    }

    #[test]
    fn new_issue_omits_absent_organization() {
        let record = NewIssue {
            title: "t".to_owned(),
            description: "d".to_owned(),
            domain: "AI".to_owned(),
            created_by: UserId::new("u1").expect("valid id"),
            created_by_name: "Ada".to_owned(),
            organization_id: None,
            status: IssueStatus::Open,
        };
        let value = serde_json::to_value(&record).expect("serializes");
        assert!(value.get("organizationId").is_none());
        assert_eq!(value.get("status"), Some(&json!("open")));
        assert!(value.get("createdAt").is_none());
    }
}
