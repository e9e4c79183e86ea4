//! Demo dataset and startup seeding.

use tracing::info;

use crate::domain::ports::{DocumentRef, DocumentStore};
use crate::domain::workflow_service::map_transact_error;
use crate::domain::{
    Error, IssueId, IssueStatus, NewIssue, NewUser, OrganizationId, Role, UserDraft, UserId,
    UserStatus,
};
use crate::outbound::store::MemoryDocumentStore;

const DEMO_ORG: &str = "acme";

struct DemoUser {
    id: &'static str,
    token: &'static str,
    name: &'static str,
    role: Role,
    member_of_demo_org: bool,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        id: "ada",
        token: "token-ada",
        name: "Ada",
        role: Role::General,
        member_of_demo_org: false,
    },
    DemoUser {
        id: "bea",
        token: "token-bea",
        name: "Bea",
        role: Role::CompanyEmployee,
        member_of_demo_org: true,
    },
    DemoUser {
        id: "cora",
        token: "token-cora",
        name: "Cora",
        role: Role::CompanyAdmin,
        member_of_demo_org: true,
    },
];

struct DemoIssue {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    domain: &'static str,
    posted_by: &'static str,
}

const DEMO_ISSUES: &[DemoIssue] = &[
    DemoIssue {
        id: "demo-issue-cloud",
        title: "Deploy pipeline stalls",
        description: "The staging deploy hangs at the migration step.",
        domain: "Cloud",
        posted_by: "ada",
    },
    DemoIssue {
        id: "demo-issue-acme",
        title: "Internal wiki search is broken",
        description: "Search returns no results since the index rebuild.",
        domain: "Web",
        posted_by: "bea",
    },
];

/// Outcome of a startup seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleDataSeedOutcome {
    /// Documents were created.
    Seeded {
        /// Number of user profiles created.
        users: usize,
        /// Number of issues created.
        issues: usize,
    },
    /// The dataset already exists; nothing was written.
    AlreadyPresent,
}

/// Static `(token, subject)` pairs matching the seeded profiles, for wiring a
/// development identity gate.
pub fn demo_tokens() -> Vec<(String, UserId)> {
    DEMO_USERS
        .iter()
        .map(|user| {
            let id = UserId::new(user.id).unwrap_or_else(|err| {
                panic!("demo user id {:?} must be addressable: {err}", user.id)
            });
            (user.token.to_owned(), id)
        })
        .collect()
}

fn demo_org_id() -> OrganizationId {
    OrganizationId::new(DEMO_ORG)
        .unwrap_or_else(|err| panic!("demo organization id must be addressable: {err}"))
}

fn demo_user_record(user: &DemoUser) -> NewUser {
    NewUser::from(UserDraft {
        name: user.name.to_owned(),
        email: format!("{}@example.com", user.id),
        role: user.role,
        domain: "Cloud".to_owned(),
        organization_id: user.member_of_demo_org.then(demo_org_id),
        status: UserStatus::Active,
    })
}

/// Seed the demo dataset unless it is already present.
///
/// # Errors
///
/// Propagates store failures as domain errors; a partially failed seeding
/// run leaves no documents behind because everything commits in one
/// transaction.
pub async fn seed_example_data(
    store: &MemoryDocumentStore,
) -> Result<ExampleDataSeedOutcome, Error> {
    let marker = DocumentRef::organization(&demo_org_id());
    if store
        .read::<serde_json::Value>(&marker)
        .map_err(|err| Error::internal(err.to_string()))?
        .is_some()
    {
        return Ok(ExampleDataSeedOutcome::AlreadyPresent);
    }

    store
        .transact(move |tx| {
            tx.create(
                &DocumentRef::organization(&demo_org_id()),
                &crate::domain::Organization::new("Acme Corp"),
            )?;

            for user in DEMO_USERS {
                let id = UserId::new(user.id)
                    .map_err(|err| Error::internal(format!("demo user id: {err}")))?;
                tx.create(&DocumentRef::user(&id), &demo_user_record(user))?;
            }

            for issue in DEMO_ISSUES {
                let id = IssueId::new(issue.id)
                    .map_err(|err| Error::internal(format!("demo issue id: {err}")))?;
                // Profiles were created by this same transaction and are not
                // yet readable, so denormalize from the table directly.
                let poster_meta = DEMO_USERS
                    .iter()
                    .find(|user| user.id == issue.posted_by)
                    .ok_or_else(|| {
                        Error::internal("demo issues must reference seeded users")
                    })?;
                let poster = UserId::new(issue.posted_by)
                    .map_err(|err| Error::internal(format!("demo user id: {err}")))?;
                tx.create(
                    &DocumentRef::issue(&id),
                    &NewIssue {
                        title: issue.title.to_owned(),
                        description: issue.description.to_owned(),
                        domain: issue.domain.to_owned(),
                        created_by: poster,
                        created_by_name: poster_meta.name.to_owned(),
                        organization_id: poster_meta.member_of_demo_org.then(demo_org_id),
                        status: IssueStatus::Open,
                    },
                )?;
            }
            Ok(())
        })
        .await
        .map_err(map_transact_error)?;

    info!(
        users = DEMO_USERS.len(),
        issues = DEMO_ISSUES.len(),
        "seeded example data"
    );
    Ok(ExampleDataSeedOutcome::Seeded {
        users: DEMO_USERS.len(),
        issues: DEMO_ISSUES.len(),
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Issue;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryDocumentStore::default();

        let first = seed_example_data(&store).await.expect("first run seeds");
        assert_eq!(
            first,
            ExampleDataSeedOutcome::Seeded { users: 3, issues: 2 }
        );

        let second = seed_example_data(&store).await.expect("second run skips");
        assert_eq!(second, ExampleDataSeedOutcome::AlreadyPresent);
    }

    #[tokio::test]
    async fn seeded_issues_carry_their_poster_organization() {
        let store = MemoryDocumentStore::default();
        seed_example_data(&store).await.expect("seeding succeeds");

        let issue: Issue = store
            .read(&DocumentRef::issue(
                &IssueId::new("demo-issue-acme").expect("valid id"),
            ))
            .expect("issue reads")
            .expect("issue exists");
        assert_eq!(
            issue.organization_id().map(OrganizationId::as_str),
            Some(DEMO_ORG)
        );
        assert!(issue.status().is_open());
    }

    #[test]
    fn demo_tokens_cover_every_seeded_user() {
        let tokens = demo_tokens();
        assert_eq!(tokens.len(), DEMO_USERS.len());
    }
}
