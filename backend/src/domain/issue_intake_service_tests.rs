//! Tests for the issue intake service against the in-memory store.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::issue::Issue;
use crate::domain::organization::OrganizationId;
use crate::domain::user::{NewUser, Role, UserDraft, UserId, UserStatus};
use crate::outbound::store::MemoryDocumentStore;

fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

async fn seed_user(
    store: &Arc<MemoryDocumentStore>,
    id: &str,
    name: &str,
    role: Role,
    org: Option<&str>,
) {
    let doc = DocumentRef::user(&user_id(id));
    let record = NewUser::from(UserDraft {
        name: name.to_owned(),
        email: format!("{id}@example.com"),
        role,
        domain: "Cloud".to_owned(),
        organization_id: org.map(|raw| OrganizationId::new(raw).expect("valid organization id")),
        status: UserStatus::Active,
    });
    store
        .transact(move |tx| tx.create(&doc, &record))
        .await
        .expect("user seeds");
}

fn request(subject: &str) -> PostIssueRequest {
    PostIssueRequest {
        title: "Broken deploy".to_owned(),
        description: "Pipeline fails on main".to_owned(),
        domain: "Cloud".to_owned(),
        subject: user_id(subject),
    }
}

fn read_issue(store: &MemoryDocumentStore, id: &IssueId) -> Issue {
    store
        .read(&DocumentRef::issue(id))
        .expect("issue reads")
        .expect("issue exists")
}

#[tokio::test]
async fn post_issue_creates_an_open_issue_with_denormalized_name() {
    let store = Arc::new(MemoryDocumentStore::default());
    seed_user(&store, "u1", "Ada", Role::General, None).await;
    let service = IssueIntakeService::new(Arc::clone(&store));

    let response = service.post_issue(request("u1")).await.expect("intake succeeds");

    let issue = read_issue(&store, &response.issue_id);
    assert!(issue.status().is_open());
    assert_eq!(issue.created_by(), &user_id("u1"));
    assert_eq!(issue.created_by_name(), "Ada");
    assert!(issue.organization_id().is_none());
}

#[tokio::test]
async fn post_issue_attaches_the_poster_organization() {
    let store = Arc::new(MemoryDocumentStore::default());
    seed_user(&store, "emp", "Bea", Role::CompanyEmployee, Some("org-1")).await;
    let service = IssueIntakeService::new(Arc::clone(&store));

    let response = service.post_issue(request("emp")).await.expect("intake succeeds");

    let issue = read_issue(&store, &response.issue_id);
    assert_eq!(
        issue.organization_id().map(OrganizationId::as_str),
        Some("org-1")
    );
}

#[tokio::test]
async fn post_issue_without_a_profile_is_not_found() {
    let store = Arc::new(MemoryDocumentStore::default());
    let service = IssueIntakeService::new(Arc::clone(&store));

    let mut events = store.subscribe();
    let err = service
        .post_issue(request("stranger"))
        .await
        .expect_err("missing profile rejected");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(events.try_recv().is_err(), "no document was committed");
}

#[tokio::test]
async fn post_issue_falls_back_to_email_for_blank_names() {
    let store = Arc::new(MemoryDocumentStore::default());
    seed_user(&store, "u9", "  ", Role::General, None).await;
    let service = IssueIntakeService::new(Arc::clone(&store));

    let response = service.post_issue(request("u9")).await.expect("intake succeeds");

    let issue = read_issue(&store, &response.issue_id);
    assert_eq!(issue.created_by_name(), "u9@example.com");
}
