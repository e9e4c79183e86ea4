//! Issue intake service.
//!
//! Creates issues in their initial open state, denormalizing the poster's
//! display name and attaching the poster's organization when they have one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::issue::{IssueId, IssueStatus, NewIssue};
use crate::domain::ports::{
    DocumentRef, DocumentStore, IssueIntake, PostIssueRequest, PostIssueResponse,
};
use crate::domain::user::User;
use crate::domain::workflow_service::map_transact_error;

/// Intake service creating issues against the document store.
#[derive(Clone)]
pub struct IssueIntakeService<S> {
    store: Arc<S>,
}

impl<S> IssueIntakeService<S> {
    /// Create a new intake service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> IssueIntake for IssueIntakeService<S>
where
    S: DocumentStore + 'static,
{
    async fn post_issue(&self, request: PostIssueRequest) -> Result<PostIssueResponse, Error> {
        let PostIssueRequest {
            title,
            description,
            domain,
            subject,
        } = request;

        let issue_id = self
            .store
            .transact(move |tx| {
                let poster: User = tx
                    .get(&DocumentRef::user(&subject))?
                    .ok_or_else(|| Error::not_found("user profile not found"))?;

                let issue_id = IssueId::generate();
                tx.create(
                    &DocumentRef::issue(&issue_id),
                    &NewIssue {
                        title: title.clone(),
                        description: description.clone(),
                        domain: domain.clone(),
                        created_by: subject.clone(),
                        created_by_name: poster.display_label().to_owned(),
                        organization_id: poster.organization_id().cloned(),
                        status: IssueStatus::Open,
                    },
                )?;
                Ok(issue_id)
            })
            .await
            .map_err(map_transact_error)?;

        Ok(PostIssueResponse { issue_id })
    }
}

#[cfg(test)]
#[path = "issue_intake_service_tests.rs"]
mod tests;
