//! Transactional workflow services.
//!
//! Each operation is one `transact` body: authorization, precondition
//! checks, and mutation all observe the same snapshot, so concurrent callers
//! are serialized by the store's conflict detection rather than by locks.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::answer::{Answer, AnswerId, NewAnswer};
use crate::domain::error::Error;
use crate::domain::issue::Issue;
use crate::domain::ports::{
    AcceptAnswerRequest, CloseIssueRequest, DocumentRef, DocumentStore, DocumentStoreError,
    SubmitAnswerRequest, SubmitAnswerResponse, TransactError, WorkflowCommand,
};
use crate::domain::user::User;

/// Points awarded to an answer's author when the answer is accepted.
pub const ACCEPTED_ANSWER_POINTS: i64 = 10;

/// Map adapter failures onto workflow errors; body aborts pass through.
pub(crate) fn map_transact_error(error: TransactError) -> Error {
    match error {
        TransactError::Aborted(error) => error,
        TransactError::Store(error) => map_store_error(error),
    }
}

fn map_store_error(error: DocumentStoreError) -> Error {
    match error {
        DocumentStoreError::Conflict { attempts } => Error::conflict(format!(
            "operation aborted after {attempts} conflicting attempts; retry the request"
        )),
        DocumentStoreError::Missing { path } => Error::not_found(format!("{path} does not exist")),
        DocumentStoreError::InvalidTransform { path, field } => {
            Error::internal(format!("field {field} of {path} is not a counter"))
        }
        DocumentStoreError::Serialization { message } => Error::internal(message),
        DocumentStoreError::Backend { message } => Error::service_unavailable(message),
    }
}

/// Workflow service executing the core mutations against the document store.
#[derive(Clone)]
pub struct WorkflowService<S> {
    store: Arc<S>,
}

impl<S> WorkflowService<S> {
    /// Create a new workflow service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> WorkflowCommand for WorkflowService<S>
where
    S: DocumentStore + 'static,
{
    async fn submit_answer(
        &self,
        request: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, Error> {
        let SubmitAnswerRequest {
            issue_id,
            text,
            subject,
        } = request;

        let answer_id = self
            .store
            .transact(move |tx| {
                let issue: Issue = tx
                    .get(&DocumentRef::issue(&issue_id))?
                    .ok_or_else(|| Error::not_found("issue not found"))?;
                if !issue.status().is_open() {
                    return Err(Error::invalid_state("issue is closed"));
                }

                let author: User = tx
                    .get(&DocumentRef::user(&subject))?
                    .ok_or_else(|| Error::not_found("user not found"))?;
                if !author.may_author_answers() {
                    return Err(Error::forbidden("company admins cannot answer issues"));
                }

                // Minted per attempt: a conflict retry must not collide with
                // the id its own earlier attempt asserted absent.
                let answer_id = AnswerId::generate();
                tx.create(
                    &DocumentRef::answer(&issue_id, &answer_id),
                    &NewAnswer {
                        text: text.clone(),
                        created_by: subject.clone(),
                        is_accepted: false,
                    },
                )?;
                Ok(answer_id)
            })
            .await
            .map_err(map_transact_error)?;

        Ok(SubmitAnswerResponse { answer_id })
    }

    async fn accept_answer(&self, request: AcceptAnswerRequest) -> Result<(), Error> {
        let AcceptAnswerRequest {
            issue_id,
            answer_id,
            subject,
        } = request;

        self.store
            .transact(move |tx| {
                let issue: Issue = tx
                    .get(&DocumentRef::issue(&issue_id))?
                    .ok_or_else(|| Error::not_found("issue not found"))?;
                if !issue.status().is_open() {
                    return Err(Error::invalid_state("issue is closed"));
                }
                if issue.created_by() != &subject {
                    return Err(Error::forbidden("only the issue owner may accept an answer"));
                }

                let answer_ref = DocumentRef::answer(&issue_id, &answer_id);
                let answer: Answer = tx
                    .get(&answer_ref)?
                    .ok_or_else(|| Error::not_found("answer not found"))?;
                if answer.is_accepted() {
                    return Err(Error::already_accepted("answer already accepted"));
                }

                tx.update(&answer_ref, json!({ "isAccepted": true }))?;
                let author_ref = DocumentRef::user(answer.created_by());
                tx.increment(&author_ref, "points", ACCEPTED_ANSWER_POINTS);
                tx.increment(&author_ref, "answersCount", 1);
                Ok(())
            })
            .await
            .map_err(map_transact_error)
    }

    async fn close_issue(&self, request: CloseIssueRequest) -> Result<(), Error> {
        let CloseIssueRequest { issue_id, subject } = request;

        self.store
            .transact(move |tx| {
                let issue_ref = DocumentRef::issue(&issue_id);
                let issue: Issue = tx
                    .get(&issue_ref)?
                    .ok_or_else(|| Error::not_found("issue not found"))?;
                if issue.status().is_closed() {
                    return Err(Error::already_closed("issue already closed"));
                }

                let actor: User = tx
                    .get(&DocumentRef::user(&subject))?
                    .ok_or_else(|| Error::not_found("user not found"))?;
                if !issue.may_be_closed_by(&subject, &actor) {
                    return Err(Error::forbidden("not authorized to close this issue"));
                }

                tx.update(&issue_ref, json!({ "status": "closed" }))?;
                Ok(())
            })
            .await
            .map_err(map_transact_error)
    }
}

#[cfg(test)]
#[path = "workflow_service_tests.rs"]
mod tests;
