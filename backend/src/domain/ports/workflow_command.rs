//! Driving port for the three core workflow mutations.
//!
//! Inbound adapters call this port after the identity gate has turned the
//! bearer credential into a subject id; requests therefore carry an already
//! verified subject rather than a raw token.

use async_trait::async_trait;

use crate::domain::answer::AnswerId;
use crate::domain::error::Error;
use crate::domain::issue::IssueId;
use crate::domain::user::UserId;

/// Request to record an answer under an open issue.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAnswerRequest {
    /// Issue being answered.
    pub issue_id: IssueId,
    /// Answer body. Emptiness is a client-side concern and not enforced.
    pub text: String,
    /// Verified caller subject.
    pub subject: UserId,
}

/// Response from recording an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAnswerResponse {
    /// Identifier minted for the new answer.
    pub answer_id: AnswerId,
}

/// Request to accept an answer and award its author.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptAnswerRequest {
    /// Issue the answer belongs to.
    pub issue_id: IssueId,
    /// Answer being accepted.
    pub answer_id: AnswerId,
    /// Verified caller subject; must be the issue owner.
    pub subject: UserId,
}

/// Request to transition an issue to its terminal closed state.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseIssueRequest {
    /// Issue to close.
    pub issue_id: IssueId,
    /// Verified caller subject; the owner or a matching company admin.
    pub subject: UserId,
}

/// Driving port for the workflow's mutating operations.
///
/// Each operation executes as one snapshot-isolated transaction: every
/// failure leaves the store untouched, and the acceptance award is applied
/// exactly once per answer under arbitrary concurrency.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowCommand: Send + Sync {
    /// Record an answer under an open issue.
    async fn submit_answer(
        &self,
        request: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, Error>;

    /// Accept an answer exactly once and award its author.
    async fn accept_answer(&self, request: AcceptAnswerRequest) -> Result<(), Error>;

    /// Close an open issue. Terminal: nothing ever reopens it.
    async fn close_issue(&self, request: CloseIssueRequest) -> Result<(), Error>;
}
