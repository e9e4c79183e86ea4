//! Driving port for issue intake.
//!
//! Posting an issue establishes the initial open state the workflow operates
//! on. The poster's display name is denormalized onto the issue, and the
//! poster's organization is attached when they belong to one.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::issue::IssueId;
use crate::domain::user::UserId;

/// Request to post a new issue.
#[derive(Debug, Clone, PartialEq)]
pub struct PostIssueRequest {
    /// Issue title.
    pub title: String,
    /// Problem description.
    pub description: String,
    /// Expertise tag the issue is filed under.
    pub domain: String,
    /// Verified caller subject.
    pub subject: UserId,
}

/// Response from posting an issue.
#[derive(Debug, Clone, PartialEq)]
pub struct PostIssueResponse {
    /// Identifier minted for the new issue.
    pub issue_id: IssueId,
}

/// Driving port creating issues in their initial open state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueIntake: Send + Sync {
    /// Create an open issue authored by the verified subject.
    async fn post_issue(&self, request: PostIssueRequest) -> Result<PostIssueResponse, Error>;
}
