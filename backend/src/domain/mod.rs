//! Domain model of the issue/answer workflow.
//!
//! Purpose: strongly typed entities, the issue state machine, and the
//! transactional workflow services, kept free of transport and storage
//! concerns. Inbound adapters call the driving ports in [`ports`]; outbound
//! adapters implement the driven ports defined there.

pub mod answer;
pub mod error;
mod id;
pub mod identity;
pub mod issue;
pub mod issue_intake_service;
pub mod organization;
pub mod ports;
pub mod user;
pub mod workflow_service;

pub use self::answer::{Answer, AnswerId, NewAnswer};
pub use self::error::{Error, ErrorCode};
pub use self::id::DocumentIdValidationError;
pub use self::identity::{BearerToken, BearerTokenValidationError};
pub use self::issue::{Issue, IssueId, IssueStatus, NewIssue};
pub use self::issue_intake_service::IssueIntakeService;
pub use self::organization::{Organization, OrganizationId};
pub use self::user::{NewUser, Role, User, UserDraft, UserId, UserStatus};
pub use self::workflow_service::{ACCEPTED_ANSWER_POINTS, WorkflowService};

/// Response header carrying the request-scoped trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
