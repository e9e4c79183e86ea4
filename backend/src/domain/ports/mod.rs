//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`WorkflowCommand`], [`IssueIntake`]) are what inbound
//! adapters call; driven ports ([`DocumentStore`], [`IdentityGate`]) are what
//! outbound adapters implement. Port errors are typed so adapters map their
//! failures into predictable variants instead of returning `anyhow::Result`.

mod macros;
pub(crate) use macros::define_port_error;

mod document_store;
mod identity_gate;
mod issue_intake;
mod workflow_command;

pub use document_store::{
    CommitNotification, DocumentPath, DocumentRef, DocumentStore, DocumentStoreError, TransactError,
    Transaction, TransactionParts, VersionedDocument, WriteOp,
};
#[cfg(test)]
pub use identity_gate::MockIdentityGate;
pub use identity_gate::{
    FIXTURE_SUBJECT, FIXTURE_TOKEN, FixtureIdentityGate, IdentityGate, IdentityGateError,
};
#[cfg(test)]
pub use issue_intake::MockIssueIntake;
pub use issue_intake::{IssueIntake, PostIssueRequest, PostIssueResponse};
#[cfg(test)]
pub use workflow_command::MockWorkflowCommand;
pub use workflow_command::{
    AcceptAnswerRequest, CloseIssueRequest, SubmitAnswerRequest, SubmitAnswerResponse,
    WorkflowCommand,
};
