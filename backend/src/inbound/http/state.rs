//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IdentityGate, IssueIntake, WorkflowCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Core workflow mutations.
    pub workflow: Arc<dyn WorkflowCommand>,
    /// Issue intake.
    pub intake: Arc<dyn IssueIntake>,
    /// Bearer credential verification.
    pub identity: Arc<dyn IdentityGate>,
}

impl HttpState {
    /// Bundle port implementations for handler injection.
    pub fn new(
        workflow: Arc<dyn WorkflowCommand>,
        intake: Arc<dyn IssueIntake>,
        identity: Arc<dyn IdentityGate>,
    ) -> Self {
        Self {
            workflow,
            intake,
            identity,
        }
    }
}
