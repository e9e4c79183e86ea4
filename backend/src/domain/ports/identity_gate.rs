//! Driven port for bearer credential verification.
//!
//! The external identity provider issues tokens; this port only verifies
//! them and yields the caller's subject id. Verification is stateless per
//! call and has no side effects.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::identity::BearerToken;
use crate::domain::user::UserId;

define_port_error! {
    /// Failures raised by identity gate adapters.
    pub enum IdentityGateError {
        /// The provider examined the credential and refused it.
        Rejected { message: String } => "identity provider rejected the credential: {message}",
        /// The provider could not be reached or answered abnormally.
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Driven port verifying a bearer credential into a subject id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Verify `token` and return the subject it identifies.
    async fn verify(&self, token: &BearerToken) -> Result<UserId, IdentityGateError>;
}

/// Subject id accepted by [`FixtureIdentityGate`].
pub const FIXTURE_SUBJECT: &str = "fixture-user";
/// Token accepted by [`FixtureIdentityGate`].
pub const FIXTURE_TOKEN: &str = "fixture-token";

/// Fixture gate for tests and doctests: accepts exactly one token.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityGate;

#[async_trait]
impl IdentityGate for FixtureIdentityGate {
    async fn verify(&self, token: &BearerToken) -> Result<UserId, IdentityGateError> {
        if token.as_str() == FIXTURE_TOKEN {
            UserId::new(FIXTURE_SUBJECT)
                .map_err(|err| IdentityGateError::unavailable(format!("fixture subject id: {err}")))
        } else {
            Err(IdentityGateError::rejected("unknown token"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FIXTURE_TOKEN, true)]
    #[case("other-token", false)]
    #[tokio::test]
    async fn fixture_gate_accepts_only_its_token(#[case] token: &str, #[case] accepted: bool) {
        let gate = FixtureIdentityGate;
        let token = BearerToken::new(token).expect("valid token shape");
        let result = gate.verify(&token).await;
        match (accepted, result) {
            (true, Ok(subject)) => assert_eq!(subject.as_str(), FIXTURE_SUBJECT),
            (false, Err(IdentityGateError::Rejected { .. })) => {}
            (expected, outcome) => {
                panic!("expected accepted={expected}, got {outcome:?}")
            }
        }
    }
}
