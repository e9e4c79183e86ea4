//! Static token-map identity gate.
//!
//! Development and test stand-in for the external provider: a fixed mapping
//! from known tokens to subject ids. Unknown tokens are rejected exactly like
//! a provider refusal, so callers exercise the same failure path as in
//! production.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::BearerToken;
use crate::domain::ports::{IdentityGate, IdentityGateError};
use crate::domain::user::UserId;

/// Identity gate resolving tokens from an in-memory table.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityGate {
    tokens: HashMap<String, UserId>,
}

impl StaticIdentityGate {
    /// Build a gate from `(token, subject)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, UserId)>) -> Self {
        Self {
            tokens: entries.into_iter().collect(),
        }
    }

    /// Register one token for a subject.
    pub fn insert(&mut self, token: impl Into<String>, subject: UserId) {
        self.tokens.insert(token.into(), subject);
    }
}

#[async_trait]
impl IdentityGate for StaticIdentityGate {
    async fn verify(&self, token: &BearerToken) -> Result<UserId, IdentityGateError> {
        match self.tokens.get(token.as_str()) {
            Some(subject) => Ok(subject.clone()),
            None => {
                debug!(token = %token.fingerprint(), "unknown static token");
                Err(IdentityGateError::rejected("unknown token"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn resolves_registered_tokens() {
        let subject = UserId::new("u1").expect("valid id");
        let gate = StaticIdentityGate::new([("token-ada".to_owned(), subject.clone())]);

        let token = BearerToken::new("token-ada").expect("valid token");
        let resolved = gate.verify(&token).await.expect("token resolves");
        assert_eq!(resolved, subject);
    }

    #[tokio::test]
    async fn rejects_unknown_tokens() {
        let gate = StaticIdentityGate::default();
        let token = BearerToken::new("mystery").expect("valid token");
        let err = gate.verify(&token).await.expect_err("unknown token rejected");
        assert!(matches!(err, IdentityGateError::Rejected { .. }));
    }
}
