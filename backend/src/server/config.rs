//! Server configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::outbound::store::RetryPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration values controlling the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BACKEND")]
pub struct ServerSettings {
    /// Socket address to bind, `host:port`.
    pub bind_addr: Option<String>,
    /// Base URL of the external identity provider. When absent, a static
    /// demo-token gate is used instead (development only).
    pub identity_provider_url: Option<String>,
    /// Conflict-retry attempts per document transaction.
    pub tx_retry_attempts: Option<u32>,
}

impl ServerSettings {
    /// Bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Document store retry policy derived from the settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::default();
        if let Some(attempts) = self.tx_retry_attempts {
            policy.max_attempts = attempts.max(1);
        }
        policy
    }
}
