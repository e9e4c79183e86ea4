//! Reqwest-backed identity gate.
//!
//! This adapter owns transport details only: it POSTs the presented
//! credential to the provider's verification endpoint and decodes the subject
//! id from the response. Provider contract:
//!
//! ```text
//! POST {base}/verify {"token": "..."}
//! 200 {"subjectId": "..."}       verified
//! 4xx {"error": "..."}           rejected
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::BearerToken;
use crate::domain::ports::{IdentityGate, IdentityGateError};
use crate::domain::user::UserId;

const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct VerifyRequestDto<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponseDto {
    subject_id: String,
}

/// Identity gate verifying credentials against an external provider over
/// HTTPS.
pub struct HttpIdentityGate {
    client: Client,
    verify_endpoint: Url,
}

impl HttpIdentityGate {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the verification endpoint cannot be derived from
    /// `base` or the reqwest client cannot be constructed.
    pub fn new(base: Url) -> Result<Self, IdentityGateError> {
        Self::with_timeout(base, DEFAULT_VERIFY_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the verification endpoint cannot be derived from
    /// `base` or the reqwest client cannot be constructed.
    pub fn with_timeout(base: Url, timeout: Duration) -> Result<Self, IdentityGateError> {
        let verify_endpoint = base
            .join("verify")
            .map_err(|err| IdentityGateError::unavailable(format!("invalid provider URL: {err}")))?;
        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            IdentityGateError::unavailable(format!("failed to build HTTP client: {err}"))
        })?;
        Ok(Self {
            client,
            verify_endpoint,
        })
    }
}

#[async_trait]
impl IdentityGate for HttpIdentityGate {
    async fn verify(&self, token: &BearerToken) -> Result<UserId, IdentityGateError> {
        let response = self
            .client
            .post(self.verify_endpoint.clone())
            .json(&VerifyRequestDto {
                token: token.as_str(),
            })
            .send()
            .await
            .map_err(|err| IdentityGateError::unavailable(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::OK {
            let body: VerifyResponseDto = response
                .json()
                .await
                .map_err(|err| IdentityGateError::unavailable(format!("malformed verification response: {err}")))?;
            return UserId::new(body.subject_id).map_err(|err| {
                IdentityGateError::unavailable(format!("provider returned an invalid subject id: {err}"))
            });
        }

        if status.is_client_error() {
            debug!(
                token = %token.fingerprint(),
                status = status.as_u16(),
                "identity provider rejected credential"
            );
            return Err(IdentityGateError::rejected(format!(
                "verification returned {status}"
            )));
        }

        Err(IdentityGateError::unavailable(format!(
            "verification returned {status}"
        )))
    }
}
