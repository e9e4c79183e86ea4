//! Bearer credential extraction and verification helpers.
//!
//! Keep HTTP handlers free of header parsing and provider plumbing: the
//! extractor pulls the credential out of the `Authorization` header, and
//! [`require_subject`] runs it through the identity gate, mapping gate
//! failures onto domain errors.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::{IdentityGate, IdentityGateError};
use crate::domain::{BearerToken, Error, UserId};

const BEARER_SCHEME: &str = "Bearer ";

/// Extractor wrapping the request's bearer credential.
///
/// Extraction fails with [`crate::domain::ErrorCode::Unauthorized`] when the
/// header is absent, uses another scheme, or carries a malformed token.
#[derive(Debug, Clone)]
pub struct BearerAuth(BearerToken);

impl BearerAuth {
    /// The extracted credential.
    pub fn token(&self) -> &BearerToken {
        &self.0
    }

    fn from_header(req: &HttpRequest) -> Result<Self, Error> {
        let raw = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(|| Error::unauthorized("missing authorization header"))?
            .to_str()
            .map_err(|_| Error::unauthorized("authorization header is not valid UTF-8"))?;

        let token = raw
            .strip_prefix(BEARER_SCHEME)
            .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;

        BearerToken::new(token)
            .map(Self)
            .map_err(|err| Error::unauthorized(format!("malformed bearer token: {err}")))
    }
}

impl FromRequest for BearerAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_header(req))
    }
}

/// Verify the extracted credential into a subject id.
pub async fn require_subject(
    gate: &dyn IdentityGate,
    auth: &BearerAuth,
) -> Result<UserId, Error> {
    gate.verify(auth.token()).await.map_err(|err| match err {
        IdentityGateError::Rejected { message } => {
            debug!(token = %auth.token().fingerprint(), %message, "credential rejected");
            Error::unauthorized("invalid bearer token")
        }
        IdentityGateError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    })
}
