//! Bearer credential primitives.
//!
//! Keep raw credentials out of handler code and logs: the token wrapper
//! zeroizes its contents on drop and only ever exposes a short hash
//! fingerprint for diagnostics.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of the hex-encoded token fingerprint emitted in logs.
const FINGERPRINT_LEN: usize = 12;

/// Domain error returned when a bearer credential is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BearerTokenValidationError {
    /// Token was missing or blank.
    Empty,
    /// Token contained whitespace, which the header grammar forbids.
    ContainsWhitespace,
}

impl fmt::Display for BearerTokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "bearer token must not be empty"),
            Self::ContainsWhitespace => write!(f, "bearer token must not contain whitespace"),
        }
    }
}

impl std::error::Error for BearerTokenValidationError {}

/// Opaque bearer credential presented with each request.
///
/// ## Invariants
/// - Non-empty and free of whitespace.
/// - The raw value never appears in `Debug` output; use
///   [`BearerToken::fingerprint`] when logging.
#[derive(Clone)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Validate and wrap a raw credential.
    pub fn new(raw: impl Into<String>) -> Result<Self, BearerTokenValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(BearerTokenValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(BearerTokenValidationError::ContainsWhitespace);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw credential for forwarding to the identity provider.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Short SHA-256 fingerprint safe to include in logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(FINGERPRINT_LEN);
        encoded
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken")
            .field(&self.fingerprint())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", BearerTokenValidationError::Empty)]
    #[case("two words", BearerTokenValidationError::ContainsWhitespace)]
    #[case(" leading", BearerTokenValidationError::ContainsWhitespace)]
    fn rejects_malformed_tokens(#[case] raw: &str, #[case] expected: BearerTokenValidationError) {
        let err = BearerToken::new(raw).expect_err("malformed token rejected");
        assert_eq!(err, expected);
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let token = BearerToken::new("secret-credential").expect("valid token");
        let first = token.fingerprint();
        assert_eq!(first.len(), FINGERPRINT_LEN);
        assert_eq!(first, token.fingerprint());
        assert_ne!(first, "secret-credential");
    }

    #[test]
    fn debug_output_hides_the_raw_value() {
        let token = BearerToken::new("super-secret").expect("valid token");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains(&token.fingerprint()));
    }
}
