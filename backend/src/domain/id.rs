//! Document identifier newtypes.
//!
//! The store addresses documents by opaque string keys. Identifiers issued by
//! the external identity provider are accepted as-is; identifiers this
//! service mints are random UUIDs. Validation only rejects shapes that can
//! never name a document: empty strings, surrounding whitespace, and path
//! separators that would escape a collection.

use thiserror::Error;

/// Validation errors shared by every document identifier newtype.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("identifier must not be empty")]
    Empty,
    /// Identifier contains whitespace.
    #[error("identifier must not contain whitespace")]
    ContainsWhitespace,
    /// Identifier contains a `/`, which is reserved for document paths.
    #[error("identifier must not contain '/'")]
    ContainsSeparator,
}

pub(crate) fn validate_document_id(raw: &str) -> Result<(), DocumentIdValidationError> {
    if raw.is_empty() {
        return Err(DocumentIdValidationError::Empty);
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(DocumentIdValidationError::ContainsWhitespace);
    }
    if raw.contains('/') {
        return Err(DocumentIdValidationError::ContainsSeparator);
    }
    Ok(())
}

macro_rules! define_document_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct an identifier from caller input.
            pub fn new(
                id: impl Into<String>,
            ) -> Result<Self, $crate::domain::DocumentIdValidationError> {
                let raw = id.into();
                $crate::domain::id::validate_document_id(&raw)?;
                Ok(Self(raw))
            }

            /// Mint a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::DocumentIdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use define_document_id;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    define_document_id! {
        /// Identifier used only by these tests.
        SampleId
    }

    #[rstest]
    #[case("", DocumentIdValidationError::Empty)]
    #[case(" padded", DocumentIdValidationError::ContainsWhitespace)]
    #[case("two words", DocumentIdValidationError::ContainsWhitespace)]
    #[case("a/b", DocumentIdValidationError::ContainsSeparator)]
    fn rejects_unaddressable_ids(#[case] raw: &str, #[case] expected: DocumentIdValidationError) {
        let err = SampleId::new(raw).expect_err("invalid id rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn accepts_opaque_ids() {
        let id = SampleId::new("u_93f2-aa").expect("valid id");
        assert_eq!(id.as_str(), "u_93f2-aa");
        assert_eq!(id.to_string(), "u_93f2-aa");
    }

    #[rstest]
    fn generated_ids_validate() {
        let id = SampleId::generate();
        assert!(SampleId::new(id.as_str()).is_ok());
    }

    #[rstest]
    fn serde_round_trips_as_plain_string() {
        let id = SampleId::new("abc-123").expect("valid id");
        let encoded = serde_json::to_string(&id).expect("serializes");
        assert_eq!(encoded, "\"abc-123\"");
        let decoded: SampleId = serde_json::from_str(&encoded).expect("parses");
        assert_eq!(decoded, id);
    }
}
