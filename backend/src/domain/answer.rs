//! Answer records.
//!
//! Answers live in a per-issue subcollection, `issues/{issueId}/answers/{answerId}`.
//! An answer mutates exactly once in its life: `isAccepted` flips from false
//! to true when the issue owner accepts it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::define_document_id;
use super::user::UserId;

define_document_id! {
    /// Stable answer identifier, minted at submission.
    AnswerId
}

/// Answer document stored under `issues/{issueId}/answers/{answerId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    text: String,
    created_by: UserId,
    #[serde(default)]
    is_accepted: bool,
    created_at: DateTime<Utc>,
}

impl Answer {
    /// Answer body.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Identifier of the answering user.
    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Whether the issue owner accepted this answer.
    pub fn is_accepted(&self) -> bool {
        self.is_accepted
    }

    /// When the answer was recorded, assigned by the store at commit.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Answer document as written at submission, before the store assigns
/// `createdAt`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnswer {
    /// Answer body.
    pub text: String,
    /// Identifier of the answering user.
    pub created_by: UserId,
    /// Always false at submission.
    pub is_accepted: bool,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_answer_round_trips_camel_case() {
        let answer: Answer = serde_json::from_value(json!({
            "text": "Restart the worker pool",
            "createdBy": "u2",
            "isAccepted": false,
            "createdAt": "2026-01-02T03:04:05Z",
        }))
        .expect("valid answer document");
        assert_eq!(answer.created_by().as_str(), "u2");
        assert!(!answer.is_accepted());

        let value = serde_json::to_value(&answer).expect("serializes");
        assert_eq!(value.get("isAccepted"), Some(&json!(false)));
    }

    #[test]
    fn acceptance_flag_defaults_to_false() {
        let answer: Answer = serde_json::from_value(json!({
            "text": "x",
            "createdBy": "u2",
            "createdAt": "2026-01-02T03:04:05Z",
        }))
        .expect("document without flag parses");
        assert!(!answer.is_accepted());
    }

    #[test]
    fn new_answer_serializes_without_created_at() {
        let record = NewAnswer {
            text: "x".to_owned(),
            created_by: UserId::new("u2").expect("valid id"),
            is_accepted: false,
        };
        let value = serde_json::to_value(&record).expect("serializes");
        assert!(value.get("createdAt").is_none());
        assert_eq!(value.get("createdBy"), Some(&json!("u2")));
    }
}
