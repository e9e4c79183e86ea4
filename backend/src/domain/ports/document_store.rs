//! Transactional-execute contract for the document store.
//!
//! The store holds named collections of key-addressed JSON documents. All
//! mutations run through [`DocumentStore::transact`]: the body receives a
//! [`Transaction`] whose reads observe one consistent snapshot and whose
//! writes are buffered, then applied atomically only if no document read by
//! the body changed since the snapshot was taken. On conflict the adapter
//! re-invokes the body from scratch up to a bounded retry budget; this is the
//! sole concurrency-control mechanism in the system, and no in-process locks
//! exist outside the adapters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use super::define_port_error;
use crate::domain::answer::AnswerId;
use crate::domain::error::Error as DomainError;
use crate::domain::issue::IssueId;
use crate::domain::organization::OrganizationId;
use crate::domain::user::UserId;

/// Full slash-separated path addressing one document, e.g.
/// `issues/i1/answers/a1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Borrow the path as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to a document in one of the named collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    path: DocumentPath,
}

impl DocumentRef {
    /// Reference a user profile document.
    pub fn user(id: &UserId) -> Self {
        Self {
            path: DocumentPath(format!("users/{id}")),
        }
    }

    /// Reference an issue document.
    pub fn issue(id: &IssueId) -> Self {
        Self {
            path: DocumentPath(format!("issues/{id}")),
        }
    }

    /// Reference an answer in an issue's answer subcollection.
    pub fn answer(issue: &IssueId, answer: &AnswerId) -> Self {
        Self {
            path: DocumentPath(format!("issues/{issue}/answers/{answer}")),
        }
    }

    /// Reference an organization document.
    pub fn organization(id: &OrganizationId) -> Self {
        Self {
            path: DocumentPath(format!("organizations/{id}")),
        }
    }

    /// Full path of the referenced document.
    pub fn path(&self) -> &DocumentPath {
        &self.path
    }
}

/// A committed document together with its monotonically increasing version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDocument {
    /// Bumped by every committed write touching the document.
    pub version: u64,
    /// Document body. Always a JSON object.
    pub data: Value,
}

/// Buffered write operation applied at commit.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a new document; the store stamps `createdAt` at commit.
    Create {
        /// Target document.
        path: DocumentPath,
        /// Serialized document body.
        value: Value,
    },
    /// Shallow-merge fields into an existing document.
    Update {
        /// Target document.
        path: DocumentPath,
        /// Fields to merge.
        fields: Map<String, Value>,
    },
    /// Add a delta to a numeric field, treating a missing field as zero.
    Increment {
        /// Target document.
        path: DocumentPath,
        /// Field holding the counter.
        field: String,
        /// Signed delta to apply.
        delta: i64,
    },
}

impl WriteOp {
    /// Target document of this write.
    pub fn path(&self) -> &DocumentPath {
        match self {
            Self::Create { path, .. } | Self::Update { path, .. } | Self::Increment { path, .. } => {
                path
            }
        }
    }
}

/// Read set and buffered writes extracted from a finished transaction body.
#[derive(Debug)]
pub struct TransactionParts {
    /// Observed version per document read (`None` when observed absent).
    pub reads: HashMap<DocumentPath, Option<u64>>,
    /// Writes in the order the body issued them.
    pub writes: Vec<WriteOp>,
}

/// Transaction handle passed to a [`DocumentStore::transact`] body.
///
/// Reads observe the snapshot the transaction began on; buffered writes are
/// not visible until commit, so bodies perform their reads before their
/// writes.
#[derive(Debug)]
pub struct Transaction {
    snapshot: Arc<HashMap<DocumentPath, VersionedDocument>>,
    reads: HashMap<DocumentPath, Option<u64>>,
    writes: Vec<WriteOp>,
}

impl Transaction {
    /// Open a transaction over a committed snapshot.
    pub fn begin(snapshot: Arc<HashMap<DocumentPath, VersionedDocument>>) -> Self {
        Self {
            snapshot,
            reads: HashMap::new(),
            writes: Vec::new(),
        }
    }

    /// Read and deserialize a document, recording it in the read set.
    ///
    /// Returns `Ok(None)` when the document does not exist; absence is also
    /// recorded and re-validated at commit.
    pub fn get<T: DeserializeOwned>(&mut self, doc: &DocumentRef) -> Result<Option<T>, DomainError> {
        let stored = self.snapshot.get(doc.path());
        self.reads
            .entry(doc.path().clone())
            .or_insert_with(|| stored.map(|s| s.version));
        match stored {
            Some(stored) => serde_json::from_value(stored.data.clone())
                .map(Some)
                .map_err(|err| {
                    DomainError::internal(format!("corrupt document at {}: {err}", doc.path()))
                }),
            None => Ok(None),
        }
    }

    /// Buffer the insertion of a new document.
    ///
    /// Fails when the snapshot already holds the document; absence is
    /// recorded in the read set so a concurrent insert of the same key
    /// surfaces as a commit conflict rather than a lost write.
    pub fn create<T: Serialize>(
        &mut self,
        doc: &DocumentRef,
        record: &T,
    ) -> Result<(), DomainError> {
        if self.snapshot.contains_key(doc.path()) {
            return Err(DomainError::internal(format!(
                "document {} already exists",
                doc.path()
            )));
        }
        self.reads.entry(doc.path().clone()).or_insert(None);
        let value = serde_json::to_value(record).map_err(|err| {
            DomainError::internal(format!("failed to serialize document {}: {err}", doc.path()))
        })?;
        if !value.is_object() {
            return Err(DomainError::internal(format!(
                "document {} must serialize to a JSON object",
                doc.path()
            )));
        }
        self.writes.push(WriteOp::Create {
            path: doc.path().clone(),
            value,
        });
        Ok(())
    }

    /// Buffer a shallow merge of fields into an existing document.
    pub fn update(&mut self, doc: &DocumentRef, fields: Value) -> Result<(), DomainError> {
        let Value::Object(fields) = fields else {
            return Err(DomainError::internal(format!(
                "update of {} requires a JSON object of fields",
                doc.path()
            )));
        };
        self.writes.push(WriteOp::Update {
            path: doc.path().clone(),
            fields,
        });
        Ok(())
    }

    /// Buffer an atomic increment of a numeric field.
    ///
    /// A missing field counts as zero; a missing document fails the commit.
    pub fn increment(&mut self, doc: &DocumentRef, field: impl Into<String>, delta: i64) {
        self.writes.push(WriteOp::Increment {
            path: doc.path().clone(),
            field: field.into(),
            delta,
        });
    }

    /// Consume the handle, yielding the read set and buffered writes for the
    /// adapter's commit step.
    pub fn into_parts(self) -> TransactionParts {
        TransactionParts {
            reads: self.reads,
            writes: self.writes,
        }
    }
}

define_port_error! {
    /// Failures raised by document store adapters.
    pub enum DocumentStoreError {
        /// The bounded conflict-retry budget was exhausted.
        Conflict { attempts: u32 } => "transaction aborted after {attempts} conflicting attempts",
        /// An update or increment targeted a document that does not exist.
        Missing { path: String } => "document {path} does not exist",
        /// An increment targeted a field that is not an integer.
        InvalidTransform { path: String, field: String } =>
            "field {field} of {path} is not an integer",
        /// A document body failed to serialize or was not a JSON object.
        Serialization { message: String } => "document serialization failed: {message}",
        /// The backing store is unreachable or failed internally.
        Backend { message: String } => "document store backend failure: {message}",
    }
}

/// Outcome of a `transact` call that did not produce a value.
#[derive(Debug, Error)]
pub enum TransactError {
    /// The body aborted with a workflow error; nothing was committed.
    #[error(transparent)]
    Aborted(DomainError),
    /// The adapter failed: conflict budget exhausted, invalid write target,
    /// or backend trouble. Nothing was committed.
    #[error(transparent)]
    Store(DocumentStoreError),
}

/// Notification describing one committed transaction, consumed by external
/// read layers (feeds, live views) that observe committed writes.
#[derive(Debug, Clone)]
pub struct CommitNotification {
    /// Monotonic commit sequence number.
    pub seq: u64,
    /// Paths written by the commit, in write order.
    pub paths: Vec<DocumentPath>,
}

/// Driven port for atomic document transactions.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use backend::domain::Issue;
/// use backend::domain::ports::{DocumentRef, DocumentStore};
/// use backend::outbound::store::MemoryDocumentStore;
///
/// # async fn example(issue_id: backend::domain::IssueId) -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryDocumentStore::new(Arc::new(mockable::DefaultClock));
/// let title = store
///     .transact(move |tx| {
///         let issue: Option<Issue> = tx.get(&DocumentRef::issue(&issue_id))?;
///         Ok(issue.map(|issue| issue.title().to_owned()))
///     })
///     .await?;
/// # let _ = title;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute `body` against a snapshot-isolated transaction, retrying a
    /// bounded number of times on commit conflict. A body error aborts the
    /// call with zero observable side effects and is never retried.
    async fn transact<T, F>(&self, body: F) -> Result<T, TransactError>
    where
        T: Send + 'static,
        F: FnMut(&mut Transaction) -> Result<T, DomainError> + Send + 'static;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    fn snapshot_with(
        path: &DocumentPath,
        version: u64,
        data: Value,
    ) -> Arc<HashMap<DocumentPath, VersionedDocument>> {
        let mut documents = HashMap::new();
        documents.insert(path.clone(), VersionedDocument { version, data });
        Arc::new(documents)
    }

    fn issue_ref() -> DocumentRef {
        DocumentRef::issue(&IssueId::new("i1").expect("valid id"))
    }

    #[rstest]
    fn refs_render_collection_paths() {
        let issue = IssueId::new("i1").expect("valid id");
        let answer = AnswerId::new("a1").expect("valid id");
        assert_eq!(
            DocumentRef::user(&UserId::new("u1").expect("valid id"))
                .path()
                .as_str(),
            "users/u1"
        );
        assert_eq!(
            DocumentRef::answer(&issue, &answer).path().as_str(),
            "issues/i1/answers/a1"
        );
    }

    #[rstest]
    fn get_records_observed_version() {
        let doc = issue_ref();
        let mut tx = Transaction::begin(snapshot_with(doc.path(), 3, json!({ "x": 1 })));
        let value: Option<Value> = tx.get(&doc).expect("read succeeds");
        assert_eq!(value, Some(json!({ "x": 1 })));

        let parts = tx.into_parts();
        assert_eq!(parts.reads.get(doc.path()), Some(&Some(3)));
    }

    #[rstest]
    fn get_records_observed_absence() {
        let doc = issue_ref();
        let mut tx = Transaction::begin(Arc::new(HashMap::new()));
        let value: Option<Value> = tx.get(&doc).expect("read succeeds");
        assert!(value.is_none());

        let parts = tx.into_parts();
        assert_eq!(parts.reads.get(doc.path()), Some(&None));
    }

    #[rstest]
    fn create_rejects_existing_documents() {
        let doc = issue_ref();
        let mut tx = Transaction::begin(snapshot_with(doc.path(), 1, json!({})));
        let err = tx
            .create(&doc, &json!({ "title": "t" }))
            .expect_err("existing document rejected");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn create_asserts_absence_in_the_read_set() {
        let doc = issue_ref();
        let mut tx = Transaction::begin(Arc::new(HashMap::new()));
        tx.create(&doc, &json!({ "title": "t" })).expect("buffered");

        let parts = tx.into_parts();
        assert_eq!(parts.reads.get(doc.path()), Some(&None));
        assert_eq!(parts.writes.len(), 1);
    }

    #[rstest]
    fn update_requires_an_object() {
        let doc = issue_ref();
        let mut tx = Transaction::begin(Arc::new(HashMap::new()));
        let err = tx
            .update(&doc, json!("closed"))
            .expect_err("scalar fields rejected");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn writes_preserve_issue_order() {
        let doc = issue_ref();
        let user = DocumentRef::user(&UserId::new("u2").expect("valid id"));
        let mut tx = Transaction::begin(snapshot_with(doc.path(), 1, json!({})));
        tx.update(&doc, json!({ "status": "closed" }))
            .expect("buffered");
        tx.increment(&user, "points", 10);

        let parts = tx.into_parts();
        let paths: Vec<&str> = parts.writes.iter().map(|w| w.path().as_str()).collect();
        assert_eq!(paths, vec!["issues/i1", "users/u2"]);
    }
}
