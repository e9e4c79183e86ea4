//! In-process document store with optimistic concurrency control.
//!
//! Documents are versioned; a transaction re-validates every read (including
//! observed absences) against the committed state before its buffered writes
//! apply, all under one lock. Committed snapshots are shared via `Arc`, so
//! opening a transaction is cheap and never blocks writers.
//!
//! Conflicts re-run the transaction body after an exponentially growing,
//! jittered delay, up to the configured attempt budget. Cancellation is safe
//! at any point: nothing is visible to other transactions until the commit
//! step swaps the snapshot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::{
    CommitNotification, DocumentPath, DocumentRef, DocumentStore, DocumentStoreError,
    TransactError, Transaction, TransactionParts, VersionedDocument, WriteOp,
};

/// Buffered commit notifications per subscriber before lagging.
const EVENT_BUFFER: usize = 64;

/// Conflict-retry budget and backoff shape for [`MemoryDocumentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per `transact` call, including the first.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles each further attempt.
    pub initial_backoff: Duration,
    /// Upper bound on the backoff between attempts.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(160),
        }
    }
}

/// Committed state guarded by the store lock.
struct Committed {
    documents: Arc<HashMap<DocumentPath, VersionedDocument>>,
    commit_seq: u64,
}

/// Reasons a commit attempt did not apply.
enum CommitFailure {
    /// A read document (or observed absence) changed since the snapshot.
    Contention,
    /// A write was structurally invalid; retrying cannot help.
    Invalid(DocumentStoreError),
}

/// In-memory [`DocumentStore`] adapter.
pub struct MemoryDocumentStore {
    committed: Mutex<Committed>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    events: broadcast::Sender<CommitNotification>,
}

impl MemoryDocumentStore {
    /// Create an empty store using the default retry policy.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_retry_policy(clock, RetryPolicy::default())
    }

    /// Create an empty store with an explicit retry policy.
    pub fn with_retry_policy(clock: Arc<dyn Clock>, retry: RetryPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            committed: Mutex::new(Committed {
                documents: Arc::new(HashMap::new()),
                commit_seq: 0,
            }),
            clock,
            retry,
            events,
        }
    }

    /// Subscribe to commit notifications. External read layers use this to
    /// observe committed writes; the workflow itself never consumes it.
    pub fn subscribe(&self) -> broadcast::Receiver<CommitNotification> {
        self.events.subscribe()
    }

    /// Point-in-time read of one document outside any transaction.
    pub fn read<T: DeserializeOwned>(
        &self,
        doc: &DocumentRef,
    ) -> Result<Option<T>, DocumentStoreError> {
        match self.snapshot().get(doc.path()) {
            Some(stored) => serde_json::from_value(stored.data.clone())
                .map(Some)
                .map_err(|err| {
                    DocumentStoreError::serialization(format!(
                        "corrupt document at {}: {err}",
                        doc.path()
                    ))
                }),
            None => Ok(None),
        }
    }

    fn lock_committed(&self) -> MutexGuard<'_, Committed> {
        // A poisoned lock only means another thread panicked mid-commit; the
        // committed snapshot it guards is still consistent because swaps are
        // single assignments.
        self.committed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Arc<HashMap<DocumentPath, VersionedDocument>> {
        self.lock_committed().documents.clone()
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = 2_u64.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.retry.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.retry.max_backoff.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = base_ms.saturating_mul(exponent).min(max_ms);
        let jitter = SmallRng::from_entropy().gen_range(0..=delay_ms.max(1) / 4);
        Duration::from_millis(delay_ms.saturating_add(jitter))
    }

    fn try_commit(
        &self,
        parts: TransactionParts,
    ) -> Result<Option<CommitNotification>, CommitFailure> {
        let now = self.clock.utc();
        let mut committed = self.lock_committed();

        for (path, observed) in &parts.reads {
            let current = committed.documents.get(path).map(|doc| doc.version);
            if current != *observed {
                return Err(CommitFailure::Contention);
            }
        }

        if parts.writes.is_empty() {
            return Ok(None);
        }

        let mut next = (*committed.documents).clone();
        let mut paths = Vec::with_capacity(parts.writes.len());
        for write in parts.writes {
            paths.push(write.path().clone());
            apply_write(&mut next, write, &now)?;
        }

        committed.commit_seq += 1;
        let notification = CommitNotification {
            seq: committed.commit_seq,
            paths,
        };
        committed.documents = Arc::new(next);
        Ok(Some(notification))
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new(Arc::new(mockable::DefaultClock))
    }
}

fn object_of<'a>(
    doc: &'a mut VersionedDocument,
    path: &DocumentPath,
) -> Result<&'a mut serde_json::Map<String, Value>, CommitFailure> {
    doc.data.as_object_mut().ok_or_else(|| {
        CommitFailure::Invalid(DocumentStoreError::serialization(format!(
            "document {path} is not a JSON object"
        )))
    })
}

fn apply_write(
    next: &mut HashMap<DocumentPath, VersionedDocument>,
    write: WriteOp,
    now: &chrono::DateTime<chrono::Utc>,
) -> Result<(), CommitFailure> {
    match write {
        WriteOp::Create { path, mut value } => {
            let stamp = serde_json::to_value(now).map_err(|err| {
                CommitFailure::Invalid(DocumentStoreError::serialization(format!(
                    "failed to encode commit timestamp: {err}"
                )))
            })?;
            match value.as_object_mut() {
                Some(object) => {
                    object.insert("createdAt".to_owned(), stamp);
                }
                None => {
                    return Err(CommitFailure::Invalid(DocumentStoreError::serialization(
                        format!("document {path} is not a JSON object"),
                    )));
                }
            }
            next.insert(
                path,
                VersionedDocument {
                    version: 1,
                    data: value,
                },
            );
        }
        WriteOp::Update { path, fields } => match next.get_mut(&path) {
            None => {
                return Err(CommitFailure::Invalid(DocumentStoreError::missing(
                    path.as_str(),
                )));
            }
            Some(doc) => {
                let object = object_of(doc, &path)?;
                for (field, value) in fields {
                    object.insert(field, value);
                }
                doc.version += 1;
            }
        },
        WriteOp::Increment { path, field, delta } => match next.get_mut(&path) {
            None => {
                return Err(CommitFailure::Invalid(DocumentStoreError::missing(
                    path.as_str(),
                )));
            }
            Some(doc) => {
                let object = object_of(doc, &path)?;
                let current = match object.get(&field) {
                    None | Some(Value::Null) => 0,
                    Some(value) => value.as_i64().ok_or_else(|| {
                        CommitFailure::Invalid(DocumentStoreError::invalid_transform(
                            path.as_str(),
                            field.clone(),
                        ))
                    })?,
                };
                object.insert(field, Value::from(current.saturating_add(delta)));
                doc.version += 1;
            }
        },
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn transact<T, F>(&self, mut body: F) -> Result<T, TransactError>
    where
        T: Send + 'static,
        F: FnMut(&mut Transaction) -> Result<T, Error> + Send + 'static,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let mut tx = Transaction::begin(self.snapshot());
            let value = match body(&mut tx) {
                Ok(value) => value,
                Err(error) => return Err(TransactError::Aborted(error)),
            };

            match self.try_commit(tx.into_parts()) {
                Ok(Some(notification)) => {
                    // Send only fails when no read layer is subscribed.
                    let _ = self.events.send(notification);
                    return Ok(value);
                }
                Ok(None) => return Ok(value),
                Err(CommitFailure::Invalid(error)) => return Err(TransactError::Store(error)),
                Err(CommitFailure::Contention) => {
                    if attempt < max_attempts {
                        let delay = self.backoff_delay(attempt);
                        debug!(attempt, delay_ms = delay.as_millis() as u64, "transaction conflicted; retrying");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
        Err(TransactError::Store(DocumentStoreError::conflict(
            max_attempts,
        )))
    }
}
