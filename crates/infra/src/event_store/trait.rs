use async_trait::async_trait;
use thiserror::Error;

use bankledger_core::{AccountEvent, StoredEvent, UserId, ValidationError};

/// Event store operation error.
///
/// Infrastructure failures only (storage, connectivity, corrupt rows);
/// business rejections travel through [`AppendOutcome::Rejected`] instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A persisted row could not be mapped back into a domain event.
    #[error("corrupt event row: {0}")]
    CorruptRow(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result of an [`EventStore::append_with`] unit of work.
///
/// A rejection is a normal outcome, not a storage error: the transaction is
/// rolled back, nothing is persisted, and the decision's reason is returned
/// to the caller.
#[derive(Debug)]
pub enum AppendOutcome {
    Committed(Vec<StoredEvent>),
    Rejected(ValidationError),
}

/// Append-only, per-user event store.
///
/// Events are organized into one stream per user, ordered by insertion.
/// Within a stream the store assigns monotonically increasing identities on
/// append; events are never mutated or deleted.
///
/// Implementations must guarantee, for [`append_with`](Self::append_with):
///
/// - The stream handed to `decide` and the appends it produces form one
///   atomic unit — they commit together or not at all, and `decide` never
///   observes a partial append from elsewhere.
/// - Concurrent `append_with` calls for the **same** user are serialized
///   with respect to each other, so two racing debits cannot both observe
///   the same pre-debit stream. Calls for different users must not block
///   each other (beyond implementation-internal constants).
///
/// The storage transaction is the sole concurrency primitive of the system;
/// no application-level locking exists above this trait.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events recorded against `user_id`, oldest first.
    ///
    /// An empty vector is a valid state (zero balance), not an error.
    async fn events_for_user(&self, user_id: UserId) -> Result<Vec<StoredEvent>, StorageError>;

    /// Run `decide` against the user's current stream and atomically append
    /// whatever events it admits.
    ///
    /// `decide` is the pure validate-and-fan-out step: it receives the
    /// stream as of the transaction's snapshot and either returns the events
    /// to append (possibly targeting other users' streams, as transfer
    /// mirrors do) or a rejection. On rejection the transaction performs no
    /// writes.
    async fn append_with<F>(
        &self,
        user_id: UserId,
        decide: F,
    ) -> Result<AppendOutcome, StorageError>
    where
        F: FnOnce(&[StoredEvent]) -> Result<Vec<AccountEvent>, ValidationError> + Send;
}
