use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use bankledger_core::{AccountEvent, EventId, StoredEvent, UserId, ValidationError};

use super::r#trait::{AppendOutcome, EventStore, StorageError};

#[derive(Debug, Default)]
struct Inner {
    streams: HashMap<UserId, Vec<StoredEvent>>,
    next_id: i64,
}

/// In-memory append-only event store.
///
/// Intended for tests/dev. One coarse lock covers every stream, so the
/// atomicity and same-user serialization the contract demands hold
/// trivially (at the cost of cross-user concurrency, which tests don't
/// need). Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: Mutex<Inner>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn events_for_user(&self, user_id: UserId) -> Result<Vec<StoredEvent>, StorageError> {
        let inner = self.inner.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(inner.streams.get(&user_id).cloned().unwrap_or_default())
    }

    async fn append_with<F>(
        &self,
        user_id: UserId,
        decide: F,
    ) -> Result<AppendOutcome, StorageError>
    where
        F: FnOnce(&[StoredEvent]) -> Result<Vec<AccountEvent>, ValidationError> + Send,
    {
        let mut inner = self.inner.lock().map_err(|_| StorageError::LockPoisoned)?;

        let current = inner.streams.get(&user_id).map(Vec::as_slice).unwrap_or(&[]);
        let events = match decide(current) {
            Ok(events) => events,
            Err(reason) => return Ok(AppendOutcome::Rejected(reason)),
        };

        let mut stored = Vec::with_capacity(events.len());
        for event in events {
            inner.next_id += 1;
            let stored_event = StoredEvent {
                id: EventId::new(inner.next_id),
                user_id: event.user_id,
                amount: event.amount,
                kind: event.kind,
                occurred_at: event.occurred_at,
            };
            inner
                .streams
                .entry(event.user_id)
                .or_default()
                .push(stored_event.clone());
            stored.push(stored_event);
        }

        Ok(AppendOutcome::Committed(stored))
    }
}
