//! The ledger service: the sole entry point for external callers.

use thiserror::Error;
use tracing::instrument;

use bankledger_core::{
    project, validate, BalanceProjection, LedgerCommand, StoredEvent, UserId, ValidationError,
};

use crate::event_store::{AppendOutcome, EventStore, StorageError};

/// Error surfaced by [`LedgerService`] operations.
///
/// Validation failures are client errors carrying a human-readable reason
/// and guarantee no state change; storage failures are server errors and the
/// transaction guarantees no partial writes. The service never retries
/// either — resubmission is the caller's call.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Orchestrates validation, projection, and the event store.
///
/// Stateless between calls: the per-user event log is the only shared
/// mutable resource, and the store's transaction is the only concurrency
/// primitive. The store is injected at construction; there is no ambient
/// registry.
#[derive(Debug)]
pub struct LedgerService<S> {
    store: S,
}

impl<S: EventStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current balance: read the full stream and fold it. No side effects.
    pub async fn balance(&self, user_id: UserId) -> Result<BalanceProjection, LedgerError> {
        let events = self.store.events_for_user(user_id).await?;
        Ok(project(&events))
    }

    /// Raw event history for display, oldest first.
    pub async fn statement(&self, user_id: UserId) -> Result<Vec<StoredEvent>, LedgerError> {
        Ok(self.store.events_for_user(user_id).await?)
    }

    /// The single write path.
    ///
    /// Projection and validation run against the stream snapshot **inside**
    /// the store's atomic unit, so a concurrent command for the same user
    /// cannot make the admitted balance stale. Transfers append the debit
    /// and the mirrored credit in that same unit: both commit or neither
    /// does. Returns the stored events (one, or two for transfers).
    #[instrument(
        skip(self, command),
        fields(user_id = command.user_id().as_i64(), kind = command_name(&command)),
        err
    )]
    pub async fn handle(&self, command: LedgerCommand) -> Result<Vec<StoredEvent>, LedgerError> {
        let user_id = command.user_id();

        let outcome = self
            .store
            .append_with(user_id, move |stream| {
                let balance = project(stream);
                validate(&command, &balance)?;
                Ok(command.into_events())
            })
            .await?;

        match outcome {
            AppendOutcome::Committed(events) => {
                tracing::debug!(count = events.len(), "events committed");
                Ok(events)
            }
            AppendOutcome::Rejected(reason) => Err(LedgerError::Validation(reason)),
        }
    }
}

fn command_name(command: &LedgerCommand) -> &'static str {
    match command {
        LedgerCommand::Deposit { .. } => "deposit",
        LedgerCommand::Withdraw { .. } => "withdraw",
        LedgerCommand::Transfer(_) => "transfer",
    }
}
