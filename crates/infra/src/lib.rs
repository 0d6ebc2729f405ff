//! `bankledger-infra` — persistence and orchestration.
//!
//! The event store contract plus its Postgres and in-memory implementations,
//! and the [`service::LedgerService`] that orchestrates validation,
//! projection, and the store behind the single write path.

pub mod event_store;
pub mod service;


pub use event_store::{
    AppendOutcome, EventStore, InMemoryEventStore, PostgresEventStore, StorageError,
};
pub use service::{LedgerError, LedgerService};
