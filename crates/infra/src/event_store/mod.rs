//! Append-only, per-user event storage.

mod in_memory;
mod postgres;
mod r#trait;

pub use in_memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;
pub use r#trait::{AppendOutcome, EventStore, StorageError};
