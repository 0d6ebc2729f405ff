//! `bankledger-core` — domain foundation of the account ledger.
//!
//! This crate contains **pure domain** code (no I/O, no async): the event
//! model, commands, balance projection, and command validation. Everything
//! here is deterministic and trivially unit-testable; persistence and
//! transaction mechanics live in `bankledger-infra`.

pub mod command;
pub mod error;
pub mod event;
pub mod id;
pub mod projection;
pub mod validate;

pub use command::{LedgerCommand, TransferCommand};
pub use error::ValidationError;
pub use event::{AccountEvent, EventKind, StoredEvent};
pub use id::{EventId, UserId};
pub use projection::{project, BalanceProjection};
pub use validate::{validate, AMOUNT_SCALE};
