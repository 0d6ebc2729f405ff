//! The account event model.
//!
//! Events are immutable facts. The append-only log of `StoredEvent`s is the
//! sole source of truth for an account; the balance is always derived by
//! replaying it (see [`crate::projection`]), never stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id::{EventId, UserId};

/// The shape of a ledger fact.
///
/// A closed set of variants distinguished by the stored `event_type`
/// discriminant; only `TransferOut` carries extra data (the destination
/// account of the paired credit). The mirrored `TransferIn` on the
/// destination's stream is a plain credit — pairing is implicit via matching
/// amount and timestamp, not a foreign key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Deposit,
    Withdraw,
    TransferIn,
    TransferOut { destination: UserId },
}

impl EventKind {
    /// Stable discriminant used in storage and statement output.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Deposit => "DEPOSIT",
            EventKind::Withdraw => "WITHDRAW",
            EventKind::TransferIn => "TRANSFER_IN",
            EventKind::TransferOut { .. } => "TRANSFER_OUT",
        }
    }

    /// Whether this kind reduces the balance.
    pub fn is_debit(&self) -> bool {
        matches!(self, EventKind::Withdraw | EventKind::TransferOut { .. })
    }
}

/// An event ready to be appended to a user's stream (no identity yet).
///
/// The event store assigns an [`EventId`] during append, turning this into a
/// [`StoredEvent`]. The amount is always positive and carries at most two
/// fractional digits; the sign is implied by the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEvent {
    pub user_id: UserId,
    pub amount: Decimal,
    pub kind: EventKind,
    pub occurred_at: DateTime<Utc>,
}

/// A persisted event, with the store-assigned identity.
///
/// Once appended, a stored event is never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: EventId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub kind: EventKind,
    pub occurred_at: DateTime<Utc>,
}

impl StoredEvent {
    /// The event's contribution to the balance: credits positive, debits
    /// negative.
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_debit() {
            -self.amount
        } else {
            self.amount
        }
    }
}
