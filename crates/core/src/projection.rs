//! Balance projection: the fold of a user's event stream.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::event::StoredEvent;

/// The derived balance of one account.
///
/// Ephemeral and query-scoped: recomputed on demand from the event stream,
/// never persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceProjection {
    pub amount: Decimal,
}

impl BalanceProjection {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Reduce an ordered event stream into the current balance.
///
/// Deposits and transfer-ins add, withdrawals and transfer-outs subtract.
/// Exact decimal arithmetic, so the result is order-independent; the fold
/// still runs oldest-first to keep room for point-in-time balances later.
/// An empty stream is a valid state and projects to zero.
pub fn project<'a, I>(events: I) -> BalanceProjection
where
    I: IntoIterator<Item = &'a StoredEvent>,
{
    let amount = events
        .into_iter()
        .fold(Decimal::ZERO, |acc, event| acc + event.signed_amount());
    BalanceProjection { amount }
}
