//! Command admission checks.

use crate::command::LedgerCommand;
use crate::error::ValidationError;
use crate::projection::BalanceProjection;

/// Fractional digits the ledger stores (cent precision).
pub const AMOUNT_SCALE: u32 = 2;

/// Decide whether a command is admissible given the acting user's current
/// balance (the origin's balance for transfers).
///
/// Pure predicate with no side effects. The balance passed in is advisory
/// state read at the moment of decision: callers must re-evaluate this check
/// inside the same transaction that performs the append, or it is unsound
/// under concurrency (see `bankledger-infra`'s store contract).
pub fn validate(
    command: &LedgerCommand,
    balance: &BalanceProjection,
) -> Result<(), ValidationError> {
    let amount = command.amount();

    if amount.is_zero() {
        return Err(ValidationError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(ValidationError::NegativeAmount);
    }
    // Trailing zeros don't count: "1.50" and "1.5000" carry the same value.
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::ScaleExceeded);
    }
    if command.is_debit() && amount > balance.amount {
        return Err(ValidationError::InsufficientBalance);
    }

    Ok(())
}
