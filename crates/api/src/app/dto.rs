use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bankledger_core::{StoredEvent, UserId};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: Decimal,
}

/// Transfer request; `userId` is the destination account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub user_id: UserId,
    pub amount: Decimal,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct BalanceDto {
    pub amount: Decimal,
}

/// One statement line. `operationType` is the stored event discriminant
/// (`DEPOSIT`, `WITHDRAW`, `TRANSFER_IN`, `TRANSFER_OUT`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementEntryDto {
    pub amount: Decimal,
    pub operation_type: &'static str,
    pub date: DateTime<Utc>,
}

impl From<&StoredEvent> for StatementEntryDto {
    fn from(event: &StoredEvent) -> Self {
        StatementEntryDto {
            amount: event.amount,
            operation_type: event.kind.name(),
            date: event.occurred_at,
        }
    }
}
