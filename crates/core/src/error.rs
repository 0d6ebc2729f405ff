//! Domain error model.

use thiserror::Error;

/// Business-rule rejection of a proposed command.
///
/// Keep this focused on deterministic admission failures. Infrastructure
/// concerns (storage, connectivity) belong to `bankledger-infra`.
///
/// The display strings are the reason strings surfaced to callers, so they
/// are part of the contract.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The requested amount is zero; a zero event would be a no-op fact.
    #[error("zero amount")]
    ZeroAmount,

    /// The requested amount is negative. A negative debit would pass the
    /// balance check and mint money, so it is rejected outright.
    #[error("negative amount")]
    NegativeAmount,

    /// The amount carries more fractional digits than the ledger stores.
    #[error("scale exceeded")]
    ScaleExceeded,

    /// A debit was requested for more than the current balance.
    #[error("insufficient balance")]
    InsufficientBalance,
}
