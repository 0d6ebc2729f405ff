//! Write-path commands.
//!
//! A command is a request-level value; it is never persisted as-is. On
//! admission it fans out into one or two [`AccountEvent`]s (two for
//! transfers: the origin's debit plus the mirrored credit on the
//! destination's stream).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::event::{AccountEvent, EventKind};
use crate::id::UserId;
use crate::validate::AMOUNT_SCALE;

/// Request to move `amount` from `origin` to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCommand {
    pub origin: UserId,
    pub destination: UserId,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// The single write-path input of the ledger service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    Deposit {
        user_id: UserId,
        amount: Decimal,
        occurred_at: DateTime<Utc>,
    },
    Withdraw {
        user_id: UserId,
        amount: Decimal,
        occurred_at: DateTime<Utc>,
    },
    Transfer(TransferCommand),
}

impl LedgerCommand {
    /// The acting user: the account whose balance admits or rejects the
    /// command (the origin for transfers).
    pub fn user_id(&self) -> UserId {
        match self {
            LedgerCommand::Deposit { user_id, .. } => *user_id,
            LedgerCommand::Withdraw { user_id, .. } => *user_id,
            LedgerCommand::Transfer(t) => t.origin,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            LedgerCommand::Deposit { amount, .. } => *amount,
            LedgerCommand::Withdraw { amount, .. } => *amount,
            LedgerCommand::Transfer(t) => t.amount,
        }
    }

    /// Whether the command debits the acting user's balance.
    pub fn is_debit(&self) -> bool {
        matches!(
            self,
            LedgerCommand::Withdraw { .. } | LedgerCommand::Transfer(_)
        )
    }

    /// The events to append once the command is admitted.
    ///
    /// Transfers produce the debit and the mirrored credit sharing amount and
    /// timestamp; each belongs to its own user's stream and gets independent
    /// identity on append. Amounts are rescaled to the ledger's fixed scale
    /// so both storage backends persist identical values (validation has
    /// already established the amount fits).
    pub fn into_events(self) -> Vec<AccountEvent> {
        match self {
            LedgerCommand::Deposit {
                user_id,
                amount,
                occurred_at,
            } => vec![AccountEvent {
                user_id,
                amount: rescaled(amount),
                kind: EventKind::Deposit,
                occurred_at,
            }],
            LedgerCommand::Withdraw {
                user_id,
                amount,
                occurred_at,
            } => vec![AccountEvent {
                user_id,
                amount: rescaled(amount),
                kind: EventKind::Withdraw,
                occurred_at,
            }],
            LedgerCommand::Transfer(t) => {
                let amount = rescaled(t.amount);
                vec![
                    AccountEvent {
                        user_id: t.origin,
                        amount,
                        kind: EventKind::TransferOut {
                            destination: t.destination,
                        },
                        occurred_at: t.occurred_at,
                    },
                    AccountEvent {
                        user_id: t.destination,
                        amount,
                        kind: EventKind::TransferIn,
                        occurred_at: t.occurred_at,
                    },
                ]
            }
        }
    }
}

fn rescaled(mut amount: Decimal) -> Decimal {
    amount.rescale(AMOUNT_SCALE);
    amount
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn transfer_fans_out_into_debit_and_mirrored_credit() {
        let cmd = LedgerCommand::Transfer(TransferCommand {
            origin: UserId::new(1),
            destination: UserId::new(2),
            amount: dec("2.20"),
            occurred_at: Utc::now(),
        });

        let events = cmd.into_events();
        assert_eq!(events.len(), 2);

        let out = &events[0];
        let mirror = &events[1];
        assert_eq!(out.user_id, UserId::new(1));
        assert_eq!(
            out.kind,
            EventKind::TransferOut {
                destination: UserId::new(2)
            }
        );
        assert_eq!(mirror.user_id, UserId::new(2));
        assert_eq!(mirror.kind, EventKind::TransferIn);
        assert_eq!(out.amount, mirror.amount);
        assert_eq!(out.occurred_at, mirror.occurred_at);
    }

    #[test]
    fn deposit_produces_one_event_at_fixed_scale() {
        let cmd = LedgerCommand::Deposit {
            user_id: UserId::new(7),
            amount: dec("10"),
            occurred_at: Utc::now(),
        };

        let events = cmd.into_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount, dec("10.00"));
        assert_eq!(events[0].amount.scale(), AMOUNT_SCALE);
        assert_eq!(events[0].kind, EventKind::Deposit);
    }
}
