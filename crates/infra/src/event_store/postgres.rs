//! Postgres-backed event store.
//!
//! Events live in a single append-only `account_events` table keyed by a
//! `BIGSERIAL` identity. The concurrency discipline is a per-user advisory
//! lock taken at the start of every write transaction: a plain
//! `SELECT ... FOR UPDATE` cannot lock an empty stream and does not exclude
//! concurrent inserts, so it would let two racing withdrawals both observe
//! the same pre-withdrawal balance. `pg_advisory_xact_lock(user_id)`
//! serializes the validate+append unit for one user on every path and is
//! released automatically at commit and rollback alike; writers of different
//! users never contend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use bankledger_core::{AccountEvent, EventId, EventKind, StoredEvent, UserId, ValidationError};

use super::r#trait::{AppendOutcome, EventStore, StorageError};

/// Postgres-backed append-only event store.
///
/// Clone-cheap; the connection pool handles sharing across tasks.
#[derive(Debug, Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the events table and index if missing.
    ///
    /// Called once at process startup, before the store is used.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account_events (
                id                  BIGSERIAL PRIMARY KEY,
                user_id             BIGINT NOT NULL,
                amount              NUMERIC(12, 2) NOT NULL,
                event_type          TEXT NOT NULL,
                destination_user_id BIGINT,
                created_date        TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_table", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_account_events_user ON account_events (user_id, id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_index", e))?;

        Ok(())
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    #[instrument(skip(self), fields(user_id = user_id.as_i64()), err)]
    async fn events_for_user(&self, user_id: UserId) -> Result<Vec<StoredEvent>, StorageError> {
        fetch_stream(&self.pool, user_id).await
    }

    #[instrument(skip(self, decide), fields(user_id = user_id.as_i64()), err)]
    async fn append_with<F>(
        &self,
        user_id: UserId,
        decide: F,
    ) -> Result<AppendOutcome, StorageError>
    where
        F: FnOnce(&[StoredEvent]) -> Result<Vec<AccountEvent>, ValidationError> + Send,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Serialize writers of this user's stream for the rest of the
        // transaction. Readers and other users' writers are unaffected.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("advisory_lock", e))?;

        let current = fetch_stream(&mut *tx, user_id).await?;

        let events = match decide(&current) {
            Ok(events) => events,
            Err(reason) => {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Ok(AppendOutcome::Rejected(reason));
            }
        };

        let mut stored = Vec::with_capacity(events.len());
        for event in events {
            let destination = match event.kind {
                EventKind::TransferOut { destination } => Some(destination.as_i64()),
                _ => None,
            };

            let row = sqlx::query(
                r#"
                INSERT INTO account_events
                    (user_id, amount, event_type, destination_user_id, created_date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(event.user_id.as_i64())
            .bind(event.amount)
            .bind(event.kind.name())
            .bind(destination)
            .bind(event.occurred_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_event", e))?;

            let id: i64 = row
                .try_get("id")
                .map_err(|e| map_sqlx_error("insert_event", e))?;

            stored.push(StoredEvent {
                id: EventId::new(id),
                user_id: event.user_id,
                amount: event.amount,
                kind: event.kind,
                occurred_at: event.occurred_at,
            });
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(AppendOutcome::Committed(stored))
    }
}

/// Load a user's stream, oldest first, through any executor (pool or open
/// transaction). Within the write transaction this read and the subsequent
/// inserts observe the same snapshot.
async fn fetch_stream<'e, E>(executor: E, user_id: UserId) -> Result<Vec<StoredEvent>, StorageError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, amount, event_type, destination_user_id, created_date
        FROM account_events
        WHERE user_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(user_id.as_i64())
    .fetch_all(executor)
    .await
    .map_err(|e| map_sqlx_error("fetch_stream", e))?;

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        let row = AccountEventRow::from_row(&row)
            .map_err(|e| StorageError::CorruptRow(format!("row decode failed: {e}")))?;
        events.push(row.try_into()?);
    }
    Ok(events)
}

fn map_sqlx_error(operation: &'static str, source: sqlx::Error) -> StorageError {
    StorageError::Database { operation, source }
}

#[derive(Debug)]
struct AccountEventRow {
    id: i64,
    user_id: i64,
    amount: Decimal,
    event_type: String,
    destination_user_id: Option<i64>,
    created_date: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for AccountEventRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(AccountEventRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            amount: row.try_get("amount")?,
            event_type: row.try_get("event_type")?,
            destination_user_id: row.try_get("destination_user_id")?,
            created_date: row.try_get("created_date")?,
        })
    }
}

impl TryFrom<AccountEventRow> for StoredEvent {
    type Error = StorageError;

    fn try_from(row: AccountEventRow) -> Result<Self, StorageError> {
        let kind = match (row.event_type.as_str(), row.destination_user_id) {
            ("DEPOSIT", _) => EventKind::Deposit,
            ("WITHDRAW", _) => EventKind::Withdraw,
            ("TRANSFER_IN", _) => EventKind::TransferIn,
            ("TRANSFER_OUT", Some(destination)) => EventKind::TransferOut {
                destination: UserId::new(destination),
            },
            ("TRANSFER_OUT", None) => {
                return Err(StorageError::CorruptRow(format!(
                    "event {} is TRANSFER_OUT without a destination",
                    row.id
                )));
            }
            (other, _) => {
                return Err(StorageError::CorruptRow(format!(
                    "event {} has unknown event_type '{other}'",
                    row.id
                )));
            }
        };

        Ok(StoredEvent {
            id: EventId::new(row.id),
            user_id: UserId::new(row.user_id),
            amount: row.amount,
            kind,
            occurred_at: row.created_date,
        })
    }
}
