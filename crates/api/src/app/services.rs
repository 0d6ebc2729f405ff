//! Infrastructure wiring behind the HTTP handlers.

use bankledger_core::{BalanceProjection, LedgerCommand, StoredEvent, UserId};
use bankledger_infra::{InMemoryEventStore, LedgerError, LedgerService, PostgresEventStore};

/// The wired ledger service, one variant per storage backend.
///
/// Handlers talk to this facade so they stay ignorant of which store is
/// running underneath.
pub enum AppServices {
    InMemory {
        ledger: LedgerService<InMemoryEventStore>,
    },
    Postgres {
        ledger: LedgerService<PostgresEventStore>,
    },
}

impl AppServices {
    /// In-memory wiring (dev default and tests).
    pub fn in_memory() -> Self {
        AppServices::InMemory {
            ledger: LedgerService::new(InMemoryEventStore::new()),
        }
    }

    /// Postgres wiring; creates the schema at boot if missing.
    pub async fn postgres(database_url: &str) -> Result<Self, anyhow::Error> {
        let pool = sqlx::PgPool::connect(database_url).await?;
        let store = PostgresEventStore::new(pool);
        store.ensure_schema().await?;
        Ok(AppServices::Postgres {
            ledger: LedgerService::new(store),
        })
    }

    pub async fn balance(&self, user_id: UserId) -> Result<BalanceProjection, LedgerError> {
        match self {
            AppServices::InMemory { ledger } => ledger.balance(user_id).await,
            AppServices::Postgres { ledger } => ledger.balance(user_id).await,
        }
    }

    pub async fn statement(&self, user_id: UserId) -> Result<Vec<StoredEvent>, LedgerError> {
        match self {
            AppServices::InMemory { ledger } => ledger.statement(user_id).await,
            AppServices::Postgres { ledger } => ledger.statement(user_id).await,
        }
    }

    pub async fn handle(&self, command: LedgerCommand) -> Result<Vec<StoredEvent>, LedgerError> {
        match self {
            AppServices::InMemory { ledger } => ledger.handle(command).await,
            AppServices::Postgres { ledger } => ledger.handle(command).await,
        }
    }
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppServices::InMemory { .. } => f.write_str("AppServices::InMemory"),
            AppServices::Postgres { .. } => f.write_str("AppServices::Postgres"),
        }
    }
}

/// Select the storage backend from the environment: Postgres when
/// `DATABASE_URL` is set, in-memory otherwise.
pub async fn build_services() -> Result<AppServices, anyhow::Error> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            tracing::info!("using postgres event store");
            AppServices::postgres(&url).await
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory event store");
            Ok(AppServices::in_memory())
        }
    }
}
