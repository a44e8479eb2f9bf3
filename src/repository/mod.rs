//! Repository layer for database operations

pub mod books;
pub mod libraries;

use std::{
    ops::{Deref, DerefMut},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite, SqliteConnection, Transaction,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{config::DatabaseConfig, error::AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub books: books::BooksRepository,
    pub libraries: libraries::LibrariesRepository,
    /// Held for the lifetime of every write transaction
    write_lock: Arc<Mutex<()>>,
}

/// Write transaction holding the process-wide writer lock.
///
/// SQLite allows a single writer. Two deferred transactions that both read
/// before writing deadlock on lock upgrade and one gets `SQLITE_BUSY`, so
/// writers are queued here before `BEGIN`.
pub struct WriteTransaction {
    tx: Transaction<'static, Sqlite>,
    _guard: OwnedMutexGuard<()>,
}

impl WriteTransaction {
    pub async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl Deref for WriteTransaction {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            libraries: libraries::LibrariesRepository::new(pool.clone()),
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open the pool described by `config` and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(30));

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections);

        // Each in-memory connection is its own database: keep exactly one alive
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }

    /// Start a write transaction, waiting for any other writer to finish
    pub async fn begin(&self) -> AppResult<WriteTransaction> {
        let guard = self.write_lock.clone().lock_owned().await;
        let tx = self.pool.begin().await?;
        Ok(WriteTransaction { tx, _guard: guard })
    }

    /// Round-trip to the database, for readiness checks
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn test_repository() -> Repository {
    Repository::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database")
}
