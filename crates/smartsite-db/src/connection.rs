//! SQLite connection management.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::DbError;

/// Configuration for the SQLite pool.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Connection URL (e.g., `sqlite://smartsite.db`).
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a writer waits for the database lock.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://smartsite.db".into(),
            max_connections: 8,
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

/// Owns the connection pool shared by request handlers.
#[derive(Debug, Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open the pool described by `config`.
    ///
    /// Creates the database file when missing and enables WAL journaling
    /// and foreign keys.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connecting to SQLite"
        );

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DbError::Config(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database with migrations applied.
    ///
    /// Every connection to `:memory:` is a separate database, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::Config(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Apply embedded migrations.
    pub async fn migrate(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}
