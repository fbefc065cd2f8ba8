//! Database error types.

use thiserror::Error;

/// Errors raised while connecting to or migrating the database.
///
/// Query methods on the models return [`sqlx::Error`] directly; this type
/// wraps it for callers that mix setup and queries.
#[derive(Debug, Error)]
pub enum DbError {
    /// Driver or query failure
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Embedded migration failure
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Invalid connection settings
    #[error("invalid database configuration: {0}")]
    Config(String),
}
