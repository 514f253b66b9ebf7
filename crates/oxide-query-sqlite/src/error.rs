//! Error types for SQLite execution.

use oxide_query::QueryError;
use thiserror::Error;

/// Errors raised while building or running a query against SQLite.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Query building error.
    #[error("query error: {0}")]
    Query(#[from] QueryError),
}

/// Result type alias for SQLite execution.
pub type Result<T> = std::result::Result<T, SqliteError>;
