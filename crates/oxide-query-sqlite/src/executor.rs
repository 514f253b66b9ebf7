//! Running compiled builders through sqlx.
//!
//! The builder only produces SQL text and an ordered list of [`SqlValue`]s;
//! this module binds those values onto a `sqlx` query and runs it against a
//! [`SqlitePool`].

use oxide_query::{Builder, SqlValue};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteQueryResult, SqliteRow};
use sqlx::{Row, Sqlite};
use tracing::debug;

use crate::error::Result;

/// A sqlx query over SQLite with positional arguments.
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Binds a single value. JSON documents are bound as their serialized text.
#[must_use]
pub fn bind_value(query: SqliteQuery<'_>, value: SqlValue) -> SqliteQuery<'_> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
        SqlValue::Json(v) => query.bind(v.to_string()),
    }
}

/// Creates a sqlx query for `sql` with every binding attached in order.
#[must_use]
pub fn prepare(sql: &str, bindings: Vec<SqlValue>) -> SqliteQuery<'_> {
    bindings.into_iter().fold(sqlx::query(sql), bind_value)
}

/// Runs a write (or any statement) and returns the number of affected rows.
///
/// # Errors
///
/// Returns [`SqliteError::Database`](crate::SqliteError::Database) when the
/// statement fails.
pub async fn execute(pool: &SqlitePool, builder: &Builder) -> Result<u64> {
    let (sql, bindings) = builder.build();
    debug!(sql = %sql, bindings = bindings.len(), "executing statement");
    let result: SqliteQueryResult = prepare(&sql, bindings).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Runs a select and returns every row.
///
/// # Errors
///
/// Returns [`SqliteError::Database`](crate::SqliteError::Database) when the
/// statement fails.
pub async fn fetch_all(pool: &SqlitePool, builder: &Builder) -> Result<Vec<SqliteRow>> {
    let (sql, bindings) = builder.build();
    debug!(sql = %sql, bindings = bindings.len(), "fetching rows");
    let rows = prepare(&sql, bindings).fetch_all(pool).await?;
    Ok(rows)
}

/// Runs a select and returns the first row, if any.
///
/// # Errors
///
/// Returns [`SqliteError::Database`](crate::SqliteError::Database) when the
/// statement fails.
pub async fn fetch_optional(pool: &SqlitePool, builder: &Builder) -> Result<Option<SqliteRow>> {
    let (sql, bindings) = builder.build();
    debug!(sql = %sql, bindings = bindings.len(), "fetching optional row");
    let row = prepare(&sql, bindings).fetch_optional(pool).await?;
    Ok(row)
}

/// Runs `count(*)` over the builder's current select.
///
/// # Errors
///
/// Returns [`SqliteError::Database`](crate::SqliteError::Database) when the
/// statement fails.
pub async fn count(pool: &SqlitePool, builder: &Builder) -> Result<i64> {
    let query = builder.count();
    let (sql, bindings) = query.build();
    let row = prepare(&sql, bindings).fetch_one(pool).await?;
    Ok(row.try_get::<i64, _>(0)?)
}

/// Runs `select exists(...)` over the builder's current select.
///
/// # Errors
///
/// Returns [`SqliteError::Database`](crate::SqliteError::Database) when the
/// statement fails.
pub async fn exists(pool: &SqlitePool, builder: &Builder) -> Result<bool> {
    let sql = builder.to_exists_sql();
    let bindings = builder.bindings();
    debug!(sql = %sql, "checking existence");
    let row = prepare(&sql, bindings).fetch_one(pool).await?;
    Ok(row.try_get::<i64, _>(0)? != 0)
}
