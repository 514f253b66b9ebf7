//! # oxide-query-sqlite
//!
//! SQLite grammar and `sqlx` execution helpers for `oxide-query`.
//!
//! # How SQLite differs from MySQL
//!
//! - **Identifier quoting**: SQLite uses double quotes (`"`). See
//!   [SQLite keywords].
//! - **[UPSERT]**: `insert ... on conflict (cols) do update set ...`, with
//!   the proposed row reachable as `excluded`.
//! - **Insert or ignore**: `insert or ignore into ...` instead of
//!   `insert ignore`.
//! - **Compound selects**: union branches cannot be parenthesized, so each
//!   branch is emitted as `select * from (...)`.
//! - **[JSON1]**: paths are read with `json_extract`, membership is tested
//!   through `json_each` and lengths through `json_array_length`.
//! - **Locking**: SQLite has no row locks; `for update` and shared locks
//!   compile to nothing.
//!
//! Join-strategy batch updates, deletes with joins and full-text
//! predicates use MySQL-only syntax and are not supported here.
//!
//! [SQLite keywords]: https://www.sqlite.org/lang_keywords.html
//! [UPSERT]: https://www.sqlite.org/lang_upsert.html
//! [JSON1]: https://www.sqlite.org/json1.html
//!
//! ## Example
//!
//! ```rust
//! use oxide_query::Row;
//! use oxide_query_sqlite::builder;
//!
//! let mut query = builder("users");
//! query
//!     .insert_or_ignore(Row::new().set("id", 1).set("name", "Alice"))
//!     .unwrap();
//!
//! assert_eq!(
//!     query.to_sql(),
//!     r#"insert or ignore into "users" ("id", "name") values (?, ?)"#
//! );
//! ```

use std::sync::Arc;

use oxide_query::{Builder, Ident};

mod error;
pub mod executor;
mod grammar;

pub use error::{Result, SqliteError};
pub use grammar::SqliteGrammar;

/// Creates a builder over `table` that compiles with [`SqliteGrammar`].
#[must_use]
pub fn builder(table: impl Into<Ident>) -> Builder {
    let mut query = Builder::with_grammar(Arc::new(SqliteGrammar::new()));
    query.from(table);
    query
}
