//! # oxide-query
//!
//! A dialect-aware SQL query compiler with a fluent builder.
//!
//! This crate provides:
//! - A mutable, chainable [`Builder`] that accumulates select, join, where,
//!   group, having, order, limit, lock and union clauses
//! - Write operations: update, batch update, insert, insert-or-ignore, upsert
//!   and delete
//! - A pluggable [`Grammar`] that compiles the accumulated state into SQL text
//!   with `?` placeholders ([`MySqlGrammar`] by default)
//! - Parameter bindings kept in per-clause buckets so that their order always
//!   matches the placeholders of the compiled statement
//!
//! ## Building a query
//!
//! ```rust
//! use oxide_query::{Builder, JoinType};
//!
//! let mut query = Builder::table("users");
//! query
//!     .select(["users.id", "contacts.phone"])
//!     .join_with("contacts", JoinType::Left, |join| {
//!         join.on("users.id", "=", "contacts.user_id")
//!             .where_eq("contacts.primary", true);
//!     })
//!     .where_nested(|q| {
//!         q.where_eq("users.role", "admin").or_where_null("users.role");
//!     })
//!     .limit(20);
//!
//! let (sql, params) = query.build();
//! assert_eq!(
//!     sql,
//!     "select `users`.`id`, `contacts`.`phone` from `users` \
//!      left join `contacts` on `users`.`id` = `contacts`.`user_id` and `contacts`.`primary` = ? \
//!      where (`users`.`role` = ? or `users`.`role` is null) limit 20"
//! );
//! assert_eq!(params.len(), 2);
//! ```
//!
//! ## Writing rows
//!
//! ```rust
//! use oxide_query::{Builder, Row};
//!
//! let mut query = Builder::table("users");
//! query
//!     .insert(vec![
//!         Row::new().set("name", "Ada").set("email", "ada@example.com"),
//!         Row::new().set("email", "alan@example.com").set("name", "Alan"),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     query.to_sql(),
//!     "insert into `users` (`email`, `name`) values (?, ?), (?, ?)"
//! );
//! ```
//!
//! ## Literal fragments
//!
//! Values and identifiers wrapped in an [`Expression`] are emitted verbatim
//! and never bound:
//!
//! ```rust
//! use oxide_query::{raw, Builder, Row};
//!
//! let mut query = Builder::table("posts");
//! query.where_eq("id", 7);
//! query.update(Row::new().set("views", raw("views + 1"))).unwrap();
//!
//! assert_eq!(query.to_sql(), "update `posts` set `views` = views + 1 where `id` = ?");
//! assert_eq!(query.bindings().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod expression;
pub mod grammar;
pub mod value;

pub use builder::{
    BatchStrategy, Bindings, Boolean, Bucket, Builder, Component, Direction, FullTextMode,
    FullTextOptions, JoinClause, JoinType, Operation, Row, Rows, SubQuery, UpsertColumn,
};
pub use error::{QueryError, Result};
pub use expression::{raw, Expression};
pub use grammar::{Grammar, MySqlGrammar};
pub use value::{Ident, SqlValue, ToSqlValue, Value};
