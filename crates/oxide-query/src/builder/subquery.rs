//! Sub-query arguments.

use crate::expression::Expression;
use crate::value::SqlValue;

use super::Builder;

/// A sub-query argument: a ready builder, a callback populating a fresh one,
/// or raw SQL.
pub enum SubQuery<'a> {
    /// An already populated builder.
    Builder(Builder),
    /// Populates a fresh builder sharing the parent's grammar.
    Callback(Box<dyn FnOnce(&mut Builder) + 'a>),
    /// Verbatim SQL without bindings.
    Raw(String),
}

impl<'a> SubQuery<'a> {
    /// Wraps a callback.
    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(&mut Builder) + 'a,
    {
        Self::Callback(Box::new(f))
    }

    /// Wraps raw SQL.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Resolves into a `(sql, bindings)` pair. Callbacks run against a fresh
    /// sub-query builder spawned from `parent`.
    pub(crate) fn compile(self, parent: &Builder) -> (String, Vec<SqlValue>) {
        match self {
            Self::Builder(query) => query.build(),
            Self::Callback(f) => {
                let mut query = parent.for_sub_query();
                f(&mut query);
                query.build()
            }
            Self::Raw(sql) => (sql, Vec::new()),
        }
    }
}

impl std::fmt::Debug for SubQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builder(query) => f.debug_tuple("Builder").field(query).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Raw(sql) => f.debug_tuple("Raw").field(sql).finish(),
        }
    }
}

impl From<Builder> for SubQuery<'_> {
    fn from(query: Builder) -> Self {
        Self::Builder(query)
    }
}

impl From<&Builder> for SubQuery<'_> {
    fn from(query: &Builder) -> Self {
        Self::Builder(query.clone())
    }
}

impl From<&str> for SubQuery<'_> {
    fn from(sql: &str) -> Self {
        Self::Raw(String::from(sql))
    }
}

impl From<String> for SubQuery<'_> {
    fn from(sql: String) -> Self {
        Self::Raw(sql)
    }
}

impl From<Expression> for SubQuery<'_> {
    fn from(expr: Expression) -> Self {
        Self::Raw(expr.value().to_owned())
    }
}
