//! Join clauses.

use std::ops::{Deref, DerefMut};

use crate::value::Ident;

use super::clause::{JoinType, Scope};
use super::Builder;

/// One JOIN: a kind, a target table and an ON-condition tree.
///
/// A join clause is a builder scoped to [`Scope::Join`], so every where-family
/// method is available on it and its conditions render with `on`. It shares
/// the parent's grammar.
#[derive(Debug, Clone)]
pub struct JoinClause {
    pub(crate) kind: JoinType,
    pub(crate) table: Ident,
    pub(crate) query: Builder,
}

impl JoinClause {
    /// Creates an empty join clause under `parent`.
    #[must_use]
    pub fn new(parent: &Builder, kind: JoinType, table: impl Into<Ident>) -> Self {
        let mut query = Builder::with_grammar(parent.grammar.clone());
        query.scope = Scope::Join;
        Self {
            kind,
            table: table.into(),
            query,
        }
    }

    /// The join kind.
    #[must_use]
    pub const fn kind(&self) -> JoinType {
        self.kind
    }

    /// The joined table.
    #[must_use]
    pub const fn table(&self) -> &Ident {
        &self.table
    }
}

impl Deref for JoinClause {
    type Target = Builder;

    fn deref(&self) -> &Builder {
        &self.query
    }
}

impl DerefMut for JoinClause {
    fn deref_mut(&mut self) -> &mut Builder {
        &mut self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_clause_renders_on() {
        let parent = Builder::new();
        let mut join = JoinClause::new(&parent, JoinType::Left, "contacts");
        join.on("users.id", "=", "contacts.user_id")
            .or_on("users.id", "=", "contacts.owner_id");

        let grammar = parent.grammar();
        assert_eq!(
            grammar.compile_wheres(&join),
            "on `users`.`id` = `contacts`.`user_id` or `users`.`id` = `contacts`.`owner_id`"
        );
        assert_eq!(join.kind(), JoinType::Left);
    }

    #[test]
    fn test_sub_query_spawned_from_join_is_a_plain_query() {
        let parent = Builder::new();
        let join = JoinClause::new(&parent, JoinType::Inner, "contacts");
        assert_eq!(join.for_sub_query().scope, Scope::Query);
        assert_eq!(join.for_nested_where().scope, Scope::Join);
    }
}
