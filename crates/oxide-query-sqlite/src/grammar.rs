//! SQLite grammar implementation.

use oxide_query::builder::{Builder, Lock};
use oxide_query::{Grammar, Ident, Row, SqlValue, UpsertColumn, Value};

/// SQLite grammar.
#[derive(Debug, Clone, Default)]
pub struct SqliteGrammar {
    table_prefix: String,
}

impl SqliteGrammar {
    /// Creates a SQLite grammar without a table prefix.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table_prefix: String::new(),
        }
    }

    /// Sets the prefix applied to every table name and table alias.
    #[must_use]
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }
}

fn ident_text(ident: &Ident) -> &str {
    match ident {
        Ident::Name(name) => name,
        Ident::Raw(expr) => expr.value(),
    }
}

impl Grammar for SqliteGrammar {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identifier_quote(&self) -> char {
        '"'
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn wrap_json_selector(&self, column: &str) -> String {
        let (field, path) = self.wrap_json_field_and_path(column);
        format!("json_extract({field}{path})")
    }

    fn where_null(&self, column: &Ident, not: bool) -> String {
        // json_extract already maps a JSON null to SQL NULL.
        let column = self.wrap_ident(column);
        if not {
            format!("{column} is not null")
        } else {
            format!("{column} is null")
        }
    }

    fn compile_json_contains(&self, column: &Ident, value: &str) -> String {
        let (field, path) = self.wrap_json_field_and_path(ident_text(column));
        format!(
            "exists (select 1 from json_each({field}{path}) where json_each.value is json_extract({value}, '$'))"
        )
    }

    fn compile_json_length(&self, column: &Ident, operator: &str, value: &str) -> String {
        let (field, path) = self.wrap_json_field_and_path(ident_text(column));
        format!("json_array_length({field}{path}) {operator} {value}")
    }

    fn compile_json_update_column(&self, key: &str, value: &Value) -> String {
        let value = match value {
            Value::Bound(SqlValue::Bool(b)) => format!("json('{b}')"),
            Value::Bound(SqlValue::Json(_)) => String::from("json(?)"),
            other => self.parameter(other),
        };
        let (field, path) = self.wrap_json_field_and_path(key);
        format!("{field} = json_set({field}{path}, {value})")
    }

    fn wrap_union(&self, sql: &str) -> String {
        format!("select * from ({sql})")
    }

    fn compile_lock(&self, _lock: &Lock) -> String {
        String::new()
    }

    fn compile_random(&self, _seed: &str) -> String {
        String::from("RANDOM()")
    }

    fn compile_insert_empty(&self, table: &str) -> String {
        format!("insert into {table} default values")
    }

    fn compile_insert_or_ignore(&self, query: &Builder, rows: &[Row]) -> String {
        self.compile_insert(query, rows)
            .replacen("insert", "insert or ignore", 1)
    }

    fn compile_upsert(
        &self,
        query: &Builder,
        rows: &[Row],
        unique_by: &[String],
        update: &[UpsertColumn],
    ) -> String {
        let unique_by: Vec<String> = unique_by.iter().map(|c| self.wrap(c)).collect();
        let excluded = self.wrap_value("excluded");
        let columns: Vec<String> = update
            .iter()
            .map(|column| match column {
                UpsertColumn::Inserted(name) => format!(
                    "{} = {excluded}.{}",
                    self.wrap(name),
                    self.wrap_value(name)
                ),
                UpsertColumn::Value(name, value) => {
                    format!("{} = {}", self.wrap(name), self.parameter(value))
                }
            })
            .collect();
        format!(
            "{} on conflict ({}) do update set {}",
            self.compile_insert(query, rows),
            unique_by.join(", "),
            columns.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn builder(table: &str) -> Builder {
        let mut query = Builder::with_grammar(Arc::new(SqliteGrammar::new()));
        query.from(table);
        query
    }

    #[test]
    fn test_sqlite_grammar() {
        let grammar = SqliteGrammar::new();
        assert_eq!(grammar.name(), "sqlite");
        assert_eq!(grammar.identifier_quote(), '"');
        assert_eq!(grammar.wrap("users.name"), "\"users\".\"name\"");
    }

    #[test]
    fn test_insert_or_ignore() {
        let mut query = builder("users");
        query
            .insert_or_ignore(Row::new().set("id", 1).set("name", "Alice"))
            .unwrap();
        assert_eq!(
            query.to_sql(),
            "insert or ignore into \"users\" (\"id\", \"name\") values (?, ?)"
        );
    }

    #[test]
    fn test_empty_insert_uses_default_values() {
        let mut query = builder("users");
        query.insert(Row::new()).unwrap();
        assert_eq!(query.to_sql(), "insert into \"users\" default values");
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_upsert() {
        let mut query = builder("users");
        query
            .upsert(
                Row::new().set("email", "a@example.com").set("name", "Alice"),
                ["email"],
                [
                    UpsertColumn::from("name"),
                    UpsertColumn::value("visits", 1),
                ],
            )
            .unwrap();
        assert_eq!(
            query.to_sql(),
            "insert into \"users\" (\"email\", \"name\") values (?, ?) \
             on conflict (\"email\") do update set \"name\" = \"excluded\".\"name\", \"visits\" = ?"
        );
        assert_eq!(
            query.bindings(),
            vec![
                SqlValue::Text(String::from("a@example.com")),
                SqlValue::Text(String::from("Alice")),
                SqlValue::Int(1),
            ]
        );
    }

    #[test]
    fn test_lock_is_ignored() {
        let mut query = builder("users");
        query.lock_for_update();
        assert_eq!(query.to_sql(), "select * from \"users\"");
    }

    #[test]
    fn test_union_wraps_in_sub_select() {
        let mut other = builder("admins");
        other.select(["name"]);
        let mut query = builder("users");
        query.select(["name"]).union_all(other);
        assert_eq!(
            query.to_sql(),
            "select * from (select \"name\" from \"users\") union all select * from (select \"name\" from \"admins\")"
        );
    }

    #[test]
    fn test_json_contains_uses_json_each() {
        let mut query = builder("users");
        query.where_json_contains("meta->tags", "rust");
        assert_eq!(
            query.to_sql(),
            "select * from \"users\" where exists (select 1 from json_each(\"meta\", '$.\"tags\"') \
             where json_each.value is json_extract(?, '$'))"
        );
        assert_eq!(query.bindings().len(), 1);
    }

    #[test]
    fn test_json_null_uses_extract() {
        let mut query = builder("users");
        query.where_null("meta->tag");
        assert_eq!(
            query.to_sql(),
            "select * from \"users\" where json_extract(\"meta\", '$.\"tag\"') is null"
        );
    }
}
