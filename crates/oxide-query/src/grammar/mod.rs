//! SQL grammars.
//!
//! A grammar turns a populated [`Builder`] into SQL text. Every renderer is a
//! default method of the [`Grammar`] trait producing the MySQL flavour;
//! dialects implement [`Grammar::name`] and override the hooks where their
//! syntax differs.
//!
//! Renderers only read builder state. Placeholders are emitted in exactly the
//! order the builder assembles its bindings.

mod mysql;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub use mysql::MySqlGrammar;

use crate::builder::{
    Aggregate, BatchStrategy, BatchUpdate, Builder, Component, Distinct, FullTextMode,
    FullTextOptions, HavingClause, HavingKind, JoinClause, Lock, Order, Row, UpsertColumn,
    WhereKind, BATCH_UPDATE_ALIAS,
};
use crate::value::{Ident, SqlValue, Value};

static ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+as\s+").expect("alias pattern is valid"));

static LEADING_BOOLEAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)and |or ").expect("boolean pattern is valid"));

static JSON_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\\+)?'").expect("json quote pattern is valid"));

/// Splits `name as alias` (any case, any surrounding whitespace).
fn split_alias(value: &str) -> Option<(&str, &str)> {
    let found = ALIAS.find(value)?;
    Some((&value[..found.start()], &value[found.end()..]))
}

/// Strips the first `and ` / `or ` of a rendered condition list.
fn remove_leading_boolean(value: &str) -> String {
    LEADING_BOOLEAN.replacen(value, 1, "").into_owned()
}

/// Joins the non-empty fragments with single spaces.
pub fn concatenate<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .filter(|s| !s.as_ref().is_empty())
        .map(|s| s.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ident_text(ident: &Ident) -> &str {
    match ident {
        Ident::Name(name) => name,
        Ident::Raw(expr) => expr.value(),
    }
}

/// Compiles builder state into SQL for one dialect.
pub trait Grammar: fmt::Debug + Send + Sync {
    /// Returns the name of the grammar.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '`'
    }

    /// Returns the prefix prepended to table names and table aliases.
    fn table_prefix(&self) -> &str {
        ""
    }

    /// Dialect-specific comparison operators, in lowercase.
    fn operators(&self) -> &'static [&'static str] {
        &[]
    }

    /// Dialect-specific bitwise operators, in lowercase.
    fn bitwise_operators(&self) -> &'static [&'static str] {
        &[]
    }

    // ------------------------------------------------------------------
    // Wrapping
    // ------------------------------------------------------------------

    /// Quotes one identifier segment, doubling embedded quote characters.
    /// `*` is left alone.
    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return String::from(value);
        }
        let quote = self.identifier_quote();
        let escaped = value.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Quotes a column reference: `a.b`, `a as b` or a JSON path `a->b`.
    fn wrap(&self, value: &str) -> String {
        if let Some((name, alias)) = split_alias(value) {
            return format!("{} as {}", self.wrap(name), self.wrap_value(alias));
        }
        if value.contains("->") {
            return self.wrap_json_selector(value);
        }
        self.wrap_segments(value)
    }

    /// Quotes a dotted name; the leading segment is treated as a table.
    fn wrap_segments(&self, value: &str) -> String {
        let segments: Vec<&str> = value.split('.').collect();
        let multi = segments.len() > 1;
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i == 0 && multi {
                    self.wrap_table(segment)
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a table reference, applying the table prefix to the table name
    /// and to its alias.
    fn wrap_table(&self, table: &str) -> String {
        let prefix = self.table_prefix();
        if let Some((name, alias)) = split_alias(table) {
            return format!(
                "{} as {}",
                self.wrap_table(name),
                self.wrap_value(&format!("{prefix}{alias}"))
            );
        }
        match table.rsplit_once('.') {
            Some((schema, name)) => format!(
                "{}.{}",
                self.wrap_value(schema),
                self.wrap_value(&format!("{prefix}{name}"))
            ),
            None => self.wrap_value(&format!("{prefix}{table}")),
        }
    }

    /// Quotes a column identifier; literal fragments pass through.
    fn wrap_ident(&self, ident: &Ident) -> String {
        match ident {
            Ident::Name(name) => self.wrap(name),
            Ident::Raw(expr) => expr.value().to_owned(),
        }
    }

    /// Quotes a table identifier; literal fragments pass through.
    fn wrap_table_ident(&self, ident: &Ident) -> String {
        match ident {
            Ident::Name(name) => self.wrap_table(name),
            Ident::Raw(expr) => expr.value().to_owned(),
        }
    }

    /// Splits `field->a->b` into the quoted field and `, '$."a"."b"'`.
    fn wrap_json_field_and_path(&self, column: &str) -> (String, String) {
        match column.split_once("->") {
            Some((field, path)) => (self.wrap(field), format!(", {}", self.wrap_json_path(path))),
            None => (self.wrap(column), String::new()),
        }
    }

    /// Renders a JSON path literal, escaping single quotes.
    fn wrap_json_path(&self, path: &str) -> String {
        let escaped = JSON_QUOTE.replace_all(path, "''");
        format!("'$.\"{}\"'", escaped.replace("->", "\".\""))
    }

    /// Renders a JSON-path column read.
    fn wrap_json_selector(&self, column: &str) -> String {
        let (field, path) = self.wrap_json_field_and_path(column);
        format!("json_unquote(json_extract({field}{path}))")
    }

    /// Renders a JSON-path column read compared against a boolean.
    fn wrap_json_boolean_selector(&self, column: &str) -> String {
        let (field, path) = self.wrap_json_field_and_path(column);
        format!("json_extract({field}{path})")
    }

    /// Quotes and comma-joins identifiers.
    fn columnize(&self, columns: &[Ident]) -> String {
        columns
            .iter()
            .map(|c| self.wrap_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `?` for bound values, the fragment itself for literals.
    fn parameter(&self, value: &Value) -> String {
        match value {
            Value::Bound(_) => String::from("?"),
            Value::Raw(expr) => expr.value().to_owned(),
        }
    }

    /// Comma-joins [`Grammar::parameter`] over `values`.
    fn parameterize(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|v| self.parameter(v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The quoted base table, empty when none is set.
    fn compile_table(&self, query: &Builder) -> String {
        query
            .from_ref()
            .map(|table| self.wrap_table_ident(table))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Select
    // ------------------------------------------------------------------

    /// Compiles a select statement.
    fn compile_select(&self, query: &Builder) -> String {
        if (!query.unions.is_empty() || !query.havings.is_empty()) && query.aggregate.is_some() {
            return self.compile_union_aggregate(query);
        }
        let sql = concatenate(self.compile_components(query));
        if query.unions.is_empty() {
            sql
        } else {
            format!("{} {}", self.wrap_union(&sql), self.compile_unions(query))
        }
    }

    /// Wraps one select taking part in a union.
    fn wrap_union(&self, sql: &str) -> String {
        format!("({sql})")
    }

    /// Renders every select component in fixed order.
    fn compile_components(&self, query: &Builder) -> Vec<String> {
        let mut sql = Vec::new();
        match &query.aggregate {
            Some(aggregate) => sql.push(self.compile_aggregate(query, aggregate)),
            None => {
                let star = [Ident::from("*")];
                let columns = query.columns.as_deref().unwrap_or(&star);
                sql.push(self.compile_columns(query, columns));
            }
        }
        if let Some(table) = &query.from {
            sql.push(format!("from {}", self.wrap_table_ident(table)));
        }
        if !query.joins.is_empty() {
            sql.push(self.compile_joins(&query.joins));
        }
        sql.push(self.compile_wheres(query));
        if !query.groups.is_empty() {
            sql.push(format!("group by {}", self.columnize(&query.groups)));
        }
        if !query.havings.is_empty() {
            sql.push(self.compile_havings(&query.havings));
        }
        sql.push(self.compile_orders(&query.orders));
        if let Some(limit) = query.limit {
            sql.push(self.compile_limit(limit));
        }
        if let Some(offset) = query.offset {
            sql.push(self.compile_offset(offset));
        }
        if let Some(lock) = &query.lock {
            sql.push(self.compile_lock(lock));
        }
        sql
    }

    /// `select fn(columns) as alias`.
    fn compile_aggregate(&self, query: &Builder, aggregate: &Aggregate) -> String {
        let mut column = self.columnize(&aggregate.columns);
        match &query.distinct {
            Distinct::Columns(columns) => column = format!("distinct {}", self.columnize(columns)),
            Distinct::All if column != "*" => column = format!("distinct {column}"),
            _ => {}
        }
        format!(
            "select {}({column}) as {}",
            aggregate.function, aggregate.alias
        )
    }

    /// `select [distinct] columns`.
    fn compile_columns(&self, query: &Builder, columns: &[Ident]) -> String {
        let select = if query.distinct.is_set() {
            "select distinct"
        } else {
            "select"
        };
        format!("{select} {}", self.columnize(columns))
    }

    /// Renders joins; a join carrying its own joins is parenthesized.
    fn compile_joins(&self, joins: &[JoinClause]) -> String {
        joins
            .iter()
            .map(|join| {
                let mut table = self.wrap_table_ident(join.table());
                if !join.joins.is_empty() {
                    table = format!("({table} {})", self.compile_joins(&join.joins));
                }
                concatenate([
                    format!("{} join", join.kind().as_str()),
                    table,
                    self.compile_wheres(join),
                ])
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `where ...` (or `on ...` for a join), empty without conditions.
    fn compile_wheres(&self, query: &Builder) -> String {
        if query.wheres.is_empty() {
            return String::new();
        }
        let sql: Vec<String> = query
            .wheres
            .iter()
            .map(|clause| {
                format!(
                    "{} {}",
                    clause.boolean.as_str(),
                    self.compile_where(query, &clause.kind)
                )
            })
            .collect();
        format!(
            "{} {}",
            query.scope().conjunction(),
            remove_leading_boolean(&sql.join(" "))
        )
    }

    /// Renders one where node without its connector.
    fn compile_where(&self, query: &Builder, kind: &WhereKind) -> String {
        match kind {
            WhereKind::Basic {
                column,
                operator,
                value,
            }
            | WhereKind::Bitwise {
                column,
                operator,
                value,
            } => format!(
                "{} {operator} {}",
                self.wrap_ident(column),
                self.parameter(value)
            ),
            WhereKind::Column {
                first,
                operator,
                second,
            } => format!(
                "{} {operator} {}",
                self.wrap_ident(first),
                self.wrap_ident(second)
            ),
            WhereKind::Raw { sql } => sql.clone(),
            WhereKind::In { column, values } => {
                if values.is_empty() {
                    String::from("0 = 1")
                } else {
                    format!("{} in ({})", self.wrap_ident(column), self.parameterize(values))
                }
            }
            WhereKind::NotIn { column, values } => {
                if values.is_empty() {
                    String::from("1 = 1")
                } else {
                    format!(
                        "{} not in ({})",
                        self.wrap_ident(column),
                        self.parameterize(values)
                    )
                }
            }
            WhereKind::InRaw { column, values } => {
                if values.is_empty() {
                    String::from("0 = 1")
                } else {
                    format!("{} in ({})", self.wrap_ident(column), join_integers(values))
                }
            }
            WhereKind::NotInRaw { column, values } => {
                if values.is_empty() {
                    String::from("1 = 1")
                } else {
                    format!("{} not in ({})", self.wrap_ident(column), join_integers(values))
                }
            }
            WhereKind::Null { column } => self.where_null(column, false),
            WhereKind::NotNull { column } => self.where_null(column, true),
            WhereKind::Between { column, values, not } => format!(
                "{} {} {} and {}",
                self.wrap_ident(column),
                if *not { "not between" } else { "between" },
                self.parameter(&values[0]),
                self.parameter(&values[1])
            ),
            WhereKind::BetweenColumns { column, values, not } => format!(
                "{} {} {} and {}",
                self.wrap_ident(column),
                if *not { "not between" } else { "between" },
                self.wrap_ident(&values[0]),
                self.wrap_ident(&values[1])
            ),
            WhereKind::Date {
                part,
                column,
                operator,
                value,
            } => format!(
                "{}({}) {operator} {}",
                part.as_str(),
                self.wrap_ident(column),
                self.parameter(value)
            ),
            WhereKind::Nested { query: nested } => {
                // The nested compile already stripped its own connector; drop
                // the `where ` / `on ` keyword it was prefixed with.
                let offset = query.scope().conjunction().len() + 1;
                let compiled = self.compile_wheres(nested);
                format!("({})", compiled.get(offset..).unwrap_or_default())
            }
            WhereKind::Sub {
                column,
                operator,
                query,
            } => format!("{} {operator} ({query})", self.wrap_ident(column)),
            WhereKind::Exists { query } => format!("exists ({query})"),
            WhereKind::NotExists { query } => format!("not exists ({query})"),
            WhereKind::JsonBoolean {
                column,
                operator,
                value,
            } => format!(
                "{} {operator} {value}",
                self.wrap_json_boolean_selector(ident_text(column))
            ),
            WhereKind::JsonContains { column, value, not } => {
                let sql = self.compile_json_contains(column, &self.parameter(value));
                if *not {
                    format!("not {sql}")
                } else {
                    sql
                }
            }
            WhereKind::JsonLength {
                column,
                operator,
                value,
            } => self.compile_json_length(column, operator, &self.parameter(value)),
            WhereKind::RowValues {
                columns,
                operator,
                values,
            } => format!(
                "({}) {operator} ({})",
                self.columnize(columns),
                self.parameterize(values)
            ),
            WhereKind::FullText {
                columns,
                value,
                options,
            } => self.where_full_text(columns, &self.parameter(value), *options),
        }
    }

    /// `column is [not] null`. On a JSON path a JSON `null` counts as NULL.
    fn where_null(&self, column: &Ident, not: bool) -> String {
        if let Some(name) = column.as_name().filter(|name| name.contains("->")) {
            let (field, path) = self.wrap_json_field_and_path(name);
            let extract = format!("json_extract({field}{path})");
            return if not {
                format!("({extract} is not null AND json_type({extract}) != 'NULL')")
            } else {
                format!("({extract} is null OR json_type({extract}) = 'NULL')")
            };
        }
        let column = self.wrap_ident(column);
        if not {
            format!("{column} is not null")
        } else {
            format!("{column} is null")
        }
    }

    /// `json_contains(field, value[, path])`.
    fn compile_json_contains(&self, column: &Ident, value: &str) -> String {
        let (field, path) = self.wrap_json_field_and_path(ident_text(column));
        format!("json_contains({field}, {value}{path})")
    }

    /// `json_length(field[, path]) op value`.
    fn compile_json_length(&self, column: &Ident, operator: &str, value: &str) -> String {
        let (field, path) = self.wrap_json_field_and_path(ident_text(column));
        format!("json_length({field}{path}) {operator} {value}")
    }

    /// `match (columns) against (value in ... mode)`.
    fn where_full_text(&self, columns: &[Ident], value: &str, options: FullTextOptions) -> String {
        let (mode, expanded) = match options.mode {
            FullTextMode::Boolean => (" in boolean mode", ""),
            FullTextMode::NaturalLanguage => (
                " in natural language mode",
                if options.expanded {
                    " with query expansion"
                } else {
                    ""
                },
            ),
        };
        format!(
            "match ({}) against ({value}{mode}{expanded})",
            self.columnize(columns)
        )
    }

    /// `having ...`.
    fn compile_havings(&self, havings: &[HavingClause]) -> String {
        let sql: Vec<String> = havings
            .iter()
            .map(|having| {
                format!(
                    "{} {}",
                    having.boolean.as_str(),
                    self.compile_having(&having.kind)
                )
            })
            .collect();
        format!("having {}", remove_leading_boolean(&sql.join(" ")))
    }

    /// Renders one having node without its connector.
    fn compile_having(&self, kind: &HavingKind) -> String {
        match kind {
            HavingKind::Basic {
                column,
                operator,
                value,
            }
            | HavingKind::Bitwise {
                column,
                operator,
                value,
            } => format!(
                "{} {operator} {}",
                self.wrap_ident(column),
                self.parameter(value)
            ),
            HavingKind::Raw { sql } => sql.clone(),
            HavingKind::Between { column, values, not } => format!(
                "{} {} {} and {}",
                self.wrap_ident(column),
                if *not { "not between" } else { "between" },
                self.parameter(&values[0]),
                self.parameter(&values[1])
            ),
        }
    }

    /// `order by ...`, empty without orders.
    fn compile_orders(&self, orders: &[Order]) -> String {
        if orders.is_empty() {
            return String::new();
        }
        let sql: Vec<String> = orders
            .iter()
            .map(|order| match order {
                Order::Column { column, direction } => {
                    format!("{} {}", self.wrap_ident(column), direction.as_str())
                }
                Order::Raw { sql } => sql.clone(),
            })
            .collect();
        format!("order by {}", sql.join(", "))
    }

    /// `limit n`.
    fn compile_limit(&self, limit: u64) -> String {
        format!("limit {limit}")
    }

    /// `offset n`.
    fn compile_offset(&self, offset: u64) -> String {
        format!("offset {offset}")
    }

    /// Renders a row lock.
    fn compile_lock(&self, lock: &Lock) -> String {
        match lock {
            Lock::Update => String::from("for update"),
            Lock::Shared => String::from("lock in share mode"),
            Lock::Raw(sql) => sql.clone(),
        }
    }

    /// Random ordering expression.
    fn compile_random(&self, seed: &str) -> String {
        format!("RAND({seed})")
    }

    /// The union branches followed by the union-level order, limit and offset.
    fn compile_unions(&self, query: &Builder) -> String {
        let mut sql: Vec<String> = query
            .unions
            .iter()
            .map(|union| {
                let conjunction = if union.all { "union all" } else { "union" };
                format!(
                    "{conjunction} {}",
                    self.wrap_union(&self.compile_select(&union.query))
                )
            })
            .collect();
        sql.push(self.compile_orders(&query.union_orders));
        if let Some(limit) = query.union_limit {
            sql.push(self.compile_limit(limit));
        }
        if let Some(offset) = query.union_offset {
            sql.push(self.compile_offset(offset));
        }
        concatenate(sql)
    }

    /// Computes the aggregate over the rows of the unioned or filtered select.
    fn compile_union_aggregate(&self, query: &Builder) -> String {
        let Some(aggregate) = &query.aggregate else {
            return self.compile_select(query);
        };
        let sql = self.compile_aggregate(query, aggregate);
        let inner = query.clone_without(&[Component::Aggregate]);
        format!(
            "{sql} from ({}) as {}",
            self.compile_select(&inner),
            self.wrap_table("temp_table")
        )
    }

    /// `select exists(<select>) as exists`.
    fn compile_exists(&self, query: &Builder) -> String {
        format!(
            "select exists({}) as {}",
            self.compile_select(query),
            self.wrap("exists")
        )
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// `insert into t (columns) values (...), (...)`. Columns come from the
    /// first row.
    fn compile_insert(&self, query: &Builder, rows: &[Row]) -> String {
        let table = self.compile_table(query);
        let Some(first) = rows.first().filter(|_| !rows.iter().all(Row::is_empty)) else {
            return self.compile_insert_empty(&table);
        };
        let columns = first
            .columns()
            .map(|c| self.wrap(c))
            .collect::<Vec<_>>()
            .join(", ");
        let values = rows
            .iter()
            .map(|row| {
                let params: Vec<String> = row.values().map(|v| self.parameter(v)).collect();
                format!("({})", params.join(", "))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("insert into {table} ({columns}) values {values}")
    }

    /// Insert of a row without columns.
    fn compile_insert_empty(&self, table: &str) -> String {
        format!("insert into {table} () values ()")
    }

    /// `insert ignore into ...`.
    fn compile_insert_or_ignore(&self, query: &Builder, rows: &[Row]) -> String {
        self.compile_insert(query, rows)
            .replacen("insert", "insert ignore", 1)
    }

    /// `insert ... on duplicate key update ...`.
    fn compile_upsert(
        &self,
        query: &Builder,
        rows: &[Row],
        _unique_by: &[String],
        update: &[UpsertColumn],
    ) -> String {
        let columns: Vec<String> = update
            .iter()
            .map(|column| match column {
                UpsertColumn::Inserted(name) => {
                    let wrapped = self.wrap(name);
                    format!("{wrapped} = values({wrapped})")
                }
                UpsertColumn::Value(name, value) => {
                    format!("{} = {}", self.wrap(name), self.parameter(value))
                }
            })
            .collect();
        format!(
            "{} on duplicate key update {}",
            self.compile_insert(query, rows),
            columns.join(", ")
        )
    }

    /// `update t set ...`.
    fn compile_update(&self, query: &Builder, row: &Row) -> String {
        let columns = self.compile_update_columns(row);
        self.compile_update_statement(query, &columns)
    }

    /// Renders an update around a prepared SET list. With joins the SET list
    /// follows the joins; without, ORDER BY and LIMIT are honored.
    fn compile_update_statement(&self, query: &Builder, columns: &str) -> String {
        let table = self.compile_table(query);
        if query.joins.is_empty() {
            concatenate([
                format!("update {table} set {columns}"),
                self.compile_wheres(query),
                self.compile_orders(&query.orders),
                query.limit.map(|l| self.compile_limit(l)).unwrap_or_default(),
            ])
        } else {
            concatenate([
                format!("update {table}"),
                self.compile_joins(&query.joins),
                format!("set {columns}"),
                self.compile_wheres(query),
            ])
        }
    }

    /// `col = ?, ...`; JSON-path keys render `json_set`.
    fn compile_update_columns(&self, row: &Row) -> String {
        row.iter()
            .map(|(column, value)| {
                if column.contains("->") {
                    self.compile_json_update_column(column, value)
                } else {
                    format!("{} = {}", self.wrap(column), self.parameter(value))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `field = json_set(field, path, value)`.
    fn compile_json_update_column(&self, key: &str, value: &Value) -> String {
        let value = match value {
            Value::Bound(SqlValue::Bool(b)) => b.to_string(),
            Value::Bound(SqlValue::Json(_)) => String::from("cast(? as json)"),
            other => self.parameter(other),
        };
        let (field, path) = self.wrap_json_field_and_path(key);
        format!("{field} = json_set({field}{path}, {value})")
    }

    /// Multi-row update in the batch's strategy.
    fn compile_batch_update(&self, query: &Builder, batch: &BatchUpdate) -> String {
        let columns = match batch.strategy {
            BatchStrategy::CaseWhen => self.compile_batch_update_columns(batch),
            BatchStrategy::Join => self.compile_batch_update_join_columns(query, batch),
        };
        self.compile_update_statement(query, &columns)
    }

    /// `field = (case when index = ? then ? ... else field end), ...`.
    fn compile_batch_update_columns(&self, batch: &BatchUpdate) -> String {
        let index = self.wrap(&batch.index);
        batch
            .field_cases()
            .iter()
            .map(|(field, arms)| {
                let field = self.wrap(field);
                let arms: Vec<String> = arms
                    .iter()
                    .map(|arm| {
                        format!(
                            "when {index} = {} then {}",
                            self.parameter(arm.key),
                            self.parameter(arm.value)
                        )
                    })
                    .collect();
                format!("{field} = (case {} else {field} end)", arms.join(" "))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `target.field = updates.field, ...`.
    fn compile_batch_update_join_columns(&self, query: &Builder, batch: &BatchUpdate) -> String {
        let target = self.wrap_table(query.from_alias().unwrap_or_default());
        let alias = self.wrap_table(BATCH_UPDATE_ALIAS);
        batch
            .update_columns()
            .map(|column| {
                let column = self.wrap_value(column);
                format!("{target}.{column} = {alias}.{column}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `delete from t ...`; with joins `delete alias from t joins ...`.
    fn compile_delete(&self, query: &Builder) -> String {
        let table = self.compile_table(query);
        if query.joins.is_empty() {
            concatenate([
                format!("delete from {table}"),
                self.compile_wheres(query),
                self.compile_orders(&query.orders),
                query.limit.map(|l| self.compile_limit(l)).unwrap_or_default(),
            ])
        } else {
            let alias = table.rsplit(" as ").next().unwrap_or(table.as_str());
            concatenate([
                format!("delete {alias} from {table}"),
                self.compile_joins(&query.joins),
                self.compile_wheres(query),
            ])
        }
    }
}

fn join_integers(values: &[i64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_value_doubles_quotes() {
        let grammar = MySqlGrammar::new();
        assert_eq!(grammar.wrap_value("we`ird"), "`we``ird`");
        assert_eq!(grammar.wrap_value("*"), "*");
    }

    #[test]
    fn test_wrap_dotted_and_aliased() {
        let grammar = MySqlGrammar::new();
        assert_eq!(grammar.wrap("users.name"), "`users`.`name`");
        assert_eq!(grammar.wrap("users.*"), "`users`.*");
        assert_eq!(grammar.wrap("name AS n"), "`name` as `n`");
    }

    #[test]
    fn test_table_prefix_applies_to_tables_and_aliases() {
        let grammar = MySqlGrammar::new().with_table_prefix("wp_");
        assert_eq!(grammar.wrap_table("posts"), "`wp_posts`");
        assert_eq!(grammar.wrap_table("posts as p"), "`wp_posts` as `wp_p`");
        assert_eq!(grammar.wrap("posts.id"), "`wp_posts`.`id`");
        assert_eq!(grammar.wrap("id"), "`id`");
    }

    #[test]
    fn test_json_path() {
        let grammar = MySqlGrammar::new();
        assert_eq!(
            grammar.wrap("options->language->primary"),
            "json_unquote(json_extract(`options`, '$.\"language\".\"primary\"'))"
        );
        assert_eq!(grammar.wrap_json_path("it's"), "'$.\"it''s\"'");
    }

    #[test]
    fn test_remove_leading_boolean() {
        assert_eq!(remove_leading_boolean("and a = ? or b = ?"), "a = ? or b = ?");
        assert_eq!(remove_leading_boolean("OR a = ?"), "a = ?");
    }

    #[test]
    fn test_concatenate_skips_empty() {
        assert_eq!(concatenate(["select *", "", "from `t`", ""]), "select * from `t`");
    }

    #[test]
    fn test_json_null_check() {
        let grammar = MySqlGrammar::new();
        assert_eq!(
            grammar.where_null(&Ident::from("meta->tag"), false),
            "(json_extract(`meta`, '$.\"tag\"') is null OR json_type(json_extract(`meta`, '$.\"tag\"')) = 'NULL')"
        );
        assert_eq!(
            grammar.where_null(&Ident::from("meta->tag"), true),
            "(json_extract(`meta`, '$.\"tag\"') is not null AND json_type(json_extract(`meta`, '$.\"tag\"')) != 'NULL')"
        );
    }
}
