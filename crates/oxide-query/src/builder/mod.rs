//! Fluent query builder.
//!
//! A [`Builder`] accumulates clause state in place: every fluent call mutates
//! the builder and returns it for chaining. Parameters are appended to the
//! matching [`Bucket`] at the moment their clause is added, so the bindings
//! returned by [`Builder::bindings`] always line up with the `?` placeholders
//! of [`Builder::to_sql`].
//!
//! # Example
//!
//! ```rust
//! use oxide_query::Builder;
//!
//! let mut query = Builder::table("users");
//! query
//!     .select(["id", "name"])
//!     .where_eq("active", true)
//!     .where_in("role", ["admin", "editor"])
//!     .order_by_desc("created_at")
//!     .limit(10);
//!
//! let (sql, params) = query.build();
//! assert_eq!(
//!     sql,
//!     "select `id`, `name` from `users` where `active` = ? and `role` in (?, ?) \
//!      order by `created_at` desc limit 10"
//! );
//! assert_eq!(params.len(), 3);
//! ```

mod bindings;
mod clause;
mod join;
mod subquery;
mod where_clause;
mod write;

use std::sync::Arc;

use tracing::{debug, trace, warn};

pub use bindings::{Bindings, Bucket};
pub use clause::{
    Aggregate, Boolean, Component, DatePart, Direction, Distinct, FullTextMode, FullTextOptions,
    HavingClause, HavingKind, JoinType, Lock, Order, Scope, Union, WhereClause, WhereKind,
};
pub use join::JoinClause;
pub use subquery::SubQuery;
pub use write::{
    BatchStrategy, BatchUpdate, CaseArm, Operation, Row, Rows, UpsertColumn, BATCH_UPDATE_ALIAS,
};

use crate::error::{QueryError, Result};
use crate::expression::Expression;
use crate::grammar::{Grammar, MySqlGrammar};
use crate::value::{bound_values, idents, Ident, SqlValue, Value};

/// Comparison operators accepted by every grammar.
pub const OPERATORS: &[&str] = &[
    "=",
    "<",
    ">",
    "<=",
    ">=",
    "<>",
    "!=",
    "<=>",
    "like",
    "like binary",
    "not like",
    "ilike",
    "&",
    "|",
    "^",
    "<<",
    ">>",
    "&~",
    "rlike",
    "not rlike",
    "regexp",
    "not regexp",
    "~",
    "~*",
    "!~",
    "!~*",
    "similar to",
    "not similar to",
    "not ilike",
    "~~*",
    "!~~*",
];

/// Operators tagged as bitwise comparisons.
pub const BITWISE_OPERATORS: &[&str] = &["&", "|", "^", "<<", ">>", "&~"];

/// Default alias of aggregate results.
pub const AGGREGATE_ALIAS: &str = "aggregate";

/// A mutable accumulator of query clauses bound to one grammar.
#[derive(Debug, Clone)]
pub struct Builder {
    pub(crate) grammar: Arc<dyn Grammar>,
    pub(crate) scope: Scope,
    pub(crate) operation: Operation,
    pub(crate) bindings: Bindings,
    pub(crate) aggregate: Option<Aggregate>,
    pub(crate) columns: Option<Vec<Ident>>,
    pub(crate) distinct: Distinct,
    pub(crate) from: Option<Ident>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<WhereClause>,
    pub(crate) groups: Vec<Ident>,
    pub(crate) havings: Vec<HavingClause>,
    pub(crate) orders: Vec<Order>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) unions: Vec<Union>,
    pub(crate) union_orders: Vec<Order>,
    pub(crate) union_limit: Option<u64>,
    pub(crate) union_offset: Option<u64>,
    pub(crate) lock: Option<Lock>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates an empty builder using [`MySqlGrammar`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_grammar(Arc::new(MySqlGrammar::new()))
    }

    /// Creates an empty builder bound to `grammar`.
    #[must_use]
    pub fn with_grammar(grammar: Arc<dyn Grammar>) -> Self {
        Self {
            grammar,
            scope: Scope::Query,
            operation: Operation::Select,
            bindings: Bindings::default(),
            aggregate: None,
            columns: None,
            distinct: Distinct::None,
            from: None,
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            unions: Vec::new(),
            union_orders: Vec::new(),
            union_limit: None,
            union_offset: None,
            lock: None,
        }
    }

    /// Creates a builder selecting from `table`.
    #[must_use]
    pub fn table(table: impl Into<Ident>) -> Self {
        let mut query = Self::new();
        query.from(table);
        query
    }

    /// The grammar this builder compiles with.
    #[must_use]
    pub fn grammar(&self) -> &dyn Grammar {
        self.grammar.as_ref()
    }

    /// A fresh builder sharing this builder's grammar, for sub-queries.
    #[must_use]
    pub fn for_sub_query(&self) -> Self {
        Self::with_grammar(self.grammar.clone())
    }

    /// A fresh builder for a nested condition group: same grammar, same base
    /// table, same scope.
    #[must_use]
    pub fn for_nested_where(&self) -> Self {
        let mut query = Self::with_grammar(self.grammar.clone());
        query.scope = self.scope;
        query.from.clone_from(&self.from);
        query
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The statement this builder compiles to.
    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.operation
    }

    /// The base table.
    #[must_use]
    pub const fn from_ref(&self) -> Option<&Ident> {
        self.from.as_ref()
    }

    /// The binding buckets as accumulated.
    #[must_use]
    pub const fn bindings_ref(&self) -> &Bindings {
        &self.bindings
    }

    /// The where nodes.
    #[must_use]
    pub fn wheres(&self) -> &[WhereClause] {
        &self.wheres
    }

    /// The join clauses.
    #[must_use]
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    /// The projected columns, `None` when unset.
    #[must_use]
    pub fn columns(&self) -> Option<&[Ident]> {
        self.columns.as_deref()
    }

    /// Whether conditions render as `where` or `on`.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// The alias under which the base table is addressed: the part after
    /// ` as ` when aliased, the table name otherwise.
    #[must_use]
    pub fn from_alias(&self) -> Option<&str> {
        let name = self.from.as_ref()?.as_name()?;
        let lower = name.to_ascii_lowercase();
        Some(match lower.rfind(" as ") {
            Some(pos) => name[pos + 4..].trim(),
            None => name,
        })
    }

    pub(crate) fn add_binding(&mut self, value: &Value, bucket: Bucket) {
        if let Some(bound) = value.as_bound() {
            self.bindings.push(bucket, bound.clone());
        }
    }

    pub(crate) fn add_bindings<'v, I>(&mut self, values: I, bucket: Bucket)
    where
        I: IntoIterator<Item = &'v Value>,
        I::IntoIter: 'v,
    {
        self.bindings.extend(bucket, bound_values(values));
    }

    // ------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------

    /// Sets the projected columns, discarding any earlier projection and its
    /// bindings.
    pub fn select<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        self.columns = Some(idents(columns));
        self.bindings.clear(Bucket::Select);
        self
    }

    /// Projects `*`.
    pub fn select_all(&mut self) -> &mut Self {
        self.select(["*"])
    }

    /// Appends columns to the projection.
    pub fn add_select<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        self.columns
            .get_or_insert_with(Vec::new)
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Appends a raw projection expression with its bindings.
    pub fn select_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_select([Expression::new(sql)]);
        let values: Vec<Value> = bindings.into_iter().map(Into::into).collect();
        self.add_bindings(&values, Bucket::Select);
        self
    }

    /// Appends `(sub-query) as alias` to the projection.
    pub fn select_sub<'a>(&mut self, query: impl Into<SubQuery<'a>>, alias: &str) -> &mut Self {
        let (sql, bindings) = query.into().compile(self);
        let column = Expression::new(format!("({sql}) as {}", self.grammar.wrap(alias)));
        self.add_select([column]);
        self.bindings.extend(Bucket::Select, bindings);
        self
    }

    /// Sets `select distinct`.
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = Distinct::All;
        self
    }

    /// Sets DISTINCT over specific columns.
    pub fn distinct_on<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        self.distinct = Distinct::Columns(idents(columns));
        self
    }

    // ------------------------------------------------------------------
    // Source
    // ------------------------------------------------------------------

    /// Sets the base table.
    pub fn from(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.from = Some(table.into());
        self
    }

    /// Sets an aliased base table.
    pub fn from_as(&mut self, table: &str, alias: &str) -> &mut Self {
        self.from(format!("{table} as {alias}"))
    }

    /// Sets a raw FROM fragment with its bindings.
    pub fn from_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.from = Some(Ident::Raw(Expression::new(sql)));
        let values: Vec<Value> = bindings.into_iter().map(Into::into).collect();
        self.add_bindings(&values, Bucket::From);
        self
    }

    /// Selects from a derived table `(sub-query) as alias`.
    pub fn from_sub<'a>(&mut self, query: impl Into<SubQuery<'a>>, alias: &str) -> &mut Self {
        let (sql, bindings) = query.into().compile(self);
        let table = Expression::new(format!("({sql}) as {}", self.grammar.wrap_table(alias)));
        self.from = Some(Ident::Raw(table));
        self.bindings.extend(Bucket::From, bindings);
        self
    }

    // ------------------------------------------------------------------
    // Joins
    // ------------------------------------------------------------------

    fn push_join(&mut self, join: JoinClause) -> &mut Self {
        self.bindings.extend(Bucket::Join, join.query.bindings.flatten());
        self.joins.push(join);
        self
    }

    fn join_on(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
        kind: JoinType,
    ) -> &mut Self {
        let mut join = JoinClause::new(self, kind, table);
        join.on(first, operator, second);
        self.push_join(join)
    }

    /// Adds `inner join table on first op second`.
    pub fn join(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.join_on(table, first, operator, second, JoinType::Inner)
    }

    /// Adds a `left join`.
    pub fn left_join(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.join_on(table, first, operator, second, JoinType::Left)
    }

    /// Adds a `right join`.
    pub fn right_join(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.join_on(table, first, operator, second, JoinType::Right)
    }

    /// Adds a `cross join` without conditions.
    pub fn cross_join(&mut self, table: impl Into<Ident>) -> &mut Self {
        let join = JoinClause::new(self, JoinType::Cross, table);
        self.push_join(join)
    }

    /// Adds a join whose condition compares a column with a bound value.
    pub fn join_where(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
        kind: JoinType,
    ) -> Result<&mut Self> {
        let mut join = JoinClause::new(self, kind, table);
        join.where_op(first, operator, value)?;
        Ok(self.push_join(join))
    }

    /// Adds a join whose conditions are built by `f`.
    pub fn join_with<F>(&mut self, table: impl Into<Ident>, kind: JoinType, f: F) -> &mut Self
    where
        F: FnOnce(&mut JoinClause),
    {
        let mut join = JoinClause::new(self, kind, table);
        f(&mut join);
        self.push_join(join)
    }

    /// Joins a derived table `(sub-query) as alias`.
    pub fn join_sub<'a>(
        &mut self,
        query: impl Into<SubQuery<'a>>,
        alias: &str,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
        kind: JoinType,
    ) -> &mut Self {
        let (sql, bindings) = query.into().compile(self);
        let table = Expression::new(format!("({sql}) as {}", self.grammar.wrap_table(alias)));
        self.bindings.extend(Bucket::Join, bindings);
        self.join_on(table, first, operator, second, kind)
    }

    /// Adds a column-to-column join condition. Same as
    /// [`Builder::where_column`].
    pub fn on(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.where_column(first, operator, second)
    }

    /// `or` variant of [`Builder::on`].
    pub fn or_on(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.or_where_column(first, operator, second)
    }

    // ------------------------------------------------------------------
    // Grouping
    // ------------------------------------------------------------------

    /// Appends GROUP BY columns.
    pub fn group_by<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        self.groups.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Appends a raw GROUP BY expression with its bindings.
    pub fn group_by_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.groups.push(Ident::Raw(Expression::new(sql)));
        let values: Vec<Value> = bindings.into_iter().map(Into::into).collect();
        self.add_bindings(&values, Bucket::GroupBy);
        self
    }

    fn add_having(
        &mut self,
        column: Ident,
        operator: &str,
        value: Value,
        boolean: Boolean,
    ) -> &mut Self {
        let (value, operator) = if self.invalid_operator(operator) {
            (Value::from(operator), String::from("="))
        } else {
            (value, String::from(operator))
        };
        self.add_binding(&value, Bucket::Having);
        let kind = if self.is_bitwise_operator(&operator) {
            HavingKind::Bitwise {
                column,
                operator,
                value,
            }
        } else {
            HavingKind::Basic {
                column,
                operator,
                value,
            }
        };
        self.havings.push(HavingClause { boolean, kind });
        self
    }

    /// Adds `having column op ?`.
    pub fn having_op(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let value = value.into();
        self.check_operator_and_value(operator, &value)?;
        Ok(self.add_having(column.into(), operator, value, Boolean::And))
    }

    /// Adds `having column = ?`.
    pub fn having_eq(&mut self, column: impl Into<Ident>, value: impl Into<Value>) -> &mut Self {
        self.add_having(column.into(), "=", value.into(), Boolean::And)
    }

    /// `or` variant of [`Builder::having_op`].
    pub fn or_having_op(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let value = value.into();
        self.check_operator_and_value(operator, &value)?;
        Ok(self.add_having(column.into(), operator, value, Boolean::Or))
    }

    /// Adds a raw HAVING fragment with its bindings.
    pub fn having_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_having_raw(sql, bindings, Boolean::And)
    }

    /// `or` variant of [`Builder::having_raw`].
    pub fn or_having_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_having_raw(sql, bindings, Boolean::Or)
    }

    fn add_having_raw<I, V>(&mut self, sql: &str, bindings: I, boolean: Boolean) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = bindings.into_iter().map(Into::into).collect();
        self.add_bindings(&values, Bucket::Having);
        self.havings.push(HavingClause {
            boolean,
            kind: HavingKind::Raw {
                sql: String::from(sql),
            },
        });
        self
    }

    /// Adds `having column between ? and ?`.
    pub fn having_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        let values = [low.into(), high.into()];
        self.add_bindings(&values, Bucket::Having);
        self.havings.push(HavingClause {
            boolean: Boolean::And,
            kind: HavingKind::Between {
                column: column.into(),
                values,
                not: false,
            },
        });
        self
    }

    // ------------------------------------------------------------------
    // Ordering and paging
    // ------------------------------------------------------------------

    fn push_order(&mut self, order: Order) -> &mut Self {
        if self.unions.is_empty() {
            self.orders.push(order);
        } else {
            self.union_orders.push(order);
        }
        self
    }

    /// Adds `order by column direction`; `direction` must be `asc` or `desc`
    /// (any case).
    pub fn order_by(&mut self, column: impl Into<Ident>, direction: &str) -> Result<&mut Self> {
        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => Direction::Asc,
            "desc" => Direction::Desc,
            _ => return Err(QueryError::InvalidOrderDirection(String::from(direction))),
        };
        Ok(self.push_order(Order::Column {
            column: column.into(),
            direction,
        }))
    }

    /// Adds an ascending order.
    pub fn order_by_asc(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.push_order(Order::Column {
            column: column.into(),
            direction: Direction::Asc,
        })
    }

    /// Adds a descending order.
    pub fn order_by_desc(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.push_order(Order::Column {
            column: column.into(),
            direction: Direction::Desc,
        })
    }

    /// Newest first by `column`.
    pub fn latest(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.order_by_desc(column)
    }

    /// Oldest first by `column`.
    pub fn oldest(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.order_by_asc(column)
    }

    /// Adds a raw ORDER BY fragment with its bindings.
    pub fn order_by_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let bucket = if self.unions.is_empty() {
            Bucket::Order
        } else {
            Bucket::UnionOrder
        };
        let values: Vec<Value> = bindings.into_iter().map(Into::into).collect();
        self.add_bindings(&values, bucket);
        self.push_order(Order::Raw {
            sql: String::from(sql),
        })
    }

    /// Orders randomly using the grammar's random function.
    pub fn in_random_order(&mut self, seed: &str) -> &mut Self {
        let sql = self.grammar.compile_random(seed);
        self.order_by_raw(&sql, Vec::<Value>::new())
    }

    /// Drops every ORDER BY entry and its bindings.
    pub fn reorder(&mut self) -> &mut Self {
        self.orders.clear();
        self.union_orders.clear();
        self.bindings.clear(Bucket::Order);
        self.bindings.clear(Bucket::UnionOrder);
        self
    }

    /// Sets the row limit. Negative values leave the current limit unchanged.
    pub fn limit(&mut self, value: i64) -> &mut Self {
        if let Ok(value) = u64::try_from(value) {
            if self.unions.is_empty() {
                self.limit = Some(value);
            } else {
                self.union_limit = Some(value);
            }
        }
        self
    }

    /// Sets the row offset, clamping negative values to zero.
    pub fn offset(&mut self, value: i64) -> &mut Self {
        let value = u64::try_from(value).unwrap_or(0);
        if self.unions.is_empty() {
            self.offset = Some(value);
        } else {
            self.union_offset = Some(value);
        }
        self
    }

    /// Alias for [`Builder::limit`].
    pub fn take(&mut self, value: i64) -> &mut Self {
        self.limit(value)
    }

    /// Alias for [`Builder::offset`].
    pub fn skip(&mut self, value: i64) -> &mut Self {
        self.offset(value)
    }

    /// Limits to one page of `per_page` rows (pages start at 1).
    pub fn for_page(&mut self, page: i64, per_page: i64) -> &mut Self {
        self.offset((page - 1).saturating_mul(per_page)).limit(per_page)
    }

    // ------------------------------------------------------------------
    // Locking
    // ------------------------------------------------------------------

    /// Locks the selected rows for update.
    pub fn lock_for_update(&mut self) -> &mut Self {
        self.lock = Some(Lock::Update);
        self
    }

    /// Takes a shared lock on the selected rows.
    pub fn shared_lock(&mut self) -> &mut Self {
        self.lock = Some(Lock::Shared);
        self
    }

    /// Appends a raw lock clause.
    pub fn lock_raw(&mut self, sql: &str) -> &mut Self {
        self.lock = Some(Lock::Raw(String::from(sql)));
        self
    }

    // ------------------------------------------------------------------
    // Unions
    // ------------------------------------------------------------------

    fn push_union(&mut self, query: Self, all: bool) -> &mut Self {
        let bindings = query.bindings();
        trace!(all, bindings = bindings.len(), "adding union branch");
        self.unions.push(Union {
            query: Box::new(query),
            all,
        });
        self.bindings.extend(Bucket::Union, bindings);
        self
    }

    /// Appends a `union` branch.
    pub fn union(&mut self, query: Self) -> &mut Self {
        self.push_union(query, false)
    }

    /// Appends a `union all` branch.
    pub fn union_all(&mut self, query: Self) -> &mut Self {
        self.push_union(query, true)
    }

    // ------------------------------------------------------------------
    // Aggregates and cloning
    // ------------------------------------------------------------------

    /// Returns a copy of this builder with the listed components reset.
    #[must_use]
    pub fn clone_without(&self, components: &[Component]) -> Self {
        let mut clone = self.clone();
        for component in components {
            match component {
                Component::Aggregate => clone.aggregate = None,
                Component::Columns => clone.columns = None,
                Component::Distinct => clone.distinct = Distinct::None,
                Component::From => clone.from = None,
                Component::Joins => clone.joins.clear(),
                Component::Wheres => clone.wheres.clear(),
                Component::Groups => clone.groups.clear(),
                Component::Havings => clone.havings.clear(),
                Component::Orders => clone.orders.clear(),
                Component::Limit => clone.limit = None,
                Component::Offset => clone.offset = None,
                Component::Lock => clone.lock = None,
                Component::Unions => clone.unions.clear(),
                Component::UnionOrders => clone.union_orders.clear(),
                Component::UnionLimit => clone.union_limit = None,
                Component::UnionOffset => clone.union_offset = None,
            }
        }
        clone
    }

    /// Returns a copy of this builder with the listed buckets emptied.
    #[must_use]
    pub fn clone_without_bindings(&self, buckets: &[Bucket]) -> Self {
        let mut clone = self.clone();
        for bucket in buckets {
            clone.bindings.clear(*bucket);
        }
        clone
    }

    /// Returns a copy of this builder computing `function(columns) as alias`.
    ///
    /// Without unions or havings the existing projection and its bindings are
    /// dropped. Without GROUP BY the ordering and its bindings are dropped.
    #[must_use]
    pub fn aggregate<I, C>(&self, function: &str, columns: I, alias: &str) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        let mut clone = if self.unions.is_empty() && self.havings.is_empty() {
            self.clone_without(&[Component::Columns])
                .clone_without_bindings(&[Bucket::Select])
        } else {
            self.clone()
        };
        clone.aggregate = Some(Aggregate {
            function: String::from(function),
            columns: idents(columns),
            alias: String::from(alias),
        });
        if clone.groups.is_empty() {
            clone.orders.clear();
            clone.bindings.clear(Bucket::Order);
        }
        clone
    }

    /// `count(*)`.
    #[must_use]
    pub fn count(&self) -> Self {
        self.aggregate("count", ["*"], AGGREGATE_ALIAS)
    }

    /// `count(columns)`.
    #[must_use]
    pub fn count_columns<I, C>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        self.aggregate("count", columns, AGGREGATE_ALIAS)
    }

    /// `min(column)`.
    #[must_use]
    pub fn min(&self, column: impl Into<Ident>) -> Self {
        self.aggregate("min", [column.into()], AGGREGATE_ALIAS)
    }

    /// `max(column)`.
    #[must_use]
    pub fn max(&self, column: impl Into<Ident>) -> Self {
        self.aggregate("max", [column.into()], AGGREGATE_ALIAS)
    }

    /// `sum(column)`.
    #[must_use]
    pub fn sum(&self, column: impl Into<Ident>) -> Self {
        self.aggregate("sum", [column.into()], AGGREGATE_ALIAS)
    }

    /// `avg(column)`.
    #[must_use]
    pub fn avg(&self, column: impl Into<Ident>) -> Self {
        self.aggregate("avg", [column.into()], AGGREGATE_ALIAS)
    }

    // ------------------------------------------------------------------
    // Compilation
    // ------------------------------------------------------------------

    /// Compiles the SQL text with `?` placeholders.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let grammar = self.grammar.as_ref();
        let sql = match &self.operation {
            Operation::Select => grammar.compile_select(self),
            Operation::Update(row) => grammar.compile_update(self, row),
            Operation::BatchUpdate(batch) => grammar.compile_batch_update(self, batch),
            Operation::Insert(rows) => grammar.compile_insert(self, rows),
            Operation::InsertOrIgnore(rows) => grammar.compile_insert_or_ignore(self, rows),
            Operation::Upsert {
                rows,
                unique_by,
                update,
            } => grammar.compile_upsert(self, rows, unique_by, update),
            Operation::Delete => grammar.compile_delete(self),
        };
        debug!(
            grammar = grammar.name(),
            operation = self.operation.name(),
            sql = %sql,
            "compiled query"
        );
        sql
    }

    /// Compiles `select exists(<select>) as exists`. Uses the select bindings.
    #[must_use]
    pub fn to_exists_sql(&self) -> String {
        self.grammar.compile_exists(self)
    }

    /// Assembles the bindings, in placeholder order, for the current
    /// operation.
    #[must_use]
    pub fn bindings(&self) -> Vec<SqlValue> {
        match &self.operation {
            Operation::Select => self.bindings.flatten(),
            Operation::Update(row) => {
                let mut values = self.bindings.get(Bucket::Join).to_vec();
                values.extend(update_row_bindings(row));
                values.extend(self.bindings.flatten_except(&self.skipped_write_buckets(true)));
                values
            }
            Operation::BatchUpdate(batch) => {
                let mut values = self.bindings.get(Bucket::Join).to_vec();
                if batch.strategy == BatchStrategy::CaseWhen {
                    values.extend(batch.case_bindings());
                }
                values.extend(self.bindings.flatten_except(&self.skipped_write_buckets(true)));
                values
            }
            Operation::Insert(rows) | Operation::InsertOrIgnore(rows) => insert_bindings(rows),
            Operation::Upsert { rows, update, .. } => {
                let mut values = insert_bindings(rows);
                values.extend(update.iter().filter_map(|column| match column {
                    UpsertColumn::Value(_, value) => value.as_bound().cloned(),
                    UpsertColumn::Inserted(_) => None,
                }));
                values
            }
            Operation::Delete => self.bindings.flatten_except(&self.skipped_write_buckets(false)),
        }
    }

    /// Buckets an update or delete statement does not render. Joined writes
    /// drop ORDER BY, so their order bindings go too. `join_first` marks
    /// statements whose join bindings were already emitted ahead of the rest.
    fn skipped_write_buckets(&self, join_first: bool) -> Vec<Bucket> {
        let mut skipped = vec![
            Bucket::Select,
            Bucket::GroupBy,
            Bucket::Having,
            Bucket::Union,
            Bucket::UnionOrder,
        ];
        if join_first {
            skipped.push(Bucket::Join);
        }
        if !self.joins.is_empty() {
            skipped.push(Bucket::Order);
        }
        skipped
    }

    /// Compiles the SQL text and its bindings.
    #[must_use]
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let sql = self.to_sql();
        let bindings = self.bindings();
        debug!(bindings = bindings.len(), "assembled bindings");
        (sql, bindings)
    }

    /// Compiles the SQL with every binding inlined.
    ///
    /// **Warning**: For logging and debugging only. Never execute the result.
    #[must_use]
    pub fn to_full_sql(&self) -> String {
        let (sql, bindings) = self.build();
        let mut out = String::with_capacity(sql.len());
        let mut rest = sql.as_str();
        for value in &bindings {
            let Some(pos) = rest.find('?') else {
                warn!(
                    bindings = bindings.len(),
                    "more bindings than placeholders in compiled query"
                );
                break;
            };
            out.push_str(&rest[..pos]);
            out.push_str(&value.to_sql_inline());
            rest = &rest[pos + 1..];
        }
        out.push_str(rest);
        out
    }

    // ------------------------------------------------------------------
    // Operator handling
    // ------------------------------------------------------------------

    /// Returns `true` when `operator` is in neither the base list nor the
    /// grammar's extensions (case-insensitive).
    pub(crate) fn invalid_operator(&self, operator: &str) -> bool {
        let lower = operator.to_lowercase();
        !OPERATORS.contains(&lower.as_str())
            && !self.grammar.operators().contains(&lower.as_str())
    }

    pub(crate) fn is_bitwise_operator(&self, operator: &str) -> bool {
        let lower = operator.to_lowercase();
        BITWISE_OPERATORS.contains(&lower.as_str())
            || self.grammar.bitwise_operators().contains(&lower.as_str())
    }

    /// Rejects NULL paired with a known operator other than `=`, `<>`, `!=`.
    pub(crate) fn check_operator_and_value(&self, operator: &str, value: &Value) -> Result<()> {
        if value.is_null()
            && OPERATORS.contains(&operator)
            && !["=", "<>", "!="].contains(&operator)
        {
            return Err(QueryError::IllegalOperatorAndValue {
                operator: String::from(operator),
            });
        }
        Ok(())
    }

    pub(crate) fn require_table(&self, operation: &'static str) -> Result<()> {
        if self.from.is_none() {
            return Err(QueryError::MissingTable(operation));
        }
        Ok(())
    }
}

/// Bound values of an UPDATE's SET list, in column order. Booleans written
/// into JSON paths are inlined by the grammar and therefore skipped.
fn update_row_bindings(row: &Row) -> impl Iterator<Item = SqlValue> + '_ {
    row.iter().filter_map(|(column, value)| {
        if column.contains("->") && value.as_bool().is_some() {
            None
        } else {
            value.as_bound().cloned()
        }
    })
}

fn insert_bindings(rows: &[Row]) -> Vec<SqlValue> {
    rows.iter()
        .flat_map(Row::values)
        .filter_map(|value| value.as_bound().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_resets_projection_and_bindings() {
        let mut query = Builder::table("users");
        query.select_raw("price * ? as total", [2]).where_eq("id", 1);
        query.select(["name"]);

        assert_eq!(query.to_sql(), "select `name` from `users` where `id` = ?");
        assert_eq!(query.bindings(), vec![SqlValue::Int(1)]);
    }

    #[test]
    fn test_limit_ignores_negative_values() {
        let mut query = Builder::table("users");
        query.limit(5).limit(-1);
        assert_eq!(query.to_sql(), "select * from `users` limit 5");
    }

    #[test]
    fn test_offset_clamps_to_zero() {
        let mut query = Builder::table("users");
        query.offset(-10);
        assert_eq!(query.to_sql(), "select * from `users` offset 0");
    }

    #[test]
    fn test_for_page() {
        let mut query = Builder::table("users");
        query.for_page(3, 15);
        assert_eq!(query.to_sql(), "select * from `users` limit 15 offset 30");
    }

    #[test]
    fn test_order_by_rejects_unknown_direction() {
        let mut query = Builder::table("users");
        let err = query.order_by("name", "sideways").unwrap_err();
        assert_eq!(err, QueryError::InvalidOrderDirection(String::from("sideways")));
        query.order_by("name", "DESC").unwrap();
        assert_eq!(query.to_sql(), "select * from `users` order by `name` desc");
    }

    #[test]
    fn test_clone_does_not_share_bindings() {
        let mut query = Builder::table("users");
        query.where_eq("id", 1);
        let mut copy = query.clone();
        copy.where_eq("name", "x");

        assert_eq!(query.bindings().len(), 1);
        assert_eq!(copy.bindings().len(), 2);
    }

    #[test]
    fn test_clone_without_bindings() {
        let mut query = Builder::table("users");
        query.select_raw("? as one", [1]).where_eq("id", 2);
        let copy = query.clone_without_bindings(&[Bucket::Select]);
        assert_eq!(copy.bindings(), vec![SqlValue::Int(2)]);
        assert_eq!(query.bindings().len(), 2);
    }

    #[test]
    fn test_from_alias() {
        let mut query = Builder::new();
        query.from_as("users", "u");
        assert_eq!(query.from_alias(), Some("u"));
        query.from("users");
        assert_eq!(query.from_alias(), Some("users"));
    }

    #[test]
    fn test_write_requires_table() {
        let mut query = Builder::new();
        assert_eq!(
            query.delete().unwrap_err(),
            QueryError::MissingTable("delete")
        );
    }
}
