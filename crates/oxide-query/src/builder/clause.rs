//! Clause state accumulated by the builder.

use crate::expression::Expression;
use crate::value::{Ident, Value};

use super::Builder;

/// Connector joining a node to the node before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
    /// `and`
    And,
    /// `or`
    Or,
}

impl Boolean {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Date part extracted by the date-based filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    /// `date(column)`
    Date,
    /// `time(column)`
    Time,
    /// `day(column)`
    Day,
    /// `month(column)`
    Month,
    /// `year(column)`
    Year,
}

impl DatePart {
    /// Returns the SQL function name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Search mode of a full-text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullTextMode {
    /// `in natural language mode`
    #[default]
    NaturalLanguage,
    /// `in boolean mode`
    Boolean,
}

/// Options of a full-text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullTextOptions {
    /// Search mode.
    pub mode: FullTextMode,
    /// Adds `with query expansion` (ignored in boolean mode).
    pub expanded: bool,
}

/// One node of a where (or ON) tree.
#[derive(Debug, Clone)]
pub struct WhereClause {
    /// Connector to the previous node.
    pub boolean: Boolean,
    /// What the node tests.
    pub kind: WhereKind,
}

/// The variants a where node can take.
#[derive(Debug, Clone)]
pub enum WhereKind {
    /// `column op ?`
    Basic {
        column: Ident,
        operator: String,
        value: Value,
    },
    /// Same shape as `Basic`, for bitwise operators.
    Bitwise {
        column: Ident,
        operator: String,
        value: Value,
    },
    /// `first op second`, both identifiers.
    Column {
        first: Ident,
        operator: String,
        second: Ident,
    },
    /// Verbatim SQL.
    Raw { sql: String },
    /// `column in (...)`
    In { column: Ident, values: Vec<Value> },
    /// `column not in (...)`
    NotIn { column: Ident, values: Vec<Value> },
    /// `column in (1, 2)` with inlined integers.
    InRaw { column: Ident, values: Vec<i64> },
    /// `column not in (1, 2)` with inlined integers.
    NotInRaw { column: Ident, values: Vec<i64> },
    /// `column is null`
    Null { column: Ident },
    /// `column is not null`
    NotNull { column: Ident },
    /// `column [not] between ? and ?`
    Between {
        column: Ident,
        values: [Value; 2],
        not: bool,
    },
    /// `column [not] between other and other`
    BetweenColumns {
        column: Ident,
        values: [Ident; 2],
        not: bool,
    },
    /// `part(column) op ?`
    Date {
        part: DatePart,
        column: Ident,
        operator: String,
        value: Value,
    },
    /// Parenthesized group taken from a nested builder.
    Nested { query: Box<Builder> },
    /// `column op (sub-select)`
    Sub {
        column: Ident,
        operator: String,
        query: Expression,
    },
    /// `exists (sub-select)`
    Exists { query: Expression },
    /// `not exists (sub-select)`
    NotExists { query: Expression },
    /// `json_extract(column, path) op true|false`
    JsonBoolean {
        column: Ident,
        operator: String,
        value: bool,
    },
    /// `[not] json_contains(column, ?, path)`
    JsonContains {
        column: Ident,
        value: Value,
        not: bool,
    },
    /// `json_length(column, path) op ?`
    JsonLength {
        column: Ident,
        operator: String,
        value: Value,
    },
    /// `(a, b) op (?, ?)`
    RowValues {
        columns: Vec<Ident>,
        operator: String,
        values: Vec<Value>,
    },
    /// `match (columns) against (? in ... mode)`
    FullText {
        columns: Vec<Ident>,
        value: Value,
        options: FullTextOptions,
    },
}

/// One node of the HAVING list.
#[derive(Debug, Clone)]
pub struct HavingClause {
    /// Connector to the previous node.
    pub boolean: Boolean,
    /// What the node tests.
    pub kind: HavingKind,
}

/// The variants a having node can take.
#[derive(Debug, Clone)]
pub enum HavingKind {
    /// `column op ?`
    Basic {
        column: Ident,
        operator: String,
        value: Value,
    },
    /// Same shape as `Basic`, for bitwise operators.
    Bitwise {
        column: Ident,
        operator: String,
        value: Value,
    },
    /// Verbatim SQL.
    Raw { sql: String },
    /// `column [not] between ? and ?`
    Between {
        column: Ident,
        values: [Value; 2],
        not: bool,
    },
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `asc`
    Asc,
    /// `desc`
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone)]
pub enum Order {
    /// `column direction`
    Column { column: Ident, direction: Direction },
    /// Verbatim SQL.
    Raw { sql: String },
}

/// Aggregate projection replacing the column list.
#[derive(Debug, Clone)]
pub struct Aggregate {
    /// Function name (`count`, `sum`, ...).
    pub function: String,
    /// Aggregated columns.
    pub columns: Vec<Ident>,
    /// Result alias.
    pub alias: String,
}

/// DISTINCT setting of a select.
#[derive(Debug, Clone, Default)]
pub enum Distinct {
    /// No DISTINCT.
    #[default]
    None,
    /// `select distinct`
    All,
    /// Distinct over specific columns.
    Columns(Vec<Ident>),
}

impl Distinct {
    /// Returns `true` unless DISTINCT is off.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Row lock requested by a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    /// Exclusive lock.
    Update,
    /// Shared lock.
    Shared,
    /// Verbatim lock clause.
    Raw(String),
}

/// One union branch.
#[derive(Debug, Clone)]
pub struct Union {
    /// The branch query.
    pub query: Box<Builder>,
    /// `union all` instead of `union`.
    pub all: bool,
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// `inner join`
    Inner,
    /// `left join`
    Left,
    /// `right join`
    Right,
    /// `cross join`
    Cross,
}

impl JoinType {
    /// Returns the SQL keyword preceding `join`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Right => "right",
            Self::Cross => "cross",
        }
    }
}

/// Clause slots of a builder, used for selective cloning and for the fixed
/// select rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Aggregate,
    Columns,
    Distinct,
    From,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
    Lock,
    Unions,
    UnionOrders,
    UnionLimit,
    UnionOffset,
}

/// Whether a builder renders its conditions as `where` or as a join's `on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// A standalone query.
    #[default]
    Query,
    /// The condition tree of a join clause.
    Join,
}

impl Scope {
    /// Keyword introducing the condition list.
    #[must_use]
    pub const fn conjunction(self) -> &'static str {
        match self {
            Self::Query => "where",
            Self::Join => "on",
        }
    }
}
