//! SQL values and parameter handling.
//!
//! Every value handed to the builder is either bound as a `?` parameter
//! ([`Value::Bound`]) or inlined verbatim ([`Value::Raw`]). Only bound values
//! ever reach the bindings list.

use serde::Serialize;

use crate::expression::Expression;

/// A SQL value that can be used as a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// JSON document, bound as its serialized text.
    Json(serde_json::Value),
}

impl SqlValue {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: Only meant for logging. Execute with bindings instead.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => quote_text(s),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Json(v) => quote_text(&v.to_string()),
        }
    }

    /// Returns `true` for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

fn quote_text(s: &str) -> String {
    // Escape single quotes by doubling them
    let escaped = s.replace('\'', "''");
    format!("'{escaped}'")
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i8 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u8 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl ToSqlValue for serde_json::Value {
    fn to_sql_value(self) -> SqlValue {
        match self {
            serde_json::Value::Null => SqlValue::Null,
            other => SqlValue::Json(other),
        }
    }
}

/// An operand accepted by the builder: either a bound parameter or a literal
/// SQL fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Rendered as `?` and appended to the bindings.
    Bound(SqlValue),
    /// Rendered verbatim and never bound.
    Raw(Expression),
}

impl Value {
    /// Returns the bound value, or `None` for literal fragments.
    #[must_use]
    pub const fn as_bound(&self) -> Option<&SqlValue> {
        match self {
            Self::Bound(v) => Some(v),
            Self::Raw(_) => None,
        }
    }

    /// Returns `true` when this is a bound NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Bound(SqlValue::Null))
    }

    /// Returns the boolean payload of a bound boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bound(SqlValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

impl<T: ToSqlValue> From<T> for Value {
    fn from(value: T) -> Self {
        Self::Bound(value.to_sql_value())
    }
}

impl From<Expression> for Value {
    fn from(expr: Expression) -> Self {
        Self::Raw(expr)
    }
}

/// Collects the bound values of `values`, skipping literal fragments.
pub(crate) fn bound_values<'a, I>(values: I) -> impl Iterator<Item = SqlValue> + 'a
where
    I: IntoIterator<Item = &'a Value>,
    I::IntoIter: 'a,
{
    values.into_iter().filter_map(|v| v.as_bound().cloned())
}

/// A column or table reference: a (possibly dotted, aliased or JSON-path)
/// name that the grammar quotes, or a literal fragment it emits as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ident {
    /// Quoted by the grammar.
    Name(String),
    /// Emitted verbatim.
    Raw(Expression),
}

impl Ident {
    /// Returns the name, or `None` for literal fragments.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Raw(_) => None,
        }
    }

    /// Returns `true` when the name addresses a path inside a JSON column
    /// (`data->key`).
    #[must_use]
    pub fn is_json_selector(&self) -> bool {
        self.as_name().is_some_and(|name| name.contains("->"))
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Self::Name(String::from(name))
    }
}

impl From<String> for Ident {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for Ident {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<Expression> for Ident {
    fn from(expr: Expression) -> Self {
        Self::Raw(expr)
    }
}

/// Converts a list of column-like items into identifiers.
pub(crate) fn idents<I, C>(columns: I) -> Vec<Ident>
where
    I: IntoIterator<Item = C>,
    C: Into<Ident>,
{
    columns.into_iter().map(Into::into).collect()
}
