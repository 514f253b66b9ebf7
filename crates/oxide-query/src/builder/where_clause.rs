//! The where family.
//!
//! Every method here appends one node to the where tree and, in the same
//! call, appends the node's bound parameters to the where bucket. On a join
//! clause the same methods build the ON condition.

use crate::error::{QueryError, Result};
use crate::expression::Expression;
use crate::value::{idents, Ident, SqlValue, Value};

use super::bindings::Bucket;
use super::clause::{Boolean, DatePart, FullTextOptions, WhereClause, WhereKind};
use super::subquery::SubQuery;
use super::Builder;

impl Builder {
    fn push_where(&mut self, boolean: Boolean, kind: WhereKind) -> &mut Self {
        self.wheres.push(WhereClause { boolean, kind });
        self
    }

    /// Normalizes and appends a `column op value` node. The operator/value
    /// pair must already have passed [`Builder::check_operator_and_value`].
    fn add_where(
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

        if value.is_null() {
            return self.add_null_where(column, boolean, operator != "=");
        }

        if column.is_json_selector() {
            if let Some(value) = value.as_bool() {
                return self.push_where(
                    boolean,
                    WhereKind::JsonBoolean {
                        column,
                        operator,
                        value,
                    },
                );
            }
        }

        self.add_binding(&value, Bucket::Where);
        let kind = if self.is_bitwise_operator(&operator) {
            WhereKind::Bitwise {
                column,
                operator,
                value,
            }
        } else {
            WhereKind::Basic {
                column,
                operator,
                value,
            }
        };
        self.push_where(boolean, kind)
    }

    /// Adds `column = ?`. A NULL value becomes `column is null`.
    pub fn where_eq(&mut self, column: impl Into<Ident>, value: impl Into<Value>) -> &mut Self {
        self.add_where(column.into(), "=", value.into(), Boolean::And)
    }

    /// `or` variant of [`Builder::where_eq`].
    pub fn or_where_eq(&mut self, column: impl Into<Ident>, value: impl Into<Value>) -> &mut Self {
        self.add_where(column.into(), "=", value.into(), Boolean::Or)
    }

    /// Adds `column op ?`.
    ///
    /// Unknown operators are treated as the value of an equality test. A NULL
    /// value turns `=` into `is null` and `<>`/`!=` into `is not null`; any
    /// other known operator paired with NULL is rejected.
    pub fn where_op(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let value = value.into();
        self.check_operator_and_value(operator, &value)?;
        Ok(self.add_where(column.into(), operator, value, Boolean::And))
    }

    /// `or` variant of [`Builder::where_op`].
    pub fn or_where_op(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let value = value.into();
        self.check_operator_and_value(operator, &value)?;
        Ok(self.add_where(column.into(), operator, value, Boolean::Or))
    }

    /// Adds a parenthesized group of `column = ?` tests joined with `and`.
    pub fn where_all<I, C, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<Ident>,
        V: Into<Value>,
    {
        let mut query = self.for_nested_where();
        for (column, value) in pairs {
            query.where_eq(column, value);
        }
        self.add_nested_where_query(query, Boolean::And)
    }

    // ------------------------------------------------------------------
    // Column comparisons and raw SQL
    // ------------------------------------------------------------------

    /// Adds `first op second`, comparing two columns.
    pub fn where_column(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.add_column_where(first.into(), operator, second.into(), Boolean::And)
    }

    /// `or` variant of [`Builder::where_column`].
    pub fn or_where_column(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.add_column_where(first.into(), operator, second.into(), Boolean::Or)
    }

    fn add_column_where(
        &mut self,
        first: Ident,
        operator: &str,
        second: Ident,
        boolean: Boolean,
    ) -> &mut Self {
        // An unknown operator is really the second column.
        let (operator, second) = if self.invalid_operator(operator) {
            (String::from("="), Ident::from(operator))
        } else {
            (String::from(operator), second)
        };
        self.push_where(
            boolean,
            WhereKind::Column {
                first,
                operator,
                second,
            },
        )
    }

    /// Adds a raw where fragment with its bindings.
    pub fn where_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_raw_where(sql, bindings, Boolean::And)
    }

    /// `or` variant of [`Builder::where_raw`].
    pub fn or_where_raw<I, V>(&mut self, sql: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_raw_where(sql, bindings, Boolean::Or)
    }

    fn add_raw_where<I, V>(&mut self, sql: &str, bindings: I, boolean: Boolean) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = bindings.into_iter().map(Into::into).collect();
        self.add_bindings(&values, Bucket::Where);
        self.push_where(
            boolean,
            WhereKind::Raw {
                sql: String::from(sql),
            },
        )
    }

    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------

    fn add_in_where<I, V>(
        &mut self,
        column: Ident,
        values: I,
        boolean: Boolean,
        not: bool,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.add_bindings(&values, Bucket::Where);
        let kind = if not {
            WhereKind::NotIn { column, values }
        } else {
            WhereKind::In { column, values }
        };
        self.push_where(boolean, kind)
    }

    /// Adds `column in (?, ...)`. An empty list never matches.
    pub fn where_in<I, V>(&mut self, column: impl Into<Ident>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_in_where(column.into(), values, Boolean::And, false)
    }

    /// `or` variant of [`Builder::where_in`].
    pub fn or_where_in<I, V>(&mut self, column: impl Into<Ident>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_in_where(column.into(), values, Boolean::Or, false)
    }

    /// Adds `column not in (?, ...)`. An empty list always matches.
    pub fn where_not_in<I, V>(&mut self, column: impl Into<Ident>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_in_where(column.into(), values, Boolean::And, true)
    }

    /// `or` variant of [`Builder::where_not_in`].
    pub fn or_where_not_in<I, V>(&mut self, column: impl Into<Ident>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_in_where(column.into(), values, Boolean::Or, true)
    }

    fn add_in_sub_where(
        &mut self,
        column: Ident,
        query: SubQuery<'_>,
        boolean: Boolean,
        not: bool,
    ) -> &mut Self {
        let (sql, bindings) = query.compile(self);
        self.bindings.extend(Bucket::Where, bindings);
        let values = vec![Value::Raw(Expression::new(sql))];
        let kind = if not {
            WhereKind::NotIn { column, values }
        } else {
            WhereKind::In { column, values }
        };
        self.push_where(boolean, kind)
    }

    /// Adds `column in (sub-select)`.
    pub fn where_in_sub<'a>(
        &mut self,
        column: impl Into<Ident>,
        query: impl Into<SubQuery<'a>>,
    ) -> &mut Self {
        self.add_in_sub_where(column.into(), query.into(), Boolean::And, false)
    }

    /// Adds `column not in (sub-select)`.
    pub fn where_not_in_sub<'a>(
        &mut self,
        column: impl Into<Ident>,
        query: impl Into<SubQuery<'a>>,
    ) -> &mut Self {
        self.add_in_sub_where(column.into(), query.into(), Boolean::And, true)
    }

    /// Adds `column in (1, 2, ...)` with the integers inlined.
    pub fn where_integer_in_raw<I>(&mut self, column: impl Into<Ident>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = i64>,
    {
        let kind = WhereKind::InRaw {
            column: column.into(),
            values: values.into_iter().collect(),
        };
        self.push_where(Boolean::And, kind)
    }

    /// Adds `column not in (1, 2, ...)` with the integers inlined.
    pub fn where_integer_not_in_raw<I>(&mut self, column: impl Into<Ident>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = i64>,
    {
        let kind = WhereKind::NotInRaw {
            column: column.into(),
            values: values.into_iter().collect(),
        };
        self.push_where(Boolean::And, kind)
    }

    // ------------------------------------------------------------------
    // Null tests
    // ------------------------------------------------------------------

    fn add_null_where(&mut self, column: Ident, boolean: Boolean, not: bool) -> &mut Self {
        let kind = if not {
            WhereKind::NotNull { column }
        } else {
            WhereKind::Null { column }
        };
        self.push_where(boolean, kind)
    }

    /// Adds `column is null`.
    pub fn where_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_where(column.into(), Boolean::And, false)
    }

    /// `or` variant of [`Builder::where_null`].
    pub fn or_where_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_where(column.into(), Boolean::Or, false)
    }

    /// Adds `column is not null`.
    pub fn where_not_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_where(column.into(), Boolean::And, true)
    }

    /// `or` variant of [`Builder::where_not_null`].
    pub fn or_where_not_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_where(column.into(), Boolean::Or, true)
    }

    // ------------------------------------------------------------------
    // Ranges
    // ------------------------------------------------------------------

    fn add_between_where(
        &mut self,
        column: Ident,
        values: [Value; 2],
        boolean: Boolean,
        not: bool,
    ) -> &mut Self {
        self.add_bindings(&values, Bucket::Where);
        self.push_where(
            boolean,
            WhereKind::Between {
                column,
                values,
                not,
            },
        )
    }

    /// Adds `column between ? and ?`.
    pub fn where_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_between_where(column.into(), [low.into(), high.into()], Boolean::And, false)
    }

    /// `or` variant of [`Builder::where_between`].
    pub fn or_where_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_between_where(column.into(), [low.into(), high.into()], Boolean::Or, false)
    }

    /// Adds `column not between ? and ?`.
    pub fn where_not_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_between_where(column.into(), [low.into(), high.into()], Boolean::And, true)
    }

    /// `or` variant of [`Builder::where_not_between`].
    pub fn or_where_not_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_between_where(column.into(), [low.into(), high.into()], Boolean::Or, true)
    }

    /// Adds `column between low_column and high_column`.
    pub fn where_between_columns(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Ident>,
        high: impl Into<Ident>,
    ) -> &mut Self {
        let kind = WhereKind::BetweenColumns {
            column: column.into(),
            values: [low.into(), high.into()],
            not: false,
        };
        self.push_where(Boolean::And, kind)
    }

    /// Adds `column not between low_column and high_column`.
    pub fn where_not_between_columns(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Ident>,
        high: impl Into<Ident>,
    ) -> &mut Self {
        let kind = WhereKind::BetweenColumns {
            column: column.into(),
            values: [low.into(), high.into()],
            not: true,
        };
        self.push_where(Boolean::And, kind)
    }

    // ------------------------------------------------------------------
    // Date parts
    // ------------------------------------------------------------------

    fn add_date_where(
        &mut self,
        part: DatePart,
        column: Ident,
        operator: &str,
        value: Value,
        boolean: Boolean,
    ) -> Result<&mut Self> {
        self.check_operator_and_value(operator, &value)?;
        let (value, operator) = if self.invalid_operator(operator) {
            (Value::from(operator), String::from("="))
        } else {
            (value, String::from(operator))
        };
        self.add_binding(&value, Bucket::Where);
        Ok(self.push_where(
            boolean,
            WhereKind::Date {
                part,
                column,
                operator,
                value,
            },
        ))
    }

    /// Adds `date(column) op ?`.
    pub fn where_date(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.add_date_where(DatePart::Date, column.into(), operator, value.into(), Boolean::And)
    }

    /// `or` variant of [`Builder::where_date`].
    pub fn or_where_date(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.add_date_where(DatePart::Date, column.into(), operator, value.into(), Boolean::Or)
    }

    /// Adds `time(column) op ?`.
    pub fn where_time(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.add_date_where(DatePart::Time, column.into(), operator, value.into(), Boolean::And)
    }

    /// Adds `day(column) op ?`.
    pub fn where_day(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.add_date_where(DatePart::Day, column.into(), operator, value.into(), Boolean::And)
    }

    /// Adds `month(column) op ?`.
    pub fn where_month(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.add_date_where(DatePart::Month, column.into(), operator, value.into(), Boolean::And)
    }

    /// Adds `year(column) op ?`.
    pub fn where_year(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.add_date_where(DatePart::Year, column.into(), operator, value.into(), Boolean::And)
    }

    // ------------------------------------------------------------------
    // Groups and sub-queries
    // ------------------------------------------------------------------

    /// Appends the where tree of `query` as one parenthesized group. Empty
    /// groups are dropped.
    pub(crate) fn add_nested_where_query(&mut self, query: Self, boolean: Boolean) -> &mut Self {
        if query.wheres.is_empty() {
            return self;
        }
        let bindings = query.bindings.get(Bucket::Where).to_vec();
        self.bindings.extend(Bucket::Where, bindings);
        self.push_where(
            boolean,
            WhereKind::Nested {
                query: Box::new(query),
            },
        )
    }

    /// Adds a parenthesized group built by `f`.
    pub fn where_nested<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let mut query = self.for_nested_where();
        f(&mut query);
        self.add_nested_where_query(query, Boolean::And)
    }

    /// `or` variant of [`Builder::where_nested`].
    pub fn or_where_nested<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let mut query = self.for_nested_where();
        f(&mut query);
        self.add_nested_where_query(query, Boolean::Or)
    }

    /// Adds `column op (sub-select)`.
    pub fn where_sub<'a>(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        query: impl Into<SubQuery<'a>>,
    ) -> &mut Self {
        let (sql, bindings) = query.into().compile(self);
        self.bindings.extend(Bucket::Where, bindings);
        let kind = WhereKind::Sub {
            column: column.into(),
            operator: String::from(operator),
            query: Expression::new(sql),
        };
        self.push_where(Boolean::And, kind)
    }

    fn add_exists_where(&mut self, query: SubQuery<'_>, boolean: Boolean, not: bool) -> &mut Self {
        let (sql, bindings) = query.compile(self);
        self.bindings.extend(Bucket::Where, bindings);
        let query = Expression::new(sql);
        let kind = if not {
            WhereKind::NotExists { query }
        } else {
            WhereKind::Exists { query }
        };
        self.push_where(boolean, kind)
    }

    /// Adds `exists (sub-select)`.
    pub fn where_exists<'a>(&mut self, query: impl Into<SubQuery<'a>>) -> &mut Self {
        self.add_exists_where(query.into(), Boolean::And, false)
    }

    /// `or` variant of [`Builder::where_exists`].
    pub fn or_where_exists<'a>(&mut self, query: impl Into<SubQuery<'a>>) -> &mut Self {
        self.add_exists_where(query.into(), Boolean::Or, false)
    }

    /// Adds `not exists (sub-select)`.
    pub fn where_not_exists<'a>(&mut self, query: impl Into<SubQuery<'a>>) -> &mut Self {
        self.add_exists_where(query.into(), Boolean::And, true)
    }

    /// `or` variant of [`Builder::where_not_exists`].
    pub fn or_where_not_exists<'a>(&mut self, query: impl Into<SubQuery<'a>>) -> &mut Self {
        self.add_exists_where(query.into(), Boolean::Or, true)
    }

    // ------------------------------------------------------------------
    // Row values, full text and JSON
    // ------------------------------------------------------------------

    /// Adds `(a, b) op (?, ?)`. Fails when the lists differ in length.
    pub fn where_row_values<C, V>(
        &mut self,
        columns: C,
        operator: &str,
        values: V,
    ) -> Result<&mut Self>
    where
        C: IntoIterator,
        C::Item: Into<Ident>,
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        let columns = idents(columns);
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if columns.len() != values.len() {
            return Err(QueryError::RowValuesMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        self.add_bindings(&values, Bucket::Where);
        Ok(self.push_where(
            Boolean::And,
            WhereKind::RowValues {
                columns,
                operator: String::from(operator),
                values,
            },
        ))
    }

    /// Adds a full-text match over `columns`.
    pub fn where_full_text<I, C>(
        &mut self,
        columns: I,
        value: impl Into<Value>,
        options: FullTextOptions,
    ) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        self.add_full_text_where(idents(columns), value.into(), options, Boolean::And)
    }

    /// `or` variant of [`Builder::where_full_text`].
    pub fn or_where_full_text<I, C>(
        &mut self,
        columns: I,
        value: impl Into<Value>,
        options: FullTextOptions,
    ) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Ident>,
    {
        self.add_full_text_where(idents(columns), value.into(), options, Boolean::Or)
    }

    fn add_full_text_where(
        &mut self,
        columns: Vec<Ident>,
        value: Value,
        options: FullTextOptions,
        boolean: Boolean,
    ) -> &mut Self {
        self.add_binding(&value, Bucket::Where);
        self.push_where(
            boolean,
            WhereKind::FullText {
                columns,
                value,
                options,
            },
        )
    }

    fn add_json_contains_where(&mut self, column: Ident, value: Value, not: bool) -> &mut Self {
        let value = match value {
            Value::Bound(value) => Value::Bound(SqlValue::Json(json_document(value))),
            raw @ Value::Raw(_) => raw,
        };
        self.add_binding(&value, Bucket::Where);
        self.push_where(Boolean::And, WhereKind::JsonContains { column, value, not })
    }

    /// Adds `json_contains(column, ?)`. The value is bound as a JSON document.
    pub fn where_json_contains(
        &mut self,
        column: impl Into<Ident>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_contains_where(column.into(), value.into(), false)
    }

    /// Adds `not json_contains(column, ?)`.
    pub fn where_json_doesnt_contain(
        &mut self,
        column: impl Into<Ident>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_contains_where(column.into(), value.into(), true)
    }

    /// Adds `json_length(column) op ?`.
    pub fn where_json_length(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let value = value.into();
        self.check_operator_and_value(operator, &value)?;
        let (value, operator) = if self.invalid_operator(operator) {
            (Value::from(operator), String::from("="))
        } else {
            (value, String::from(operator))
        };
        self.add_binding(&value, Bucket::Where);
        Ok(self.push_where(
            Boolean::And,
            WhereKind::JsonLength {
                column: column.into(),
                operator,
                value,
            },
        ))
    }
}

/// Encodes a scalar as the JSON document `json_contains` compares against.
fn json_document(value: SqlValue) -> serde_json::Value {
    match value {
        SqlValue::Null => serde_json::Value::Null,
        SqlValue::Bool(b) => serde_json::Value::Bool(b),
        SqlValue::Int(n) => serde_json::Value::from(n),
        SqlValue::Float(f) => serde_json::Value::from(f),
        SqlValue::Text(s) => serde_json::Value::String(s),
        SqlValue::Blob(bytes) => serde_json::Value::from(bytes),
        SqlValue::Json(v) => v,
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::Builder;
    use crate::error::QueryError;
    use crate::value::SqlValue;

    #[test]
    fn test_null_equality_becomes_is_null() {
        let mut query = Builder::table("users");
        query.where_eq("deleted_at", None::<i64>);
        query.where_op("name", "<>", None::<&str>).unwrap();

        assert_eq!(
            query.to_sql(),
            "select * from `users` where `deleted_at` is null and `name` is not null"
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_null_with_ordering_operator_is_rejected() {
        let mut query = Builder::table("users");
        let err = query.where_op("age", ">", None::<i64>).unwrap_err();
        assert_eq!(
            err,
            QueryError::IllegalOperatorAndValue {
                operator: String::from(">")
            }
        );
        assert!(query.wheres().is_empty());
    }

    #[test]
    fn test_unknown_operator_becomes_the_value() {
        let mut query = Builder::table("users");
        query.where_op("name", "bob", 1).unwrap();
        assert_eq!(query.to_sql(), "select * from `users` where `name` = ?");
        assert_eq!(query.bindings(), vec![SqlValue::Text(String::from("bob"))]);
    }

    #[test]
    fn test_grammar_operator_is_accepted() {
        let mut query = Builder::table("users");
        query.where_op("name", "sounds like", "jon").unwrap();
        assert_eq!(
            query.to_sql(),
            "select * from `users` where `name` sounds like ?"
        );
    }

    #[test]
    fn test_empty_in_list() {
        let mut query = Builder::table("users");
        query
            .where_in("id", Vec::<i64>::new())
            .where_not_in("id", Vec::<i64>::new());
        assert_eq!(
            query.to_sql(),
            "select * from `users` where 0 = 1 and 1 = 1"
        );
    }

    #[test]
    fn test_empty_nested_group_is_dropped() {
        let mut query = Builder::table("users");
        query.where_eq("a", 1).where_nested(|_| {});
        assert_eq!(query.to_sql(), "select * from `users` where `a` = ?");
    }

    #[test]
    fn test_nested_group_strips_leading_connector() {
        let mut query = Builder::table("users");
        query.where_eq("a", 1).or_where_nested(|q| {
            q.where_eq("b", 2).or_where_eq("c", 3);
        });
        assert_eq!(
            query.to_sql(),
            "select * from `users` where `a` = ? or (`b` = ? or `c` = ?)"
        );
        assert_eq!(query.bindings().len(), 3);
    }

    #[test]
    fn test_row_values_length_mismatch() {
        let mut query = Builder::table("users");
        let err = query
            .where_row_values(["a", "b"], "=", [1])
            .unwrap_err();
        assert_eq!(err, QueryError::RowValuesMismatch { columns: 2, values: 1 });
    }

    #[test]
    fn test_json_contains_binds_json_document() {
        let mut query = Builder::table("users");
        query.where_json_contains("options->languages", "en");
        assert_eq!(
            query.bindings(),
            vec![SqlValue::Json(serde_json::Value::String(String::from("en")))]
        );
    }
}
