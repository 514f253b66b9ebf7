//! Write operations and their payloads.
//!
//! Setting a write operation only records the payload on the builder; the
//! grammar renders it when the builder is compiled. Filters, joins, ordering
//! and limits configured on the same builder are honored by the statements
//! that support them.

use tracing::trace;

use crate::error::{QueryError, Result};
use crate::value::{SqlValue, Value};

use super::clause::JoinType;
use super::Builder;

/// An ordered set of `column => value` pairs.
///
/// Column order is insertion order; setting an existing column replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a column value.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a column value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Returns the value of `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for a row without columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sorted(mut self) -> Self {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Rows handed to a multi-row write.
///
/// A single row keeps its column order. Multiple rows are each sorted by
/// column name, because the column list is taken from the first row while
/// values are emitted row by row.
#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// One row.
    One(Row),
    /// Several rows.
    Many(Vec<Row>),
}

impl Rows {
    /// Normalizes into a row sequence with aligned column order.
    #[must_use]
    pub fn normalize(self) -> Vec<Row> {
        match self {
            Self::One(row) => vec![row],
            Self::Many(rows) => rows.into_iter().map(Row::sorted).collect(),
        }
    }
}

impl From<Row> for Rows {
    fn from(row: Row) -> Self {
        Self::One(row)
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self::Many(rows)
    }
}

/// One entry of an upsert's update list.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertColumn {
    /// Reuse the value supplied for the insert.
    Inserted(String),
    /// Replace with an explicit value.
    Value(String, Value),
}

impl UpsertColumn {
    /// Creates an entry with an explicit replacement value.
    #[must_use]
    pub fn value(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Value(column.into(), value.into())
    }
}

impl From<&str> for UpsertColumn {
    fn from(column: &str) -> Self {
        Self::Inserted(String::from(column))
    }
}

impl From<String> for UpsertColumn {
    fn from(column: String) -> Self {
        Self::Inserted(column)
    }
}

/// How a batch update is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchStrategy {
    /// One `case when index = ? then ? ... end` per field.
    #[default]
    CaseWhen,
    /// Join against a derived table built from the rows.
    Join,
}

/// Alias of the derived table used by [`BatchStrategy::Join`].
pub const BATCH_UPDATE_ALIAS: &str = "updates";

/// Payload of a batch update.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchUpdate {
    /// Rows to write, sorted by column.
    pub rows: Vec<Row>,
    /// Column identifying each target row.
    pub index: String,
    /// Rendering strategy.
    pub strategy: BatchStrategy,
}

/// One `when index = ? then ?` arm of a batch-update case expression.
#[derive(Debug, Clone, Copy)]
pub struct CaseArm<'a> {
    /// The index value of the row.
    pub key: &'a Value,
    /// The new field value.
    pub value: &'a Value,
}

impl BatchUpdate {
    /// Groups the rows by field: for every non-index field (in first-seen
    /// order), the arms of the rows that carry it, in row order.
    ///
    /// Both the SET rendering and the binding order derive from this.
    #[must_use]
    pub fn field_cases(&self) -> Vec<(&str, Vec<CaseArm<'_>>)> {
        let mut cases: Vec<(&str, Vec<CaseArm<'_>>)> = Vec::new();
        for row in &self.rows {
            let Some(key) = row.get(&self.index) else {
                continue;
            };
            for (field, value) in row.iter() {
                if field == self.index {
                    continue;
                }
                let arm = CaseArm { key, value };
                match cases.iter_mut().find(|(f, _)| *f == field) {
                    Some((_, arms)) => arms.push(arm),
                    None => cases.push((field, vec![arm])),
                }
            }
        }
        cases
    }

    /// Non-index columns of the first row.
    pub fn update_columns(&self) -> impl Iterator<Item = &str> {
        self.rows
            .first()
            .into_iter()
            .flat_map(Row::columns)
            .filter(move |c| *c != self.index)
    }

    /// Bound values of the case-when rendering, grouped by field.
    pub(crate) fn case_bindings(&self) -> Vec<SqlValue> {
        self.field_cases()
            .iter()
            .flat_map(|(_, arms)| arms.iter())
            .flat_map(|arm| [arm.key, arm.value])
            .filter_map(|v| v.as_bound().cloned())
            .collect()
    }
}

/// The statement a builder compiles to, with its write payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operation {
    /// `select ...`
    #[default]
    Select,
    /// `update ... set ...`
    Update(Row),
    /// Multi-row update keyed by an index column.
    BatchUpdate(BatchUpdate),
    /// `insert into ...`
    Insert(Vec<Row>),
    /// `insert ignore into ...`
    InsertOrIgnore(Vec<Row>),
    /// Insert with a fallback update on key conflicts.
    Upsert {
        /// Rows to insert.
        rows: Vec<Row>,
        /// Columns forming the conflicting unique key.
        unique_by: Vec<String>,
        /// Columns rewritten on conflict.
        update: Vec<UpsertColumn>,
    },
    /// `delete from ...`
    Delete,
}

impl Operation {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Update(_) => "update",
            Self::BatchUpdate(_) => "batch_update",
            Self::Insert(_) => "insert",
            Self::InsertOrIgnore(_) => "insert_or_ignore",
            Self::Upsert { .. } => "upsert",
            Self::Delete => "delete",
        }
    }
}

impl Builder {
    /// Turns this builder into `update <table> set ...`, filtered by the
    /// builder's where tree. Fails on an empty row.
    pub fn update(&mut self, row: Row) -> Result<&mut Self> {
        self.require_table("update")?;
        if row.iter().next().is_none() {
            return Err(QueryError::EmptyUpdate("update"));
        }
        self.operation = Operation::Update(row);
        Ok(self)
    }

    /// Turns this builder into a multi-row update keyed by `index`.
    ///
    /// Every row must carry `index`, and some row must set another column.
    /// A `where index in (...)` filter over the row keys is added
    /// automatically. With [`BatchStrategy::Join`] the rows
    /// are also joined as a derived table aliased [`BATCH_UPDATE_ALIAS`].
    pub fn batch_update(
        &mut self,
        rows: impl Into<Rows>,
        index: &str,
        strategy: BatchStrategy,
    ) -> Result<&mut Self> {
        self.require_table("batch_update")?;
        let rows = rows.into().normalize();
        if let Some(row) = rows.iter().position(|row| row.get(index).is_none()) {
            return Err(QueryError::MissingIndexColumn {
                row,
                index: String::from(index),
            });
        }
        if rows.iter().all(|row| row.columns().all(|column| column == index)) {
            return Err(QueryError::EmptyUpdate("batch_update"));
        }
        let keys: Vec<Value> = rows.iter().filter_map(|row| row.get(index).cloned()).collect();
        trace!(rows = rows.len(), index, ?strategy, "preparing batch update");

        match strategy {
            BatchStrategy::CaseWhen => {
                self.where_in(index, keys);
            }
            BatchStrategy::Join => {
                let target = self
                    .from_alias()
                    .map(String::from)
                    .ok_or(QueryError::MissingTable("batch_update"))?;
                if let Some(derived) = self.batch_derived_table(&rows) {
                    self.join_sub(
                        derived,
                        BATCH_UPDATE_ALIAS,
                        format!("{target}.{index}"),
                        "=",
                        format!("{BATCH_UPDATE_ALIAS}.{index}"),
                        JoinType::Inner,
                    );
                }
                self.where_in(format!("{target}.{index}"), keys);
            }
        }

        self.operation = Operation::BatchUpdate(BatchUpdate {
            rows,
            index: String::from(index),
            strategy,
        });
        Ok(self)
    }

    /// `select ? as col, ...` per row, chained with `union all`.
    fn batch_derived_table(&self, rows: &[Row]) -> Option<Self> {
        let mut derived: Option<Self> = None;
        for row in rows {
            let columns: Vec<String> = row
                .iter()
                .map(|(column, value)| {
                    format!(
                        "{} as {}",
                        self.grammar.parameter(value),
                        self.grammar.wrap(column)
                    )
                })
                .collect();
            let mut select = self.for_sub_query();
            select.select_raw(&columns.join(", "), row.values().cloned());
            match derived.as_mut() {
                Some(base) => {
                    base.union_all(select);
                }
                None => derived = Some(select),
            }
        }
        derived
    }

    /// Turns this builder into `insert into <table> ...`.
    pub fn insert(&mut self, rows: impl Into<Rows>) -> Result<&mut Self> {
        self.require_table("insert")?;
        self.operation = Operation::Insert(rows.into().normalize());
        Ok(self)
    }

    /// Turns this builder into an insert that skips conflicting rows.
    pub fn insert_or_ignore(&mut self, rows: impl Into<Rows>) -> Result<&mut Self> {
        self.require_table("insert_or_ignore")?;
        self.operation = Operation::InsertOrIgnore(rows.into().normalize());
        Ok(self)
    }

    /// Turns this builder into an insert that updates `update` on key
    /// conflicts. With nothing to update this is a plain insert.
    pub fn upsert<U, K, C>(
        &mut self,
        rows: impl Into<Rows>,
        unique_by: U,
        update: C,
    ) -> Result<&mut Self>
    where
        U: IntoIterator<Item = K>,
        K: Into<String>,
        C: IntoIterator,
        C::Item: Into<UpsertColumn>,
    {
        self.require_table("upsert")?;
        let rows = rows.into().normalize();
        let update: Vec<UpsertColumn> = update.into_iter().map(Into::into).collect();
        self.operation = if update.is_empty() {
            Operation::Insert(rows)
        } else {
            Operation::Upsert {
                rows,
                unique_by: unique_by.into_iter().map(Into::into).collect(),
                update,
            }
        };
        Ok(self)
    }

    /// Turns this builder into `delete from <table>`, filtered by the
    /// builder's where tree.
    pub fn delete(&mut self) -> Result<&mut Self> {
        self.require_table("delete")?;
        self.operation = Operation::Delete;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;

    #[test]
    fn test_row_keeps_insertion_order_and_replaces() {
        let row = Row::new().set("b", 1).set("a", 2).set("b", 3);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(row.get("b"), Some(&Value::from(3)));
    }

    #[test]
    fn test_single_row_is_not_sorted() {
        let rows = Rows::from(Row::new().set("name", "a").set("id", 1)).normalize();
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["name", "id"]);
    }

    #[test]
    fn test_many_rows_are_sorted_by_column() {
        let rows = Rows::from(vec![
            Row::new().set("name", "a").set("id", 1),
            Row::new().set("id", 2).set("name", "b"),
        ])
        .normalize();
        for row in &rows {
            assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        }
    }

    #[test]
    fn test_field_cases_group_by_field() {
        let batch = BatchUpdate {
            rows: vec![
                Row::new().set("id", 1).set("name", "a").set("score", 10),
                Row::new().set("id", 2).set("name", "b").set("score", 20),
            ],
            index: String::from("id"),
            strategy: BatchStrategy::CaseWhen,
        };
        let cases = batch.field_cases();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].0, "name");
        assert_eq!(cases[0].1.len(), 2);
        assert_eq!(
            batch.case_bindings(),
            vec![
                SqlValue::Int(1),
                SqlValue::Text(String::from("a")),
                SqlValue::Int(2),
                SqlValue::Text(String::from("b")),
                SqlValue::Int(1),
                SqlValue::Int(10),
                SqlValue::Int(2),
                SqlValue::Int(20),
            ]
        );
    }

    #[test]
    fn test_case_bindings_skip_literals() {
        let batch = BatchUpdate {
            rows: vec![Row::new()
                .set("id", 1)
                .set("touched_at", Expression::new("NOW()"))],
            index: String::from("id"),
            strategy: BatchStrategy::CaseWhen,
        };
        assert_eq!(batch.case_bindings(), vec![SqlValue::Int(1)]);
        assert_eq!(batch.update_columns().collect::<Vec<_>>(), vec!["touched_at"]);
    }

    #[test]
    fn test_upsert_column_from_str() {
        assert_eq!(
            UpsertColumn::from("name"),
            UpsertColumn::Inserted(String::from("name"))
        );
    }
}
