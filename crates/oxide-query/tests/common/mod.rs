#![allow(dead_code)]

use oxide_query::{Builder, SqlValue};

/// Counts the `?` placeholders of compiled SQL.
pub fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

/// Asserts that every placeholder of `query` has exactly one binding.
pub fn assert_aligned(query: &Builder) {
    let (sql, bindings) = query.build();
    assert_eq!(
        placeholders(&sql),
        bindings.len(),
        "placeholder/binding mismatch in: {sql}\nbindings: {bindings:?}"
    );
}

pub fn text(value: &str) -> SqlValue {
    SqlValue::Text(String::from(value))
}

pub fn int(value: i64) -> SqlValue {
    SqlValue::Int(value)
}
