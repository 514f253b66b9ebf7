//! Binding buckets.
//!
//! Each clause category appends its parameters to its own bucket at the
//! moment the clause is added. Flattening the buckets in declaration order
//! yields the select bindings in placeholder order.

use crate::value::SqlValue;

/// A named binding bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Raw and sub-query projections.
    Select,
    /// Derived tables and raw FROM fragments.
    From,
    /// Join sub-queries and ON conditions.
    Join,
    /// WHERE clause parameters.
    Where,
    /// GROUP BY parameters.
    GroupBy,
    /// HAVING clause parameters.
    Having,
    /// ORDER BY parameters.
    Order,
    /// Union branch parameters.
    Union,
    /// ORDER BY parameters of the unioned result.
    UnionOrder,
}

impl Bucket {
    /// All buckets, in flattening order.
    pub const ALL: [Self; 9] = [
        Self::Select,
        Self::From,
        Self::Join,
        Self::Where,
        Self::GroupBy,
        Self::Having,
        Self::Order,
        Self::Union,
        Self::UnionOrder,
    ];
}

/// The binding buckets of one builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    select: Vec<SqlValue>,
    from: Vec<SqlValue>,
    join: Vec<SqlValue>,
    where_: Vec<SqlValue>,
    group_by: Vec<SqlValue>,
    having: Vec<SqlValue>,
    order: Vec<SqlValue>,
    union: Vec<SqlValue>,
    union_order: Vec<SqlValue>,
}

impl Bindings {
    /// Returns the values held in `bucket`.
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> &[SqlValue] {
        match bucket {
            Bucket::Select => &self.select,
            Bucket::From => &self.from,
            Bucket::Join => &self.join,
            Bucket::Where => &self.where_,
            Bucket::GroupBy => &self.group_by,
            Bucket::Having => &self.having,
            Bucket::Order => &self.order,
            Bucket::Union => &self.union,
            Bucket::UnionOrder => &self.union_order,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<SqlValue> {
        match bucket {
            Bucket::Select => &mut self.select,
            Bucket::From => &mut self.from,
            Bucket::Join => &mut self.join,
            Bucket::Where => &mut self.where_,
            Bucket::GroupBy => &mut self.group_by,
            Bucket::Having => &mut self.having,
            Bucket::Order => &mut self.order,
            Bucket::Union => &mut self.union,
            Bucket::UnionOrder => &mut self.union_order,
        }
    }

    /// Appends one value to `bucket`.
    pub fn push(&mut self, bucket: Bucket, value: SqlValue) {
        self.get_mut(bucket).push(value);
    }

    /// Appends values to `bucket`, preserving their order.
    pub fn extend<I>(&mut self, bucket: Bucket, values: I)
    where
        I: IntoIterator<Item = SqlValue>,
    {
        self.get_mut(bucket).extend(values);
    }

    /// Empties `bucket`.
    pub fn clear(&mut self, bucket: Bucket) {
        self.get_mut(bucket).clear();
    }

    /// Flattens every bucket in declaration order.
    #[must_use]
    pub fn flatten(&self) -> Vec<SqlValue> {
        self.flatten_except(&[])
    }

    /// Flattens every bucket not listed in `excluded`, in declaration order.
    #[must_use]
    pub fn flatten_except(&self, excluded: &[Bucket]) -> Vec<SqlValue> {
        Bucket::ALL
            .iter()
            .filter(|bucket| !excluded.contains(bucket))
            .flat_map(|bucket| self.get(*bucket).iter().cloned())
            .collect()
    }

    /// Total number of bound values.
    #[must_use]
    pub fn len(&self) -> usize {
        Bucket::ALL.iter().map(|bucket| self.get(*bucket).len()).sum()
    }

    /// Returns `true` when no bucket holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_follows_declaration_order() {
        let mut bindings = Bindings::default();
        bindings.push(Bucket::UnionOrder, SqlValue::Int(9));
        bindings.push(Bucket::Where, SqlValue::Int(4));
        bindings.push(Bucket::Select, SqlValue::Int(1));
        bindings.push(Bucket::Join, SqlValue::Int(3));

        assert_eq!(
            bindings.flatten(),
            vec![
                SqlValue::Int(1),
                SqlValue::Int(3),
                SqlValue::Int(4),
                SqlValue::Int(9)
            ]
        );
    }

    #[test]
    fn test_flatten_except() {
        let mut bindings = Bindings::default();
        bindings.push(Bucket::Select, SqlValue::Int(1));
        bindings.push(Bucket::Join, SqlValue::Int(2));
        bindings.push(Bucket::Where, SqlValue::Int(3));

        assert_eq!(
            bindings.flatten_except(&[Bucket::Select, Bucket::Join]),
            vec![SqlValue::Int(3)]
        );
    }

    #[test]
    fn test_clear_and_len() {
        let mut bindings = Bindings::default();
        bindings.extend(Bucket::Order, vec![SqlValue::Int(1), SqlValue::Int(2)]);
        assert_eq!(bindings.len(), 2);
        bindings.clear(Bucket::Order);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Bindings::default();
        original.push(Bucket::Where, SqlValue::Int(1));
        let mut copy = original.clone();
        copy.push(Bucket::Where, SqlValue::Int(2));

        assert_eq!(original.get(Bucket::Where).len(), 1);
        assert_eq!(copy.get(Bucket::Where).len(), 2);
    }
}
