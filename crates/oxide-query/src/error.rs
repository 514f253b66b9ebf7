//! Error types for query building.

use thiserror::Error;

/// Errors raised while accumulating clauses.
///
/// Compilation itself never fails: every error is reported by the builder
/// call that received the bad argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// NULL compared with an operator other than `=`, `<>` or `!=`.
    #[error("illegal operator and value combination: `{operator}` cannot be used with NULL")]
    IllegalOperatorAndValue {
        /// The rejected operator.
        operator: String,
    },

    /// Order direction other than `asc` / `desc`.
    #[error("order direction must be \"asc\" or \"desc\", got \"{0}\"")]
    InvalidOrderDirection(String),

    /// Row-value comparison with mismatched arity.
    #[error("the number of columns ({columns}) must match the number of values ({values})")]
    RowValuesMismatch {
        /// Number of columns supplied.
        columns: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// A write operation was requested before `from`.
    #[error("no table specified: call `from` before `{0}`")]
    MissingTable(&'static str),

    /// A batch-update row lacks the index column.
    #[error("batch update row {row} has no value for index column `{index}`")]
    MissingIndexColumn {
        /// Position of the offending row.
        row: usize,
        /// The index column name.
        index: String,
    },

    /// An update with nothing to set.
    #[error("`{0}` has no columns to set")]
    EmptyUpdate(&'static str),
}

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, QueryError>;
