//! MySQL grammar.

use super::Grammar;

/// MySQL grammar: backtick quoting, `sounds like`, `on duplicate key update`
/// upserts and `RAND()` ordering.
#[derive(Debug, Clone, Default)]
pub struct MySqlGrammar {
    table_prefix: String,
}

impl MySqlGrammar {
    /// Creates a MySQL grammar without a table prefix.
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

impl Grammar for MySqlGrammar {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn operators(&self) -> &'static [&'static str] {
        &["sounds like"]
    }
}
