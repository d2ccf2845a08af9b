//! Table-qualified column references produced by path resolution.

use sea_query::DynIden;
use std::fmt;

/// Owned identifier for a runtime table, alias or column name.
pub(crate) fn iden(name: &str) -> DynIden {
    DynIden::from(name.to_owned())
}

/// `table.column` as a sea-query column reference.
pub(crate) fn qualified(table: &str, column: &str) -> (DynIden, DynIden) {
    (iden(table), iden(column))
}

/// A column qualified by the table or alias it is reachable under.
///
/// Displayed as `table.column`, which is what
/// [`JoinSelect::resolve_column`](crate::JoinSelect::resolve_column) returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedColumn {
    table: String,
    column: String,
}

impl ResolvedColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Table name or alias
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn column_ref(&self) -> (DynIden, DynIden) {
        qualified(&self.table, &self.column)
    }
}

impl fmt::Display for ResolvedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}
