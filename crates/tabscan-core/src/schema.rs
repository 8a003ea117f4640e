//! Catalog introspection traits and types

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog introspection interface
///
/// Implemented by drivers whose store can enumerate its own tables and
/// report per-table column metadata. Stores without such a facility
/// leave [`crate::Connection::as_catalog`] returning `None`.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List the user-defined base tables visible to the connection.
    /// Views, indexes and store-internal bookkeeping objects are
    /// excluded.
    async fn table_names(&self) -> Result<Vec<String>>;

    /// Get column metadata for a table, ordered by ordinal position.
    /// Returns an empty list when the table does not exist; callers
    /// that need an existence check consult [`Catalog::table_names`].
    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;
}

/// Metadata for one column of a table, as reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Ordinal position in declaration order (0-based)
    pub ordinal: usize,
    /// Column name
    pub name: String,
    /// Declared type, passed through as the store reports it
    pub data_type: String,
    /// Whether the store forbids NULL in this column
    pub not_null: bool,
    /// Default value expression in the store's textual form
    pub default_value: Option<String>,
    /// Whether the column participates in the primary key
    pub is_primary_key: bool,
}

/// Column metadata for a set of tables, keyed by table name
///
/// Each entry holds the table's columns in ordinal order. Tables whose
/// metadata could not be fetched are simply absent.
pub type TableMetadata = BTreeMap<String, Vec<ColumnDescriptor>>;

/// Quote a name as a SQL identifier, doubling embedded quotes
///
/// Standard double-quote form, accepted by SQLite and the other
/// engines tabscan cares about. Always quoting keeps keywords and
/// exotic table names safe to interpolate.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_identifiers() {
        assert_eq!(quote_identifier("user"), "\"user\"");
        assert_eq!(quote_identifier("grade"), "\"grade\"");
    }

    #[test]
    fn doubles_embedded_quotes() {
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_identifier("\""), "\"\"\"\"");
    }

    #[test]
    fn quotes_hostile_names_without_breaking_out() {
        let quoted = quote_identifier("t\"; DROP TABLE user; --");
        assert_eq!(quoted, "\"t\"\"; DROP TABLE user; --\"");
    }
}
