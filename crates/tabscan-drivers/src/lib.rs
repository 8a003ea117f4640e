//! Tabscan Drivers - Database driver implementations
//!
//! This crate provides concrete implementations of the driver traits
//! defined in `tabscan-core`, plus a registry to look drivers up by
//! name and a shared Tokio runtime for synchronous callers.

#[cfg(feature = "sqlite")]
pub use tabscan_driver_sqlite as sqlite;

mod registry;
mod runtime;

pub use registry::DriverRegistry;
pub use runtime::{block_on_tokio, get_tokio_runtime};

/// Re-export commonly used types from tabscan-core
pub use tabscan_core::{
    Catalog, ColumnDescriptor, Connection, DataSource, Driver, Result, ResultColumn, Row,
    RowLimit, RowSet, TableMetadata, TablePreview, TabscanError, Value,
};

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::sqlite::SqliteConnection;

    #[tokio::test]
    async fn sqlite_in_memory_round_trip() {
        let conn = SqliteConnection::open(":memory:").expect("Failed to open in-memory db");

        conn.execute(
            "CREATE TABLE climbers (id INTEGER PRIMARY KEY, name TEXT NOT NULL, city TEXT)",
            &[],
        )
        .await
        .expect("Failed to create table");

        let affected = conn
            .execute(
                "INSERT INTO climbers (name, city) VALUES ('Alice', 'Innsbruck')",
                &[],
            )
            .await
            .expect("Failed to insert");
        assert_eq!(affected, 1);

        let result = conn
            .query("SELECT * FROM climbers", &[])
            .await
            .expect("Failed to query");

        assert_eq!(result.row_count(), 1);
        assert_eq!(result.column_names(), vec!["id", "name", "city"]);
    }

    #[tokio::test]
    async fn sqlite_catalog_is_available() {
        let conn = SqliteConnection::open(":memory:").expect("Failed to open in-memory db");

        conn.execute("CREATE TABLE t1 (id INTEGER PRIMARY KEY)", &[])
            .await
            .expect("Failed to create table");

        let catalog = conn.as_catalog().expect("Should expose a catalog");
        let names = catalog.table_names().await.expect("Failed to list tables");
        assert_eq!(names, vec!["t1"]);
    }

    #[test]
    fn registry_has_sqlite_by_default() {
        let registry = DriverRegistry::with_defaults();
        assert!(registry.has("sqlite"));
        assert!(registry.get("sqlite").is_some());
        assert!(registry.get("postgres").is_none());
    }
}
