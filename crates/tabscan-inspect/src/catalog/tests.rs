//! Tests for catalog reading

use std::collections::HashMap;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tabscan_core::{
    Catalog, ColumnDescriptor, Connection, Result, RowSet, TabscanError, Value,
};

use super::{describe_columns, list_tables};

/// Connection stub backed by a scripted in-memory catalog
#[derive(Debug)]
struct StubConnection {
    tables: Vec<String>,
    columns: HashMap<String, Vec<ColumnDescriptor>>,
    has_catalog: bool,
    closed: bool,
}

impl StubConnection {
    fn new(tables: &[&str]) -> Self {
        Self {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            columns: HashMap::new(),
            has_catalog: true,
            closed: false,
        }
    }

    fn with_columns(mut self, table: &str, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns.insert(table.to_string(), columns);
        self
    }

    fn without_catalog(mut self) -> Self {
        self.has_catalog = false;
        self
    }

    fn closed(mut self) -> Self {
        self.closed = true;
        self
    }
}

#[async_trait]
impl Connection for StubConnection {
    fn driver_name(&self) -> &str {
        "stub"
    }

    async fn query(&self, _sql: &str, _params: &[Value]) -> Result<RowSet> {
        Ok(RowSet::empty())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn as_catalog(&self) -> Option<&dyn Catalog> {
        if self.has_catalog {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl Catalog for StubConnection {
    async fn table_names(&self) -> Result<Vec<String>> {
        if self.closed {
            return Err(TabscanError::Connection("connection is closed".to_string()));
        }
        Ok(self.tables.clone())
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        if self.closed {
            return Err(TabscanError::Connection("connection is closed".to_string()));
        }
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }
}

fn column(ordinal: usize, name: &str, data_type: &str) -> ColumnDescriptor {
    ColumnDescriptor {
        ordinal,
        name: name.to_string(),
        data_type: data_type.to_string(),
        not_null: false,
        default_value: None,
        is_primary_key: false,
    }
}

#[tokio::test]
async fn list_tables_sorts_and_dedups() {
    let conn = StubConnection::new(&["user", "grade", "ascent", "grade"]);

    let tables = list_tables(&conn).await.unwrap();

    assert_eq!(tables, vec!["ascent", "grade", "user"]);
}

#[tokio::test]
async fn list_tables_on_empty_store_is_empty() {
    let conn = StubConnection::new(&[]);

    let tables = list_tables(&conn).await.unwrap();

    assert!(tables.is_empty());
}

#[tokio::test]
async fn list_tables_without_catalog_fails() {
    let conn = StubConnection::new(&["user"]).without_catalog();

    let err = list_tables(&conn).await.unwrap_err();

    assert!(matches!(err, TabscanError::CatalogUnavailable(_)));
}

#[tokio::test]
async fn list_tables_on_closed_connection_fails() {
    let conn = StubConnection::new(&["user"]).closed();

    let err = list_tables(&conn).await.unwrap_err();

    assert!(matches!(err, TabscanError::Connection(_)));
}

#[tokio::test]
async fn describe_columns_maps_each_known_table() {
    let conn = StubConnection::new(&["user", "grade"])
        .with_columns(
            "user",
            vec![
                column(0, "id", "INTEGER"),
                column(1, "name", "TEXT"),
                column(2, "city", "TEXT"),
            ],
        )
        .with_columns(
            "grade",
            vec![column(0, "id", "INTEGER"), column(1, "score", "REAL")],
        );
    let request = vec!["user".to_string(), "grade".to_string()];

    let metadata = describe_columns(&conn, &request).await.unwrap();

    assert_eq!(metadata.len(), 2);
    let user = &metadata["user"];
    assert_eq!(user.len(), 3);
    assert_eq!(user[1].name, "name");
    assert_eq!(user[1].ordinal, 1);
    assert_eq!(metadata["grade"][1].data_type, "REAL");
}

#[tokio::test]
async fn describe_columns_omits_unknown_tables() {
    let conn = StubConnection::new(&["user"])
        .with_columns("user", vec![column(0, "id", "INTEGER")]);
    let request = vec!["user".to_string(), "__does_not_exist__".to_string()];

    let metadata = describe_columns(&conn, &request).await.unwrap();

    assert_eq!(metadata.len(), 1);
    assert!(metadata.contains_key("user"));
    assert!(!metadata.contains_key("__does_not_exist__"));
}

#[tokio::test]
async fn describe_columns_empty_request_yields_empty_map() {
    let conn = StubConnection::new(&["user"]);

    let metadata = describe_columns(&conn, &[]).await.unwrap();

    assert!(metadata.is_empty());
}

#[tokio::test]
async fn describe_columns_collapses_duplicate_requests() {
    let conn = StubConnection::new(&["user"])
        .with_columns("user", vec![column(0, "id", "INTEGER")]);
    let request = vec!["user".to_string(), "user".to_string()];

    let metadata = describe_columns(&conn, &request).await.unwrap();

    assert_eq!(metadata.len(), 1);
}

#[tokio::test]
async fn describe_columns_rejects_ordinal_gaps() {
    let conn = StubConnection::new(&["broken"]).with_columns(
        "broken",
        vec![column(0, "id", "INTEGER"), column(2, "name", "TEXT")],
    );
    let request = vec!["broken".to_string()];

    let err = describe_columns(&conn, &request).await.unwrap_err();

    match err {
        TabscanError::MalformedMetadata { table, reason } => {
            assert_eq!(table, "broken");
            assert!(reason.contains("ordinal 2"));
        }
        other => panic!("expected malformed metadata, got {:?}", other),
    }
}

#[tokio::test]
async fn describe_columns_rejects_offset_ordinals() {
    let conn = StubConnection::new(&["broken"]).with_columns(
        "broken",
        vec![column(1, "id", "INTEGER"), column(2, "name", "TEXT")],
    );
    let request = vec!["broken".to_string()];

    let err = describe_columns(&conn, &request).await.unwrap_err();

    assert!(matches!(err, TabscanError::MalformedMetadata { .. }));
}
