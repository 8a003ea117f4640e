//! Catalog reader implementation
//!
//! Thin pass over a connection's catalog facility that normalizes the
//! table listing and validates column metadata before handing either
//! to callers.

use tabscan_core::{Catalog, ColumnDescriptor, Connection, Result, TableMetadata, TabscanError};

/// Borrow the catalog facility of a connection.
///
/// Fails with [`TabscanError::CatalogUnavailable`] when the driver
/// behind the connection has no way to enumerate its tables.
pub fn catalog_of(conn: &dyn Connection) -> Result<&dyn Catalog> {
    conn.as_catalog().ok_or_else(|| {
        TabscanError::CatalogUnavailable(format!(
            "driver '{}' exposes no table catalog",
            conn.driver_name()
        ))
    })
}

/// List every user-defined base table the connection can see.
///
/// Names come back sorted and duplicate-free, so two listings can be
/// compared directly. Views and store-internal bookkeeping objects
/// are excluded by the driver's catalog.
#[tracing::instrument(skip(conn), fields(driver = conn.driver_name()))]
pub async fn list_tables(conn: &dyn Connection) -> Result<Vec<String>> {
    let catalog = catalog_of(conn)?;
    let mut names = catalog.table_names().await?;
    names.sort();
    names.dedup();
    tracing::debug!(table_count = names.len(), "listed tables");
    Ok(names)
}

/// Describe the columns of the requested tables.
///
/// The result maps table name to descriptors in ordinal order.
/// Requested tables the store does not know are omitted rather than
/// reported as errors, so callers can probe names freely; an empty
/// request yields an empty map.
#[tracing::instrument(skip(conn, tables), fields(driver = conn.driver_name(), requested = tables.len()))]
pub async fn describe_columns(conn: &dyn Connection, tables: &[String]) -> Result<TableMetadata> {
    let catalog = catalog_of(conn)?;
    let mut metadata = TableMetadata::new();
    for table in tables {
        if metadata.contains_key(table) {
            continue;
        }
        let columns = catalog.table_columns(table).await?;
        if columns.is_empty() {
            tracing::debug!(table = %table, "no columns reported, omitting table");
            continue;
        }
        verify_ordinals(table, &columns)?;
        metadata.insert(table.clone(), columns);
    }
    Ok(metadata)
}

/// Check that descriptors occupy ordinal positions 0..n-1 in order.
///
/// Drivers contract to return columns sorted by ordinal, so any gap,
/// repeat, or offset start means the store handed back metadata we
/// cannot trust.
fn verify_ordinals(table: &str, columns: &[ColumnDescriptor]) -> Result<()> {
    for (position, column) in columns.iter().enumerate() {
        if column.ordinal != position {
            return Err(TabscanError::MalformedMetadata {
                table: table.to_string(),
                reason: format!(
                    "column '{}' reports ordinal {} at position {}",
                    column.name, column.ordinal, position
                ),
            });
        }
    }
    Ok(())
}
