//! Table content previewer implementation
//!
//! Requested names are validated against the store catalog before any
//! SQL is built, so a mistyped or hostile name never reaches the store
//! as raw text. Identifiers that do reach the store are always quoted.

use std::collections::BTreeSet;

use tabscan_core::{Connection, Result, RowLimit, TablePreview, TabscanError, quote_identifier};

use crate::catalog::catalog_of;

/// Fetch the leading rows of each requested table.
///
/// Entries come back in request order, one per requested name with
/// duplicates kept. A table that cannot be read carries its error in
/// [`TablePreview::outcome`] while the rest of the batch proceeds; the
/// call as a whole only fails when the store or its catalog is
/// unreachable.
#[tracing::instrument(skip(conn, tables), fields(driver = conn.driver_name(), requested = tables.len(), limit = ?limit))]
pub async fn preview(
    conn: &dyn Connection,
    tables: &[String],
    limit: RowLimit,
) -> Result<Vec<TablePreview>> {
    let catalog = catalog_of(conn)?;
    let known: BTreeSet<String> = catalog.table_names().await?.into_iter().collect();

    let mut previews = Vec::with_capacity(tables.len());
    for table in tables {
        let outcome = if known.contains(table) {
            conn.query(&preview_sql(table, limit), &[]).await
        } else {
            Err(TabscanError::UnknownTable(table.clone()))
        };
        if let Err(err) = &outcome {
            tracing::warn!(table = %table, error = %err, "table preview failed");
        }
        previews.push(TablePreview {
            table: table.clone(),
            outcome,
        });
    }
    Ok(previews)
}

/// Build the SELECT statement for one table preview
pub(crate) fn preview_sql(table: &str, limit: RowLimit) -> String {
    let ident = quote_identifier(table);
    match limit {
        RowLimit::All => format!("SELECT * FROM {}", ident),
        RowLimit::First(n) => format!("SELECT * FROM {} LIMIT {}", ident, n),
    }
}
