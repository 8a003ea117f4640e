//! SQLite driver implementation

use async_trait::async_trait;
use std::sync::Arc;
use tabscan_core::{Connection, DataSource, Driver, Result, TabscanError};

use crate::SqliteConnection;

/// SQLite database driver
pub struct SqliteDriver;

impl SqliteDriver {
    /// Create a new SQLite driver instance
    pub fn new() -> Self {
        tracing::debug!("SQLite driver initialized");
        Self
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn display_name(&self) -> &'static str {
        "SQLite"
    }

    #[tracing::instrument(skip(self, source), fields(path = source.get_string("path").or_else(|| source.get_string("database")).as_deref()))]
    async fn connect(&self, source: &DataSource) -> Result<Arc<dyn Connection>> {
        let path = source
            .get_string("path")
            .or_else(|| source.get_string("database"))
            .ok_or_else(|| {
                TabscanError::Configuration(
                    "SQLite requires a 'path' or 'database' parameter, e.g. /path/to/database.db or :memory:"
                        .to_string(),
                )
            })?;

        // The readonly parameter opens the file without write access
        // and refuses to create a missing one
        let read_only = source
            .get_string("readonly")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let conn = if read_only {
            SqliteConnection::open_read_only(&path)
        } else {
            SqliteConnection::open(&path)
        }
        .map_err(|e| {
            tracing::error!(error = %e, "failed to connect to SQLite database");
            e
        })?;

        tracing::info!(path = %path, read_only = read_only, "SQLite connection created");
        Ok(Arc::new(conn))
    }

    #[tracing::instrument(skip(self, source))]
    async fn test_connection(&self, source: &DataSource) -> Result<()> {
        tracing::debug!("testing SQLite connection");
        let conn = self.connect(source).await?;
        conn.query("SELECT 1", &[]).await?;
        Ok(())
    }
}
