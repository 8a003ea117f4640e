//! SQLite connection implementation

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection as RusqliteConnection, OpenFlags, params_from_iter};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tabscan_core::{
    Catalog, ColumnDescriptor, Connection, Result, ResultColumn, Row, RowSet, TabscanError, Value,
};

/// SQLite connection wrapper.
///
/// The underlying rusqlite handle sits behind a mutex, so concurrent
/// callers serialize their statements rather than corrupt state.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Mutex<RusqliteConnection>,
    closed: AtomicBool,
}

impl SqliteConnection {
    /// Open a SQLite database, creating the file if it does not exist
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database");
        // Expand path to handle ~ and relative paths
        let expanded_path = Self::expand_path(path)?;

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = if path == ":memory:" {
            RusqliteConnection::open_in_memory().map_err(|e| {
                TabscanError::Connection(format!("failed to open in-memory database: {}", e))
            })?
        } else {
            // Validate that the parent directory exists for non-URI paths
            if !expanded_path.starts_with("file:") {
                let file_path = std::path::Path::new(&expanded_path);
                if let Some(parent) = file_path.parent()
                    && !parent.exists()
                {
                    return Err(TabscanError::Connection(format!(
                        "parent directory does not exist: {}",
                        parent.display()
                    )));
                }
            }

            RusqliteConnection::open_with_flags(&expanded_path, flags).map_err(|e| {
                TabscanError::Connection(format!(
                    "failed to open SQLite database at '{}': {}",
                    expanded_path, e
                ))
            })?
        };

        // PRAGMA commands return results, so use pragma_update
        conn.pragma_update(None, "foreign_keys", "ON").map_err(|e| {
            TabscanError::Connection(format!("failed to enable foreign keys: {}", e))
        })?;

        tracing::info!(path = %expanded_path, "SQLite database connection established");
        Ok(Self::from_rusqlite(conn))
    }

    /// Open an existing SQLite database without write access.
    ///
    /// The file must already exist and no pragma is touched, so
    /// inspecting a database never alters it.
    pub fn open_read_only(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database read-only");
        let expanded_path = Self::expand_path(path)?;

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = RusqliteConnection::open_with_flags(&expanded_path, flags).map_err(|e| {
            TabscanError::Connection(format!(
                "failed to open SQLite database at '{}': {}",
                expanded_path, e
            ))
        })?;

        Ok(Self::from_rusqlite(conn))
    }

    fn from_rusqlite(conn: RusqliteConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
            closed: AtomicBool::new(false),
        }
    }

    /// Expand path to handle ~ (home directory) and relative paths
    fn expand_path(path: &str) -> Result<String> {
        // Handle special cases
        if path == ":memory:" || path.starts_with("file:") {
            return Ok(path.to_string());
        }

        // Expand ~ to home directory
        let expanded = if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                let home_path = std::path::PathBuf::from(home);
                home_path.join(rest).to_string_lossy().to_string()
            } else {
                return Err(TabscanError::Configuration(
                    "unable to determine HOME directory".to_string(),
                ));
            }
        } else if path.starts_with('~') {
            return Err(TabscanError::Configuration(
                "user-specific home directories (~user) are not supported".to_string(),
            ));
        } else {
            path.to_string()
        };

        // Convert to absolute path if relative
        let path_buf = std::path::PathBuf::from(&expanded);
        let result = if path_buf.is_relative() {
            std::env::current_dir()
                .map_err(TabscanError::Io)?
                .join(path_buf)
                .to_string_lossy()
                .to_string()
        } else {
            expanded
        };

        Ok(result)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TabscanError::Connection("connection is closed".to_string()));
        }
        Ok(())
    }

    /// Get database file information
    pub fn get_info(&self) -> Result<DatabaseFileInfo> {
        self.ensure_open()?;
        let conn = self.conn.lock();

        // File size is pages times page size
        let page_count: i64 = conn
            .query_row("PRAGMA page_count", [], |row| row.get(0))
            .map_err(|e| TabscanError::Query(e.to_string()))?;
        let page_size: i64 = conn
            .query_row("PRAGMA page_size", [], |row| row.get(0))
            .map_err(|e| TabscanError::Query(e.to_string()))?;
        let file_size = page_count * page_size;

        let encoding: String = conn
            .query_row("PRAGMA encoding", [], |row| row.get(0))
            .map_err(|e| TabscanError::Query(e.to_string()))?;

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .map_err(|e| TabscanError::Query(e.to_string()))?;

        let schema_version: i64 = conn
            .query_row("PRAGMA schema_version", [], |row| row.get(0))
            .map_err(|e| TabscanError::Query(e.to_string()))?;

        let user_version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(|e| TabscanError::Query(e.to_string()))?;

        Ok(DatabaseFileInfo {
            file_size_bytes: file_size,
            page_count: page_count as usize,
            page_size: page_size as usize,
            encoding,
            journal_mode,
            schema_version,
            user_version,
        })
    }

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE/DDL).
    ///
    /// Not part of the [`Connection`] surface, which inspection
    /// components use read-only. Owning callers use this to stage
    /// fixtures or apply local changes.
    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        let rusqlite_params = values_to_rusqlite(params);

        let rows_affected = conn
            .execute(sql, params_from_iter(rusqlite_params.iter()))
            .map_err(|e| TabscanError::Query(format!("failed to execute statement: {}", e)))?;

        tracing::debug!(affected_rows = rows_affected, "statement executed");
        Ok(rows_affected as u64)
    }

    /// Execute multiple SQL statements in a batch
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!("executing SQL batch");
        self.ensure_open()?;
        let conn = self.conn.lock();

        conn.execute_batch(sql)
            .map_err(|e| TabscanError::Query(format!("failed to execute batch: {}", e)))?;

        Ok(())
    }
}

/// Information about the SQLite database file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseFileInfo {
    pub file_size_bytes: i64,
    pub page_count: usize,
    pub page_size: usize,
    pub encoding: String,
    pub journal_mode: String,
    pub schema_version: i64,
    pub user_version: i64,
}

#[async_trait]
impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<RowSet> {
        let start_time = std::time::Instant::now();

        self.ensure_open()?;
        let conn = self.conn.lock();
        let rusqlite_params = values_to_rusqlite(params);

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| TabscanError::Query(format!("failed to prepare query: {}", e)))?;

        // stmt.columns() exposes the declared type from CREATE TABLE via
        // sqlite3_column_decltype; computed expressions have none and
        // fall back to DYNAMIC
        let column_count = stmt.column_count();
        let mut column_names: Vec<String> = Vec::with_capacity(column_count);
        let mut columns: Vec<ResultColumn> = Vec::with_capacity(column_count);

        let stmt_columns = stmt.columns();
        for col in stmt_columns.iter() {
            let name = col.name().to_string();
            let data_type = col.decl_type().unwrap_or("DYNAMIC").to_string();
            column_names.push(name.clone());
            columns.push(ResultColumn { name, data_type });
        }

        // Execute query and collect rows
        let mut rows = Vec::new();
        let mut query_rows = stmt
            .query(params_from_iter(rusqlite_params.iter()))
            .map_err(|e| TabscanError::Query(format!("failed to execute query: {}", e)))?;

        while let Some(row) = query_rows
            .next()
            .map_err(|e| TabscanError::Query(format!("failed to fetch row: {}", e)))?
        {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value = rusqlite_to_value(row, i)?;
                values.push(value);
            }
            rows.push(Row::new(column_names.clone(), values));
        }

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            row_count = rows.len(),
            elapsed_ms = elapsed_ms,
            "query executed"
        );
        Ok(RowSet { columns, rows })
    }

    /// Mark the connection closed. The underlying handle is released
    /// when the connection is dropped.
    async fn close(&self) -> Result<()> {
        tracing::info!("closing SQLite connection");
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn as_catalog(&self) -> Option<&dyn Catalog> {
        Some(self)
    }
}

#[async_trait]
impl Catalog for SqliteConnection {
    #[tracing::instrument(skip(self))]
    async fn table_names(&self) -> Result<Vec<String>> {
        tracing::debug!("listing tables from sqlite_master");
        let result = self
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
                &[],
            )
            .await?;

        let mut names = Vec::with_capacity(result.row_count());
        for row in &result.rows {
            let name = row.get(0).and_then(|v| v.as_str()).ok_or_else(|| {
                TabscanError::CatalogUnavailable(
                    "sqlite_master returned a non-text table name".to_string(),
                )
            })?;
            names.push(name.to_string());
        }

        tracing::debug!(table_count = names.len(), "tables listed");
        Ok(names)
    }

    #[tracing::instrument(skip(self))]
    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        tracing::trace!(table = %table, "fetching column information");
        // pragma_table_info is the table-valued form of PRAGMA
        // table_info and accepts a bound parameter, so the table name
        // never lands in the SQL text. An unknown table yields no rows.
        let result = self
            .query(
                "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?)",
                &[Value::String(table.to_string())],
            )
            .await?;

        let mut columns = Vec::with_capacity(result.row_count());
        for row in &result.rows {
            let ordinal = row
                .get(0)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| malformed(table, "missing or non-integer cid"))?;
            let name = row
                .get(1)
                .and_then(|v| v.as_str())
                .ok_or_else(|| malformed(table, "missing column name"))?
                .to_string();
            let data_type = row
                .get(2)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let not_null = row
                .get(3)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| malformed(table, "missing notnull flag"))?
                != 0;
            let default_value = row.get(4).and_then(|v| {
                if v.is_null() {
                    None
                } else {
                    Some(v.to_string())
                }
            });
            // pk is the 1-based position within the primary key, or 0
            let is_primary_key = row
                .get(5)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| malformed(table, "missing pk flag"))?
                > 0;

            if ordinal < 0 {
                return Err(malformed(table, "negative cid"));
            }

            columns.push(ColumnDescriptor {
                ordinal: ordinal as usize,
                name,
                data_type,
                not_null,
                default_value,
                is_primary_key,
            });
        }

        Ok(columns)
    }
}

fn malformed(table: &str, reason: &str) -> TabscanError {
    TabscanError::MalformedMetadata {
        table: table.to_string(),
        reason: reason.to_string(),
    }
}

/// Convert our Value types to rusqlite-compatible types
fn values_to_rusqlite(values: &[Value]) -> Vec<rusqlite::types::Value> {
    values.iter().map(value_to_rusqlite).collect()
}

fn value_to_rusqlite(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(b) => rusqlite::types::Value::Integer(if *b { 1 } else { 0 }),
        Value::Int64(i) => rusqlite::types::Value::Integer(*i),
        Value::Float64(f) => rusqlite::types::Value::Real(*f),
        Value::Decimal(d) => rusqlite::types::Value::Text(d.clone()),
        Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Bytes(b) => rusqlite::types::Value::Blob(b.clone()),
        Value::Date(d) => rusqlite::types::Value::Text(d.to_string()),
        Value::Time(t) => rusqlite::types::Value::Text(t.to_string()),
        Value::DateTime(dt) => rusqlite::types::Value::Text(dt.to_string()),
        Value::Json(j) => rusqlite::types::Value::Text(j.to_string()),
    }
}

/// Convert rusqlite row value to our Value type
fn rusqlite_to_value(row: &rusqlite::Row, idx: usize) -> Result<Value> {
    use rusqlite::types::ValueRef;

    let value_ref = row
        .get_ref(idx)
        .map_err(|e| TabscanError::Query(e.to_string()))?;

    let value = match value_ref {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => {
            // SQLite BLOBs might actually contain text data, so try to
            // decode as UTF-8 first and fall back to raw bytes
            match std::str::from_utf8(b) {
                Ok(s) => Value::String(s.to_string()),
                Err(_) => Value::Bytes(b.to_vec()),
            }
        }
    };

    Ok(value)
}
