//! Database driver trait definition

use crate::{Connection, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Core driver trait that all database drivers must implement
#[async_trait]
pub trait Driver: Send + Sync {
    /// Unique identifier for this driver (e.g., "sqlite")
    fn name(&self) -> &'static str;

    /// Human-readable name (e.g., "SQLite")
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Open a new connection to the given data source
    async fn connect(&self, source: &DataSource) -> Result<Arc<dyn Connection>>;

    /// Open a connection, probe it with a trivial query, and drop it
    async fn test_connection(&self, source: &DataSource) -> Result<()>;
}

/// Where a driver finds its database
#[derive(Debug, Clone)]
pub struct DataSource {
    /// Driver ID (e.g., "sqlite")
    pub driver: String,
    /// Database name or file path
    pub database: Option<String>,
    /// Additional driver-specific parameters
    pub params: HashMap<String, String>,
}

impl DataSource {
    /// Create a new data source for a driver
    pub fn new(driver: &str) -> Self {
        Self {
            driver: driver.to_string(),
            database: None,
            params: HashMap::new(),
        }
    }

    /// Create a SQLite data source for a database file path
    pub fn sqlite(database_path: &str) -> Self {
        let mut source = Self::new("sqlite");
        source.database = Some(database_path.to_string());
        source
    }

    /// Set a driver parameter
    pub fn with_param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        let val = value.into();
        let str_val = match val {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        self.params.insert(key.to_string(), str_val);
        self
    }

    /// Get a string parameter, checking params first, then known fields
    pub fn get_string(&self, key: &str) -> Option<String> {
        if let Some(val) = self.params.get(key) {
            return Some(val.clone());
        }
        match key {
            "database" | "path" => self.database.clone(),
            _ => None,
        }
    }
}
