//! Driver registry for managing available database drivers

use std::collections::HashMap;
use std::sync::Arc;
use tabscan_core::Driver;

/// Registry of available database drivers
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            drivers: HashMap::new(),
        }
    }

    /// Create a registry with all built-in drivers registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        #[cfg(feature = "sqlite")]
        registry.register(Arc::new(crate::sqlite::SqliteDriver::new()));

        registry
    }

    /// Register a new driver
    pub fn register(&mut self, driver: Arc<dyn Driver>) {
        let name = driver.name().to_string();
        tracing::info!(driver = %name, "registering database driver");
        self.drivers.insert(name, driver);
    }

    /// Get a driver by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        let driver = self.drivers.get(name).cloned();
        if driver.is_none() {
            tracing::warn!(driver = %name, "driver not found in registry");
        }
        driver
    }

    /// List all registered driver names
    pub fn list(&self) -> Vec<&str> {
        self.drivers.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a driver is registered
    pub fn has(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
