//! Error types for tabscan operations

use thiserror::Error;

/// Core error type shared by every tabscan crate
#[derive(Error, Debug)]
pub enum TabscanError {
    /// The handle is closed, never opened properly, or the store
    /// behind it is unreachable.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store exposes no usable catalog of its own tables.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A preview named a table the store's catalog does not list.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// The store reported column metadata in a shape that cannot be
    /// represented, such as ordinal positions with gaps or repeats.
    #[error("malformed metadata for table {table}: {reason}")]
    MalformedMetadata { table: String, reason: String },

    #[error("query error: {0}")]
    Query(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tabscan operations
pub type Result<T> = std::result::Result<T, TabscanError>;
