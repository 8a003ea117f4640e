//! Tabscan Core - Core abstractions and traits for schema inspection
//!
//! This crate provides the fundamental traits and types that all other
//! tabscan crates depend on. It defines:
//!
//! - `Driver` - Trait for database driver implementations
//! - `Connection` - Trait for open database handles
//! - `Catalog` - Trait for table and column introspection
//! - Common types like `Value`, `Row`, `RowSet`, `ColumnDescriptor`

mod connection;
mod driver;
mod error;
mod schema;
mod types;

pub use connection::*;
pub use driver::*;
pub use error::*;
pub use schema::*;
pub use types::*;
