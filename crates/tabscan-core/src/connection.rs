//! Connection trait

use crate::{Catalog, Result, RowSet, Value};
use async_trait::async_trait;

/// An open handle to a database
///
/// Handles are opened and owned by the caller; the inspection
/// components borrow one for the duration of a call and never open,
/// reconfigure, or close it. A handle serializes its own statement
/// execution, so concurrent callers take turns rather than corrupt
/// state; callers wanting parallel per-table work open one handle per
/// in-flight query.
#[async_trait]
pub trait Connection: Send + Sync + std::fmt::Debug {
    /// Get the driver name (e.g., "sqlite")
    fn driver_name(&self) -> &str;

    /// Execute a read query and collect the full result set.
    ///
    /// Runs to completion before returning; there is no cancellation
    /// and no timeout at this layer. A query against a closed handle
    /// fails with [`crate::TabscanError::Connection`].
    async fn query(&self, sql: &str, params: &[Value]) -> Result<RowSet>;

    /// Close the connection. Later queries fail with a connection
    /// error. Owning callers close; borrowing components never do.
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;

    /// Get the catalog introspection interface if supported
    fn as_catalog(&self) -> Option<&dyn Catalog> {
        None
    }
}
