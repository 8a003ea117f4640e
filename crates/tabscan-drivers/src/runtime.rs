//! Tokio runtime for callers that hold no runtime of their own
//!
//! The driver surface is async, but plenty of callers are plain
//! synchronous code: the CLI, scripts, tests for the blocking path.
//! This module hosts a shared Tokio runtime those callers can block
//! on.

use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Global Tokio runtime for database drivers
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or create the shared Tokio runtime for database drivers.
///
/// # Panics
///
/// Panics if the runtime cannot be created.
pub fn get_tokio_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("tabscan-driver-runtime")
            .build()
            .expect("Failed to create Tokio runtime for database drivers")
    })
}

/// Run a future to completion on the shared Tokio runtime.
///
/// This blocks the current thread until the future completes. Use it
/// to drive the async driver surface from synchronous code.
///
/// # Example
///
/// ```ignore
/// let tables = block_on_tokio(async {
///     tabscan_inspect::list_tables(conn.as_ref()).await
/// });
/// ```
pub fn block_on_tokio<F, T>(future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    get_tokio_runtime().block_on(future)
}
