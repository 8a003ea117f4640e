//! Tabscan Inspect - Catalog reading and table content preview
//!
//! This crate provides the two inspection passes tabscan runs against
//! an open connection:
//! - Listing tables and describing their columns via the store catalog
//! - Previewing the leading rows of a batch of tables
//!
//! Both passes borrow a caller-owned [`tabscan_core::Connection`] and
//! leave its lifecycle alone.

pub mod catalog;
pub mod preview;

pub use catalog::*;
pub use preview::*;
