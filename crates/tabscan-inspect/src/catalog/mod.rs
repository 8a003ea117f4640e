//! Catalog reading module
//!
//! Lists the tables a connection can see and describes their columns.

mod reader;

#[cfg(test)]
mod tests;

pub use reader::*;
