//! Table content preview module
//!
//! Fetches the leading rows of a batch of tables in one pass.

mod previewer;


pub use previewer::*;
