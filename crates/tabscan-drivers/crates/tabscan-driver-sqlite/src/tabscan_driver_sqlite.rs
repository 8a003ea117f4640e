//! SQLite database driver implementation

mod connection;
mod driver;

pub use connection::{DatabaseFileInfo, SqliteConnection};
pub use driver::SqliteDriver;
