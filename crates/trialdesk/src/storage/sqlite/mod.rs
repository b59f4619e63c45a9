//! SQLite storage backend.
//!
//! Every collection is a table of JSON documents with the id and timestamps
//! lifted into columns. Access goes through `tokio-rusqlite`, which runs all
//! statements on one background connection thread.

mod error;
mod repository;
mod schema;

pub use repository::{SqliteRepository, SqliteStore};
