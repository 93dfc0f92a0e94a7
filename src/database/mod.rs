//! Tabdeck persistence layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key-value store that holds panel UI state across restarts.
//!
//! # Usage
//!
//! ```no_run
//! use tabdeck::database::{Database, SqliteStore};
//!
//! // Open a persistent database
//! let db = Database::open("tabdeck.db").expect("failed to open database");
//! let store = SqliteStore::new(db);
//!
//! // Or use an in-memory database for testing
//! let store = SqliteStore::new(Database::open_in_memory().expect("failed to open in-memory database"));
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::{KeyValueStore, SqliteStore};
