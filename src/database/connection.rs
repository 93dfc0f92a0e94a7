//! SQLite connection ownership for Tabdeck.
//!
//! [`Database`] wraps a `rusqlite::Connection` and brings the schema up to
//! date every time a connection is opened.

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::migrations;
use crate::platform;

/// File name of the UI state database inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "tabdeck.db";

/// Owned SQLite connection with migrations applied.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path` and runs migrations.
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the file cannot be opened or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a throwaway in-memory database, mainly for tests.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if a migration fails.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// Default location: `<data dir>/tabdeck.db`.
    pub fn default_path() -> PathBuf {
        platform::get_data_dir().join(DATABASE_FILE_NAME)
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
