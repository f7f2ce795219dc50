//! SQLite persistence for synced wellness data

pub mod models;
pub mod schema;
pub mod store;

use std::path::Path;

use rusqlite::Connection;

use crate::error::{Result, SyncError};

pub use store::PersistReport;

/// Handle to the wellness database.
///
/// Constructed and owned by the caller for the duration of one run;
/// there is no process-wide connection singleton.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| SyncError::Database(format!("Failed to open database: {}", e)))?;
        Self::init(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SyncError::Database(format!("Failed to open in-memory database: {}", e)))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| SyncError::Database(format!("Failed to enable foreign keys: {}", e)))?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Direct access for read-side queries (status reporting, tests)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
