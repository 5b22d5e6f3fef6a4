use std::path::PathBuf;

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

/// Current schema version, tracked via `PRAGMA user_version`.
const DB_VERSION: i32 = 1;

/// Schema for the store collections. Additive only: tables are created
/// when missing and never dropped on upgrade.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pending_stories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    photo BLOB NOT NULL,
    lat REAL,
    lon REAL,
    token TEXT NOT NULL,
    created_at TEXT NOT NULL,
    synced INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS favorite_stories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    photo_url TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    lat REAL,
    lon REAL,
    favorited_at TEXT NOT NULL
);
"#;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Local store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Handle to the one fixed database file. Cheap to clone; every
/// operation opens its own short-lived connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Open a connection for one logical operation, creating the file and
    /// migrating the schema on demand.
    pub(crate) fn open(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        let conn = Connection::open(&self.path)?;
        Self::migrate(&conn)?;
        Ok(conn)
    }

    fn migrate(conn: &Connection) -> Result<(), StoreError> {
        let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        conn.execute_batch(SCHEMA)?;
        if version < DB_VERSION {
            conn.pragma_update(None, "user_version", DB_VERSION)?;
            debug!(from = version, to = DB_VERSION, "Store schema upgraded");
        }
        Ok(())
    }
}
