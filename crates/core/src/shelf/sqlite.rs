//! SQLite-backed blob store.
//!
//! Opens the database with WAL pragmas, runs migrations, and keeps each blob
//! as one row of a key/value table.

use std::path::Path;
use std::sync::Mutex;

use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{Connection, OptionalExtension};

use super::blob::BlobStore;
use super::migrations;
use crate::Error;

/// Row key the shelf blob is stored under.
pub const SHELF_BLOB_KEY: &str = "book_shelves";

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Blob store over one row of a SQLite `blobs` table.
///
/// The connection sits behind a mutex so the store can be shared across
/// threads; every call is a single short statement.
#[derive(Debug)]
pub struct SqliteBlobStore {
    conn: Mutex<Connection>,
    key: String,
}

impl SqliteBlobStore {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas, and runs any
    /// pending migrations.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self, Error> {
        Self::init(Connection::open(path)?, key.into())
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory(key: impl Into<String>) -> Result<Self, Error> {
        Self::init(Connection::open_in_memory()?, key.into())
    }

    fn init(conn: Connection, key: String) -> Result<Self, Error> {
        conn.execute_batch(PRAGMAS)?;
        migrations::run(&conn)?;
        Ok(Self { conn: Mutex::new(conn), key })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.conn.lock().map_err(|_| Error::Storage("sqlite connection lock poisoned".into()))
    }
}

impl BlobStore for SqliteBlobStore {
    fn save(&self, blob: &str) -> Result<(), Error> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![self.key, blob, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, Error> {
        let conn = self.lock()?;
        let blob = conn
            .query_row("SELECT value FROM blobs WHERE key = ?1", params![self.key], |row| row.get(0))
            .optional()?;
        Ok(blob)
    }
}
