//! SQLite key/value backend.
//!
//! # Storage layout
//!
//! | column | type | description                 |
//! |--------|------|-----------------------------|
//! | key    | TEXT | primary key                 |
//! | value  | TEXT | serialized blob             |
//!
//! # Example
//!
//! ```rust
//! use sabor_memory::{SqliteBackend, StorageBackend};
//!
//! let mut backend = SqliteBackend::open_in_memory().unwrap();
//! backend.set("saborDeCasaMemories", "[]").unwrap();
//! assert_eq!(backend.get("saborDeCasaMemories").unwrap().as_deref(), Some("[]"));
//! ```

use rusqlite::{params, Connection, OptionalExtension};

use crate::backend::{StorageBackend, StorageError};

/// [`StorageBackend`] persisted in a single `kv_store` table.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (or create) a persistent SQLite database at `path`.
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let backend = Self { conn };
        backend.init_schema()?;
        Ok(backend)
    }

    /// Open a temporary in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let backend = Self { conn };
        backend.init_schema()?;
        Ok(backend)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key   TEXT NOT NULL PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl StorageBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_returns_none() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        assert_eq!(backend.get("nothing").unwrap(), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        backend.set("k", "first").unwrap();
        backend.set("k", "second").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn remove_deletes_and_tolerates_absence() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        backend.set("k", "v").unwrap();
        backend.remove("k").unwrap();
        backend.remove("k").unwrap();
        assert_eq!(backend.get("k").unwrap(), None);
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("sabor.db");
        let path = path.to_string_lossy();
        {
            let mut backend = SqliteBackend::open(&path).unwrap();
            backend.set("saborDeCasaMemories", "[1]").unwrap();
        }
        let backend = SqliteBackend::open(&path).unwrap();
        assert_eq!(
            backend.get("saborDeCasaMemories").unwrap().as_deref(),
            Some("[1]")
        );
    }
}
