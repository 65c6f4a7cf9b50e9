//! Key/value persistence backends.
//!
//! Every backend stores opaque strings under string keys.  Serialization is
//! the caller's business; a backend only moves blobs.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised by a [`StorageBackend`].
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// StorageBackend
// ─────────────────────────────────────────────────────────────────────────────

/// A string key/value medium.
pub trait StorageBackend {
    /// Read the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`.  Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InMemoryBackend
// ─────────────────────────────────────────────────────────────────────────────

/// Process-lifetime storage.  Used for tests and for session-scoped data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    entries: HashMap<String, String>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FileBackend
// ─────────────────────────────────────────────────────────────────────────────

/// One file per key inside a directory (`<dir>/<key>.json`).
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Use `dir` as the storage directory, creating it if necessary.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_set_get_remove() {
        let mut b = InMemoryBackend::new();
        assert_eq!(b.get("k").unwrap(), None);
        b.set("k", "v1").unwrap();
        b.set("k", "v2").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v2"));
        b.remove("k").unwrap();
        b.remove("k").unwrap();
        assert_eq!(b.get("k").unwrap(), None);
    }

    #[test]
    fn file_backend_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let mut b = FileBackend::open(dir.path()).unwrap();
        b.set("saborDeCasaMemories", "[]").unwrap();

        let reopened = FileBackend::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("saborDeCasaMemories").unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.path().join("saborDeCasaMemories.json").exists());
        assert!(!dir.path().join("saborDeCasaMemories.json.tmp").exists());
    }

    #[test]
    fn file_backend_missing_key_is_none() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let mut b = FileBackend::open(dir.path().join("nested")).unwrap();
        assert_eq!(b.get("absent").unwrap(), None);
        b.remove("absent").unwrap();
    }

    #[test]
    fn file_backend_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let mut b = FileBackend::open(dir.path()).unwrap();
        let err = b.set("../escape", "x").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(matches!(b.get("").unwrap_err(), StorageError::InvalidKey(_)));
    }

    #[test]
    fn boxed_backend_delegates() {
        let mut b: Box<dyn StorageBackend> = Box::new(InMemoryBackend::new());
        b.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
    }
}
