//! Memory store.
//!
//! Keeps every shared memory in one JSON array under [`MEMORIES_KEY`], newest
//! first.  There is no index and no dedup: an append reads the whole array,
//! prepends the new record and writes the whole array back.
//!
//! Reads never fail.  Absent, unreadable or unparsable storage is reported as
//! an empty collection so a damaged blob cannot take the share view down.
//!
//! # Example
//!
//! ```rust
//! use sabor_memory::{InMemoryBackend, MemoryStore};
//! use sabor_types::MemorySubmission;
//!
//! let mut store = MemoryStore::new(InMemoryBackend::new());
//! let record = store
//!     .append(&MemorySubmission {
//!         name: "Ana".into(),
//!         recipe: "Flan".into(),
//!         memory: "Grandma's recipe".into(),
//!         category: "dessert".into(),
//!         ingredients: String::new(),
//!     })
//!     .unwrap();
//!
//! assert_eq!(store.list()[0].recipe_name, "Flan");
//! assert_eq!(store.get_by_id(record.id).unwrap().user_name, "Ana");
//! ```

use chrono::{DateTime, Local, Utc};
use sabor_types::{format_display_date, MemoryField, MemoryRecord, MemorySubmission, SaborError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{StorageBackend, StorageError};

/// Storage key holding the serialized memory collection.
pub const MEMORIES_KEY: &str = "saborDeCasaMemories";

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can arise when writing memories.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// One or more required fields were blank.  Nothing was written.
    #[error("Missing required fields: {0:?}")]
    Validation(Vec<MemoryField>),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<MemoryError> for SaborError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::Validation(fields) => SaborError::InvalidSubmission(fields),
            other => SaborError::Storage(other.to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock
// ─────────────────────────────────────────────────────────────────────────────

/// Source of "now" for record identifiers and dates.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ─────────────────────────────────────────────────────────────────────────────

/// Append-only, most-recent-first collection of [`MemoryRecord`]s.
pub struct MemoryStore<B, C = SystemClock> {
    backend: B,
    clock: C,
}

impl<B: StorageBackend> MemoryStore<B> {
    /// Build a store over `backend` using the system clock.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clock: SystemClock,
        }
    }
}

impl<B: StorageBackend, C: Clock> MemoryStore<B, C> {
    /// Build a store over `backend` with an explicit time source.
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Validate `submission`, prepend it as a new record and persist the
    /// whole collection.
    ///
    /// # Errors
    ///
    /// [`MemoryError::Validation`] lists every blank required field; storage
    /// is left untouched in that case.  [`MemoryError::Storage`] is returned
    /// when the backend rejects the write.
    pub fn append(&mut self, submission: &MemorySubmission) -> Result<MemoryRecord, MemoryError> {
        let missing = submission.missing_fields();
        if !missing.is_empty() {
            warn!(fields = ?missing, "memory submission rejected");
            return Err(MemoryError::Validation(missing));
        }
        let submission = submission.trimmed();

        let mut records = self.list();
        let now = self.clock.now();
        let mut id = now.timestamp_millis();
        // Keep ids strictly descending even if the clock stalls or steps back.
        if let Some(newest) = records.first()
            && id <= newest.timestamp
        {
            id = newest.timestamp + 1;
        }

        let record = MemoryRecord {
            id,
            user_name: submission.name,
            recipe_name: submission.recipe,
            memory: submission.memory,
            category: submission.category,
            ingredients: Some(submission.ingredients).filter(|s| !s.is_empty()),
            date: format_display_date(&now.with_timezone(&Local)),
            timestamp: id,
        };

        records.insert(0, record.clone());
        let blob = serde_json::to_string(&records)?;
        self.backend.set(MEMORIES_KEY, &blob)?;
        info!(id = record.id, recipe = %record.recipe_name, total = records.len(), "memory saved");
        Ok(record)
    }

    /// All stored records, newest first.  Never fails.
    pub fn list(&self) -> Vec<MemoryRecord> {
        let raw = match self.backend.get(MEMORIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "memory storage unreadable; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<MemoryRecord>>(&raw) {
            Ok(records) => {
                debug!(count = records.len(), "loaded memories");
                records
            }
            Err(e) => {
                warn!(error = %e, "memory storage corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    /// Linear lookup by identifier.
    pub fn get_by_id(&self, id: i64) -> Option<MemoryRecord> {
        self.list().into_iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
