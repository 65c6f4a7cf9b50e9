//! `sabor-memory` – client-local persistence for shared memories.
//!
//! # Modules
//!
//! - [`backend`] – the [`StorageBackend`][backend::StorageBackend] trait: a
//!   string key/value medium standing in for browser storage, with an
//!   in-memory implementation for tests and session data and a JSON-file
//!   implementation for durable local data.
//! - [`sqlite`] – [`SqliteBackend`][sqlite::SqliteBackend]: the same contract
//!   on top of a single SQLite table.
//! - [`store`] – [`MemoryStore`][store::MemoryStore]: validates submissions,
//!   prepends records and reads the collection back most-recent-first.
//! - [`handoff`] – [`SessionHandoff`][handoff::SessionHandoff]: the one-shot
//!   "last submitted memory" slot read by the confirmation view.

pub mod backend;
pub mod handoff;
pub mod sqlite;
pub mod store;

pub use backend::{FileBackend, InMemoryBackend, StorageBackend, StorageError};
pub use handoff::{SessionHandoff, HANDOFF_KEY};
pub use sqlite::SqliteBackend;
pub use store::{Clock, MemoryError, MemoryStore, SystemClock, MEMORIES_KEY};
