//! One-shot handoff of the last submitted memory.
//!
//! The share flow [`put`][SessionHandoff::put]s the submission right after it
//! is saved; the confirmation view [`take`][SessionHandoff::take]s it, which
//! also deletes it, so a second visit finds nothing and sends the visitor
//! back to the form.

use sabor_types::MemorySubmission;
use tracing::warn;

use crate::backend::StorageBackend;
use crate::store::MemoryError;

/// Session-scoped storage key holding the last submission.
pub const HANDOFF_KEY: &str = "lastSharedMemory";

/// Single-slot, consume-on-read holder for the last [`MemorySubmission`].
pub struct SessionHandoff<B> {
    backend: B,
}

impl<B: StorageBackend> SessionHandoff<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Replace the held submission.
    pub fn put(&mut self, submission: &MemorySubmission) -> Result<(), MemoryError> {
        let blob = serde_json::to_string(submission)?;
        self.backend.set(HANDOFF_KEY, &blob)?;
        Ok(())
    }

    /// Return the held submission and clear the slot.
    ///
    /// Unparsable content is discarded and reported as `None`.
    pub fn take(&mut self) -> Option<MemorySubmission> {
        let raw = match self.backend.get(HANDOFF_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "handoff storage unreadable");
                return None;
            }
        };
        if let Err(e) = self.backend.remove(HANDOFF_KEY) {
            warn!(error = %e, "failed to clear handoff slot");
        }
        match serde_json::from_str(&raw) {
            Ok(submission) => Some(submission),
            Err(e) => {
                warn!(error = %e, "handoff content corrupt; discarded");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    fn submission() -> MemorySubmission {
        MemorySubmission {
            name: "Ana".into(),
            recipe: "Flan".into(),
            memory: "Grandma's recipe".into(),
            category: "dessert".into(),
            ingredients: String::new(),
        }
    }

    #[test]
    fn take_returns_once() {
        let mut handoff = SessionHandoff::new(InMemoryBackend::new());
        handoff.put(&submission()).unwrap();
        assert_eq!(handoff.take(), Some(submission()));
        assert_eq!(handoff.take(), None);
    }

    #[test]
    fn take_on_empty_slot_is_none() {
        let mut handoff = SessionHandoff::new(InMemoryBackend::new());
        assert_eq!(handoff.take(), None);
    }

    #[test]
    fn corrupt_content_is_discarded() {
        let mut backend = InMemoryBackend::new();
        backend.set(HANDOFF_KEY, "not json").unwrap();
        let mut handoff = SessionHandoff::new(backend);
        assert_eq!(handoff.take(), None);
        assert_eq!(handoff.backend.get(HANDOFF_KEY).unwrap(), None);
    }

    #[test]
    fn put_replaces_previous_submission() {
        let mut handoff = SessionHandoff::new(InMemoryBackend::new());
        handoff.put(&submission()).unwrap();
        let mut second = submission();
        second.recipe = "Churros".into();
        handoff.put(&second).unwrap();
        assert_eq!(handoff.take().unwrap().recipe, "Churros");
    }

    #[test]
    fn stored_shape_matches_form_fields() {
        let mut handoff = SessionHandoff::new(InMemoryBackend::new());
        handoff.put(&submission()).unwrap();
        let raw = handoff.backend.get(HANDOFF_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["memory"], "Grandma's recipe");
    }
}
