//! [`ShareFlow`] – submitting a memory and showing the thank-you view.
//!
//! ```text
//! submit ──► validate ──► wait save_delay ──► MemoryStore::append ──► SessionHandoff::put
//!               │ missing fields
//!               └──► MemoryError::Validation (immediately, nothing written)
//!
//! confirmation ──► SessionHandoff::take ──► Confirmation | None
//! ```

use std::time::Duration;

use sabor_memory::{Clock, MemoryError, MemoryStore, SessionHandoff, StorageBackend, SystemClock};
use sabor_types::{format_category, MemoryRecord, MemorySubmission};
use tracing::{info, warn};

/// What the thank-you view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub name: String,
    pub recipe: String,
    pub category: String,
    pub memory: String,
}

impl From<MemorySubmission> for Confirmation {
    fn from(submission: MemorySubmission) -> Self {
        Self {
            category: format_category(&submission.category),
            name: submission.name,
            recipe: submission.recipe,
            memory: submission.memory,
        }
    }
}

pub struct ShareFlow<L, S, C = SystemClock> {
    store: MemoryStore<L, C>,
    handoff: SessionHandoff<S>,
    save_delay: Duration,
}

impl<L, S, C> ShareFlow<L, S, C>
where
    L: StorageBackend,
    S: StorageBackend,
    C: Clock,
{
    pub fn new(store: MemoryStore<L, C>, handoff: SessionHandoff<S>, save_delay: Duration) -> Self {
        Self {
            store,
            handoff,
            save_delay,
        }
    }

    pub fn store(&self) -> &MemoryStore<L, C> {
        &self.store
    }

    /// Validate, pause for `save_delay`, then persist `submission`.
    pub async fn submit(&mut self, submission: &MemorySubmission) -> Result<MemoryRecord, MemoryError> {
        let missing = submission.missing_fields();
        if !missing.is_empty() {
            return Err(MemoryError::Validation(missing));
        }

        tokio::time::sleep(self.save_delay).await;
        let record = self.store.append(submission)?;
        info!(id = record.id, recipe = %record.recipe_name, "memory shared");

        // The record is already saved; a lost handoff only skips the
        // thank-you details.
        if let Err(e) = self.handoff.put(&submission.trimmed()) {
            warn!(error = %e, "could not store the shared memory for confirmation");
        }
        Ok(record)
    }

    /// Consume the last submission for the thank-you view.
    ///
    /// `None` means nothing was shared in this session (or it was already
    /// shown); the caller should send the visitor back to the form.
    pub fn confirmation(&mut self) -> Option<Confirmation> {
        self.handoff.take().map(Confirmation::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use sabor_memory::InMemoryBackend;
    use sabor_types::MemoryField;

    fn fixed_clock() -> impl Fn() -> DateTime<Utc> {
        || Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn flow() -> ShareFlow<InMemoryBackend, InMemoryBackend, impl Fn() -> DateTime<Utc>> {
        ShareFlow::new(
            MemoryStore::with_clock(InMemoryBackend::new(), fixed_clock()),
            SessionHandoff::new(InMemoryBackend::new()),
            Duration::from_millis(1500),
        )
    }

    fn flan() -> MemorySubmission {
        MemorySubmission {
            name: " Ana ".into(),
            recipe: "Flan".into(),
            memory: "Grandma's recipe".into(),
            category: "dessert".into(),
            ingredients: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn submit_waits_then_saves_and_hands_off() {
        let mut flow = flow();
        let started = tokio::time::Instant::now();
        let record = flow.submit(&flan()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(record.user_name, "Ana");
        assert_eq!(flow.store().list()[0].recipe_name, "Flan");

        let thanks = flow.confirmation().unwrap();
        assert_eq!(thanks.name, "Ana");
        assert_eq!(thanks.category, "Dessert");
        assert!(flow.confirmation().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_submission_fails_fast_without_writing() {
        let mut flow = flow();
        let started = tokio::time::Instant::now();
        let err = flow
            .submit(&MemorySubmission {
                name: "  ".into(),
                category: String::new(),
                ..flan()
            })
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_millis(1));
        match err {
            MemoryError::Validation(fields) => {
                assert_eq!(fields, vec![MemoryField::Name, MemoryField::Category]);
            }
            other => panic!("expected validation error, got {other}"),
        }
        assert!(flow.store().is_empty());
        assert!(flow.confirmation().is_none());
    }
}
