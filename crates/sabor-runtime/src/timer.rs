//! [`TimerSet`] – named, cancelable delayed callbacks.
//!
//! Each timer is a spawned Tokio task that sleeps and then runs its callback.
//! Scheduling a name that is already pending replaces the old timer, and
//! dropping the set aborts everything still waiting, so nothing fires after
//! its owner is gone.
//!
//! Must be used from inside a Tokio runtime.

use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Default)]
pub struct TimerSet {
    timers: HashMap<String, JoinHandle<()>>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` after `delay` unless canceled first.
    pub fn schedule<F>(&mut self, name: impl Into<String>, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let name = name.into();
        self.timers.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = self.timers.remove(&name) {
            previous.abort();
            debug!(timer = %name, "replaced pending timer");
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        self.timers.insert(name, handle);
    }

    /// Cancel one timer.  Returns `true` if it had not fired yet.
    pub fn cancel(&mut self, name: &str) -> bool {
        match self.timers.remove(name) {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                if pending {
                    debug!(timer = %name, "canceled timer");
                }
                pending
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (name, handle) in self.timers.drain() {
            if !handle.is_finished() {
                debug!(timer = %name, "canceled timer");
            }
            handle.abort();
        }
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.timers
            .get(name)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of timers that have not fired yet.
    pub fn pending_count(&self) -> usize {
        self.timers.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
