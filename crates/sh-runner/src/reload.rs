//! Debounced reload scheduling
//!
//! Change notifications mark the registry stale and push a single deadline
//! back; the reload happens once the deadline passes without further
//! events. Time is passed in explicitly so the state machine can be
//! driven by the watcher loop and by tests alike.

use std::time::Duration;

use tokio::time::Instant;

/// Quiet period after the last change before reloading
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct ReloadScheduler {
    debounce: Duration,
    deadline: Option<Instant>,
    stale: bool,
}

impl ReloadScheduler {
    /// A scheduler whose registry has never been loaded
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
            stale: true,
        }
    }

    /// Record a change notification at `now`
    pub fn notify(&mut self, now: Instant) {
        self.stale = true;
        self.deadline = Some(now + self.debounce);
    }

    /// Mark stale without scheduling a timed reload
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the debounce deadline has passed
    pub fn due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Consume the deadline if it has passed
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn mark_fresh(&mut self) {
        self.stale = false;
    }
}

impl Default for ReloadScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
