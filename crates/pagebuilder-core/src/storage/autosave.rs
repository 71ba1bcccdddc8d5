//! Debounced auto-save.
//!
//! The manager holds at most one pending deadline. Every change to the
//! serialized document pushes the deadline back; once the document is
//! clean again the deadline is dropped.

use crate::config::EditorConfig;
use crate::storage::BlobStore;
use crate::store::EditorStore;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default debounce delay in milliseconds.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 800;

/// Schedules `save_now` after edits settle.
///
/// Time is passed in explicitly; the host drives it from a timer or frame
/// loop. Dropping the manager drops any pending save with it.
#[derive(Debug, Clone)]
pub struct AutoSaveManager {
    /// Quiet period after the last change before saving.
    delay: Duration,
    /// When the pending save fires, if one is armed.
    deadline: Option<Instant>,
    /// Serialization seen on the last `observe` call.
    observed: Option<String>,
}

impl Default for AutoSaveManager {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS))
    }
}

impl AutoSaveManager {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            observed: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.autosave_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop the pending save, if any.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            log::debug!("Auto-save cancelled");
        }
    }

    /// Look at the store after a change.
    ///
    /// Arms (or re-arms) the deadline when the serialized document changed
    /// and is dirty. Cancels when the document is clean. An unchanged
    /// serialization leaves the timer alone, so a failed save is not
    /// retried until the next edit.
    pub fn observe<S: BlobStore>(&mut self, store: &EditorStore<S>, now: Instant) {
        let serialized = store.compute_serialized();
        if serialized == store.last_saved() {
            self.cancel();
        } else if self.observed.as_deref() != Some(serialized.as_str()) {
            self.deadline = Some(now + self.delay);
            log::debug!("Auto-save armed for {:?}", self.delay);
        }
        self.observed = Some(serialized);
    }

    /// Fire the pending save if its deadline has passed.
    ///
    /// Dirtiness is checked again at fire time. Returns true if a save
    /// was written.
    pub fn tick<S: BlobStore>(&mut self, store: &mut EditorStore<S>, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }
        self.deadline = None;
        if !store.is_dirty() {
            return false;
        }
        store.save_now()
    }
}
