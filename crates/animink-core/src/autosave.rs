//! Host-side autosave debouncing.
//!
//! The core only emits autosave requests. This scheduler turns a stream of
//! requests into occasional saves: the host calls [`AutosaveScheduler::should_save`]
//! on its own timer and [`AutosaveScheduler::mark_saved`] after persisting.

use crate::config::DEFAULT_AUTOSAVE_INTERVAL_SECS;
use std::time::{Duration, Instant};

/// Tracks pending autosave requests and when the last save happened.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    /// Requests received since the last save.
    pending_requests: u64,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS))
    }
}

impl AutosaveScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_save: None,
            dirty: false,
            pending_requests: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Record an autosave request.
    pub fn request(&mut self) {
        self.dirty = true;
        self.pending_requests += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn pending_requests(&self) -> u64 {
        self.pending_requests
    }

    /// Check if there are unsaved changes and the interval has elapsed.
    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    fn should_save_at(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => now.duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Record that the host persisted the project.
    pub fn mark_saved(&mut self) {
        self.last_save = Some(Instant::now());
        self.dirty = false;
        self.pending_requests = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_scheduler_does_not_save() {
        let scheduler = AutosaveScheduler::default();
        assert!(!scheduler.is_dirty());
        assert!(!scheduler.should_save());
    }

    #[test]
    fn test_first_request_saves_immediately() {
        let mut scheduler = AutosaveScheduler::default();
        scheduler.request();
        scheduler.request();
        assert!(scheduler.should_save());
        assert_eq!(scheduler.pending_requests(), 2);

        scheduler.mark_saved();
        assert!(!scheduler.is_dirty());
        assert_eq!(scheduler.pending_requests(), 0);
    }

    #[test]
    fn test_requests_within_interval_wait() {
        let mut scheduler = AutosaveScheduler::new(Duration::from_secs(60));
        scheduler.request();
        scheduler.mark_saved();
        scheduler.request();

        let last = scheduler.last_save.unwrap();
        assert!(!scheduler.should_save_at(last + Duration::from_secs(10)));
        assert!(scheduler.should_save_at(last + Duration::from_secs(60)));
    }
}
