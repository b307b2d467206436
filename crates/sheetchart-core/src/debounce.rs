//! Trailing-edge coalescing of rapid updates.

use std::time::{Duration, Instant};

/// Keeps only the latest pushed value until the window has passed without a new push.
///
/// Time is passed in explicitly so hosts can drive it from their own event loop (and tests can
/// drive it deterministically).
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records `value` as the latest state. A zero window releases it immediately.
    pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
        if self.window.is_zero() {
            self.pending = None;
            return Some(value);
        }
        self.pending = Some((value, now));
        None
    }

    /// Releases the pending value once the window has elapsed since the last push.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.window);
        if ready { self.flush() } else { None }
    }

    /// Releases the pending value regardless of the window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
