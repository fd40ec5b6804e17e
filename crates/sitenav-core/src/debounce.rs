#![forbid(unsafe_code)]

//! Host-clocked debounce.
//!
//! Every [`Debouncer::trigger`] restarts the quiet window. The host schedules
//! a timer for the returned delay and calls [`Debouncer::poll`] when it
//! fires; polls that arrive before the latest deadline are no-ops, so stale
//! timers from earlier triggers are harmless.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record a triggering call at `now` and restart the window.
    ///
    /// Returns how long the host should wait before polling.
    pub fn trigger(&mut self, now: Duration) -> Duration {
        self.deadline = Some(now.saturating_add(self.delay));
        self.delay
    }

    /// Returns `true` exactly once per quiet window, when `now` has reached
    /// the most recent deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending invocation is due, if one is pending.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }

    /// Drop any pending invocation.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
