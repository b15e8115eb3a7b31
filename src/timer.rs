//! Cancellable timers polled from the event loop.
//!
//! Dropping a timer is cancelling it: once the owner sets its `Option` to
//! `None` nothing can fire, even if a tick for it was already due.

use std::time::{Duration, Instant};

/// Repeating timer with a fixed period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    /// First fires one `period` after `start`.
    pub fn new(start: Instant, period: Duration) -> Self {
        Self {
            period,
            next: start + period,
        }
    }

    /// Number of periods elapsed up to `now` since the last poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        if self.period.is_zero() {
            return fired;
        }
        while now >= self.next {
            fired += 1;
            self.next += self.period;
        }
        fired
    }
}

/// One-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { at: now + delay }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.at
    }
}
