//! Process-wide request metrics.
//!
//! Created once at startup and shared with middleware through an `Arc`.
//! Every update is a single atomic operation, so concurrent requests never
//! lose increments.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Request counter plus latency aggregates.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    requests: AtomicU64,
    timed: AtomicU64,
    elapsed_nanos: AtomicU64,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one request and returns the total including it.
    pub fn increment(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Zeroes the request counter and returns what it held.
    pub fn reset(&self) -> u64 {
        self.requests.swap(0, Ordering::Relaxed)
    }

    /// Adds one latency observation.
    pub fn record_elapsed(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.timed.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of latency observations recorded.
    pub fn timed(&self) -> u64 {
        self.timed.load(Ordering::Relaxed)
    }

    /// Sum of every recorded latency.
    pub fn total_elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::Relaxed))
    }
}
