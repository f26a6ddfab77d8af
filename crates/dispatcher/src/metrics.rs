//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the dispatch core.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Successful deliveries (destination accepted)
    delivered_count: AtomicU64,
    /// Per-destination delivery failures
    failed_count: AtomicU64,
    /// Destinations skipped (self-loop / type mismatch / paused)
    skipped_count: AtomicU64,
    /// Dispatch passes aborted on unreadable registry state
    aborted_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered(&self, n: u64) {
        self.delivered_count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    pub fn inc_failed(&self, n: u64) {
        self.failed_count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn inc_skipped(&self, n: u64) {
        self.skipped_count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn aborted_count(&self) -> u64 {
        self.aborted_count.load(Ordering::Relaxed)
    }

    pub fn inc_aborted(&self) {
        self.aborted_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            delivered_count: self.delivered_count(),
            failed_count: self.failed_count(),
            skipped_count: self.skipped_count(),
            aborted_count: self.aborted_count(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub delivered_count: u64,
    pub failed_count: u64,
    pub skipped_count: u64,
    pub aborted_count: u64,
}
