//! Ingestion metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the ingestion gate.
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Arrivals admitted and stored
    stored: AtomicU64,

    /// Arrivals dropped inside the rate window
    rate_limited: AtomicU64,

    /// Arrivals rejected (decode or store failure)
    rejected: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an admitted arrival
    pub fn record_stored(&self) {
        self.stored.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rate-limited arrival
    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected arrival
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            stored: self.stored.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub stored: u64,
    pub rate_limited: u64,
    pub rejected: u64,
}
