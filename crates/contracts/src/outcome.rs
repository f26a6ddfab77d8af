//! Dispatch outcomes - failures are values, not exceptions
//!
//! Nothing from the dispatch core raises out to the scheduler; every path
//! concludes in one of these structured results.

use serde::{Deserialize, Serialize};

use crate::SensorType;

/// How a single-record dispatch pass concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Registry state unreadable; nothing was sent (fail-closed).
    Aborted,
    /// Destinations exist but all are inactive; nothing was sent.
    Paused,
    /// Factory state: the legacy static destination was used.
    Legacy,
    /// One or more active destinations were visited.
    Fanout,
}

/// Summary of one single-record dispatch pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDispatch {
    pub mode: DispatchMode,
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RecordDispatch {
    pub fn aborted() -> Self {
        Self {
            mode: DispatchMode::Aborted,
            delivered: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub fn paused() -> Self {
        Self {
            mode: DispatchMode::Paused,
            delivered: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Aggregate of one bulk dispatch call (one sweep type, all destinations).
#[derive(Debug, Clone, Default)]
pub struct BulkDispatch {
    /// Destinations that accepted the batch.
    pub delivered: usize,
    /// Destinations skipped by the type filter or self-loop guard.
    pub skipped: usize,
    /// Per-destination failure messages; never aborts the loop.
    pub errors: Vec<String>,
}

impl BulkDispatch {
    /// At least one acceptance, or nothing to report, counts as success.
    pub fn is_success(&self) -> bool {
        self.delivered > 0 || self.errors.is_empty()
    }

    /// All per-destination failures, concatenated.
    pub fn error_message(&self) -> String {
        self.errors.join(" | ")
    }
}

/// Structured result of a manual or scheduled bulk sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub code: u16,
    pub message: String,
    pub synced_count: usize,
    pub total_records: usize,
    pub type_filter: Option<SensorType>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_success_rules() {
        // No-op (nothing attempted, nothing failed) is success
        assert!(BulkDispatch::default().is_success());

        // One acceptance outweighs failures
        let mixed = BulkDispatch {
            delivered: 1,
            skipped: 0,
            errors: vec!["collector-b: HTTP 500".into()],
        };
        assert!(mixed.is_success());

        // Failures only
        let failed = BulkDispatch {
            delivered: 0,
            skipped: 1,
            errors: vec!["collector-a: connect refused".into()],
        };
        assert!(!failed.is_success());
    }

    #[test]
    fn test_bulk_error_concatenation() {
        let outcome = BulkDispatch {
            delivered: 0,
            skipped: 0,
            errors: vec!["a: timeout".into(), "b: HTTP 503".into()],
        };
        assert_eq!(outcome.error_message(), "a: timeout | b: HTTP 503");
    }

    #[test]
    fn test_sync_report_serde() {
        let report = SyncReport {
            code: 200,
            message: "Bulk sync completed successfully".into(),
            synced_count: 3,
            total_records: 3,
            type_filter: Some(SensorType::Power),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"type_filter\":\"power\""));
        assert!(json.contains("\"synced_count\":3"));
    }
}
