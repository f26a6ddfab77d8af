//! Ingestion rate gate
//!
//! Best-effort per-device de-duplication: an arrival is admitted only if
//! the device has no stored record or its latest record is older than the
//! configured window. The check-then-insert is not atomic; two arrivals
//! racing past the check may both be admitted. That is an accepted risk,
//! not a bug to fix here.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use contracts::{ContractError, DeviceId, RecordStore, SensorRecord};

use crate::decode::decode_record;
use crate::metrics::IngestionMetrics;

/// How one arrival was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Admitted and inserted.
    Stored,
    /// Inside the rate window; dropped silently.
    RateLimited,
    /// Payload could not be decoded.
    Rejected(String),
}

/// Admits or drops arrivals per device based on recency.
pub struct IngestionGate<S> {
    store: Arc<S>,
    window: Duration,
    metrics: Arc<IngestionMetrics>,
}

impl<S> IngestionGate<S>
where
    S: RecordStore + Send + Sync,
{
    /// Create a gate over a store with the given minimum spacing.
    pub fn new(store: Arc<S>, window: Duration) -> Self {
        Self {
            store,
            window,
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// Shared ingestion metrics
    pub fn metrics(&self) -> &Arc<IngestionMetrics> {
        &self.metrics
    }

    /// Whether an arrival for `device_id` at `now` should be admitted.
    ///
    /// True when the device has no stored record, or its latest record is
    /// at least one window old. A store read failure admits nothing.
    pub async fn admit(
        &self,
        device_id: &DeviceId,
        now: DateTime<Utc>,
    ) -> Result<bool, ContractError> {
        let latest = self.store.latest_for_device(device_id).await?;
        Ok(match latest {
            Some(record) => now - record.timestamp >= self.window,
            None => true,
        })
    }

    /// Decode, gate and store one incoming message.
    #[instrument(name = "ingest_message", skip(self, json))]
    pub async fn ingest(&self, json: &str, now: DateTime<Utc>) -> IngestOutcome {
        let record = match decode_record(json, now) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Rejected ingest payload");
                self.metrics.record_rejected();
                counter!("cloudsync_ingest_rejected_total").increment(1);
                return IngestOutcome::Rejected(e.to_string());
            }
        };

        match self.admit(&record.device_id, now).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(device_id = %record.device_id, "Rate limited, dropping arrival");
                self.metrics.record_rate_limited();
                counter!("cloudsync_ingest_rate_limited_total").increment(1);
                return IngestOutcome::RateLimited;
            }
            Err(e) => {
                warn!(error = %e, "Store unreadable, dropping arrival");
                self.metrics.record_rejected();
                return IngestOutcome::Rejected(e.to_string());
            }
        }

        match self.store.insert(record).await {
            Ok(()) => {
                self.metrics.record_stored();
                counter!("cloudsync_ingest_stored_total").increment(1);
                IngestOutcome::Stored
            }
            Err(e) => {
                warn!(error = %e, "Store insert failed");
                self.metrics.record_rejected();
                IngestOutcome::Rejected(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use storage::MemoryRecordStore;

    fn gate() -> (IngestionGate<MemoryRecordStore>, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::new());
        (
            IngestionGate::new(Arc::clone(&store), Duration::minutes(5)),
            store,
        )
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn test_arrivals_inside_window_dropped() {
        let (gate, store) = gate();
        let json = r#"{"device_id": "D1", "power": 10.0}"#;

        assert_eq!(gate.ingest(json, at(0)).await, IngestOutcome::Stored);
        // 4 minutes later: inside the window
        assert_eq!(gate.ingest(json, at(4)).await, IngestOutcome::RateLimited);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_arrivals_outside_window_admitted() {
        let (gate, store) = gate();
        let json = r#"{"device_id": "D1", "power": 10.0}"#;

        assert_eq!(gate.ingest(json, at(0)).await, IngestOutcome::Stored);
        // 6 minutes later: window elapsed
        assert_eq!(gate.ingest(json, at(6)).await, IngestOutcome::Stored);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_devices_gated_independently() {
        let (gate, store) = gate();
        gate.ingest(r#"{"device_id": "D1", "power": 10.0}"#, at(0))
            .await;
        gate.ingest(r#"{"device_id": "D2", "lux": 300.0}"#, at(1))
            .await;
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_payload_not_stored() {
        let (gate, store) = gate();
        let outcome = gate.ingest("{broken", at(0)).await;
        assert!(matches!(outcome, IngestOutcome::Rejected(_)));
        assert!(store.is_empty());
        assert_eq!(gate.metrics().snapshot().rejected, 1);
    }
}
