//! SyncEngine - per-type batch pull, projection and bulk dispatch

use std::sync::Arc;

use tracing::{debug, instrument};

use contracts::{
    DeliveryClient, DestinationRegistry, PayloadMap, RecordStore, SensorRecord, SensorType,
    SyncReport,
};
use dispatcher::CloudDispatcher;
use observability::record_sweep_report;

/// Project a record for a sweep: identity fields plus the type's field set.
///
/// Collectors pinned to one type receive only the columns that belong to
/// it; a power sweep does not carry a device's humidity reading along.
pub fn project_record(record: &SensorRecord, sweep_type: SensorType) -> PayloadMap {
    let full = record.to_payload();
    let mut projected = PayloadMap::new();

    for key in ["device_id", "timestamp"] {
        if let Some(value) = full.get(key) {
            projected.insert(key.to_string(), value.clone());
        }
    }
    for key in sweep_type.payload_fields() {
        if let Some(value) = full.get(*key) {
            projected.insert((*key).to_string(), value.clone());
        }
    }
    projected
}

/// Bulk sync engine over a store and the dispatch core.
pub struct SyncEngine<S, R, C> {
    store: Arc<S>,
    dispatcher: CloudDispatcher<R, C>,
}

impl<S, R, C> SyncEngine<S, R, C>
where
    S: RecordStore + Send + Sync,
    R: DestinationRegistry + Send + Sync,
    C: DeliveryClient + Send + Sync,
{
    pub fn new(store: Arc<S>, dispatcher: CloudDispatcher<R, C>) -> Self {
        Self { store, dispatcher }
    }

    /// The dispatch core (for metrics access).
    pub fn dispatcher(&self) -> &CloudDispatcher<R, C> {
        &self.dispatcher
    }

    /// Run one bulk sync for one sensor type.
    ///
    /// Never returns an error: every failure mode is folded into the
    /// report so a caller loop cannot be broken by one type.
    #[instrument(name = "sweep_type", skip(self), fields(sweep_type = %sweep_type))]
    pub async fn sweep_type(&self, sweep_type: SensorType) -> SyncReport {
        let records = match self.store.records_for_type(Some(sweep_type)).await {
            Ok(records) => records,
            Err(e) => {
                let report = SyncReport {
                    code: 500,
                    message: format!("Bulk sync failed: {e}"),
                    synced_count: 0,
                    total_records: 0,
                    type_filter: Some(sweep_type),
                };
                record_sweep_report(sweep_type.as_str(), &report);
                return report;
            }
        };

        let total = records.len();
        if total == 0 {
            debug!("No records for this type, nothing to sync");
            let report = SyncReport {
                code: 200,
                message: "Bulk sync completed successfully".to_string(),
                synced_count: 0,
                total_records: 0,
                type_filter: Some(sweep_type),
            };
            record_sweep_report(sweep_type.as_str(), &report);
            return report;
        }

        let batch: Vec<PayloadMap> = records
            .iter()
            .map(|record| project_record(record, sweep_type))
            .collect();

        let outcome = self.dispatcher.send_bulk(&batch, sweep_type).await;

        let report = if outcome.is_success() {
            SyncReport {
                code: 200,
                message: "Bulk sync completed successfully".to_string(),
                synced_count: total,
                total_records: total,
                type_filter: Some(sweep_type),
            }
        } else {
            SyncReport {
                code: 500,
                message: format!("Cloud sync failed: {}", outcome.error_message()),
                synced_count: 0,
                total_records: total,
                type_filter: Some(sweep_type),
            }
        };
        record_sweep_report(sweep_type.as_str(), &report);
        report
    }

    /// Manual trigger: one type, or every type in sweep order when no
    /// filter is given. Aggregates into a single report.
    #[instrument(name = "sync_once", skip(self))]
    pub async fn sync_once(&self, type_filter: Option<SensorType>) -> SyncReport {
        match type_filter {
            Some(sweep_type) => self.sweep_type(sweep_type).await,
            None => {
                let mut synced_count = 0;
                let mut total_records = 0;
                let mut failures = Vec::new();

                for sweep_type in SensorType::ALL {
                    let report = self.sweep_type(sweep_type).await;
                    synced_count += report.synced_count;
                    total_records += report.total_records;
                    if !report.is_success() {
                        failures.push(format!("{}: {}", sweep_type, report.message));
                    }
                }

                if failures.is_empty() {
                    SyncReport {
                        code: 200,
                        message: "Bulk sync completed successfully".to_string(),
                        synced_count,
                        total_records,
                        type_filter: None,
                    }
                } else {
                    SyncReport {
                        code: 500,
                        message: failures.join(" | "),
                        synced_count,
                        total_records,
                        type_filter: None,
                    }
                }
            }
        }
    }
}
