//! CloudDispatcher - single-record and bulk decision trees
//!
//! The single-record path runs once per freshly stored record; the bulk
//! path runs once per sensor type per sweep. Both fail closed on an
//! unreadable registry and isolate per-destination failures.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use contracts::{
    BulkDispatch, DeliveryClient, DeliveryRequest, DestinationRegistry, DispatchMode,
    LegacyTarget, PayloadMap, RecordDispatch, ResolvedDestination, SensorRecord, SensorType,
};

use crate::mapping::{apply_mapping, default_headers};
use crate::metrics::DispatchMetrics;
use crate::resolve::{resolved_destination, Resolution, SkipReason, UrlResolver};

/// Single-record request timeout
const RECORD_TIMEOUT: Duration = Duration::from_secs(5);

/// Bulk batch request timeout
const BULK_TIMEOUT: Duration = Duration::from_secs(10);

/// Legacy auth header name
const API_TOKEN_HEADER: &str = "X-API-TOKEN";

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Own listen port (drives the self-loop guard)
    pub listen_port: u16,
    /// Legacy static destination, used only in the factory state
    pub legacy: Option<LegacyTarget>,
}

/// The dispatch core. Reads the registry, never writes it.
pub struct CloudDispatcher<R, C> {
    registry: Arc<R>,
    client: C,
    resolver: UrlResolver,
    legacy: Option<LegacyTarget>,
    metrics: Arc<DispatchMetrics>,
}

impl<R, C> CloudDispatcher<R, C>
where
    R: DestinationRegistry + Send + Sync,
    C: DeliveryClient + Send + Sync,
{
    /// Create a dispatcher over a registry and a delivery client.
    pub fn new(config: DispatcherConfig, registry: Arc<R>, client: C) -> Self {
        Self {
            registry,
            client,
            resolver: UrlResolver::new(config.listen_port),
            legacy: config.legacy,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Shared dispatch metrics
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Dispatch one freshly stored record.
    ///
    /// Decision tree over the registry's aggregate state:
    /// - unreadable registry: abort entirely, zero network calls
    /// - destinations defined but all inactive: abort (operator paused)
    /// - factory state (none ever defined): legacy static destination
    /// - otherwise: fan out to each active destination independently
    #[instrument(name = "dispatch_record", skip(self, record), fields(device_id = %record.device_id))]
    pub async fn send_record(&self, record: &SensorRecord) -> RecordDispatch {
        let snapshot = match self.registry.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Registry unreadable, aborting dispatch");
                self.metrics.inc_aborted();
                return RecordDispatch::aborted();
            }
        };

        if snapshot.total > 0 && snapshot.active.is_empty() {
            info!("All destinations paused, transmission stopped");
            return RecordDispatch::paused();
        }

        if snapshot.total == 0 {
            return self.send_record_legacy(record).await;
        }

        let payload = record.to_payload();
        let mut summary = RecordDispatch {
            mode: DispatchMode::Fanout,
            delivered: 0,
            skipped: 0,
            failed: 0,
        };

        for destination in &snapshot.active {
            match self.resolver.resolve_record(destination, record) {
                Resolution::Skip(reason) => {
                    self.log_skip(&destination.name, reason);
                    summary.skipped += 1;
                    self.metrics.inc_skipped(1);
                }
                Resolution::Deliver(url) => {
                    let resolved = resolved_destination(destination, url);
                    let body = Value::Object(apply_mapping(&resolved.mapping, &payload));
                    if self.deliver(&resolved, body, RECORD_TIMEOUT).await {
                        summary.delivered += 1;
                        self.metrics.inc_delivered(1);
                    } else {
                        summary.failed += 1;
                        self.metrics.inc_failed(1);
                    }
                }
            }
        }

        summary
    }

    /// Dispatch a pre-projected batch for one sweep type.
    ///
    /// Legacy fallback is disabled by policy here: an empty registry is a
    /// deliberate no-op success, as is an all-paused registry. Pinned
    /// destinations are filtered by strict type equality once per sweep.
    #[instrument(name = "dispatch_bulk", skip(self, batch), fields(sweep_type = %sweep_type, batch_len = batch.len()))]
    pub async fn send_bulk(&self, batch: &[PayloadMap], sweep_type: SensorType) -> BulkDispatch {
        let snapshot = match self.registry.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Registry unreadable, aborting bulk dispatch");
                self.metrics.inc_aborted();
                return BulkDispatch {
                    delivered: 0,
                    skipped: 0,
                    errors: vec![e.to_string()],
                };
            }
        };

        if snapshot.total == 0 {
            info!("No destinations configured, bulk sync is a no-op");
            return BulkDispatch::default();
        }
        if snapshot.active.is_empty() {
            info!("All destinations paused, bulk sync is a no-op");
            return BulkDispatch::default();
        }

        let mut outcome = BulkDispatch::default();

        for destination in &snapshot.active {
            if let Some(filter) = destination.target_type {
                if !filter.accepts_sweep(sweep_type) {
                    debug!(
                        destination = %destination.name,
                        "Destination pinned to another type, skipping for this sweep"
                    );
                    outcome.skipped += 1;
                    self.metrics.inc_skipped(1);
                    continue;
                }
            }

            match self.resolver.resolve_sweep(destination, sweep_type) {
                Resolution::Skip(reason) => {
                    self.log_skip(&destination.name, reason);
                    outcome.skipped += 1;
                    self.metrics.inc_skipped(1);
                }
                Resolution::Deliver(url) => {
                    let resolved = resolved_destination(destination, url);
                    let items: Vec<Value> = batch
                        .iter()
                        .map(|item| Value::Object(apply_mapping(&resolved.mapping, item)))
                        .collect();

                    match self.post(&resolved, Value::Array(items), BULK_TIMEOUT).await {
                        Ok(()) => {
                            outcome.delivered += 1;
                            self.metrics.inc_delivered(1);
                        }
                        Err(message) => {
                            warn!(destination = %resolved.name, error = %message, "Bulk delivery failed");
                            outcome.errors.push(format!("{}: {message}", resolved.name));
                            self.metrics.inc_failed(1);
                        }
                    }
                }
            }
        }

        outcome
    }

    /// Factory-state path: the only place the legacy destination is used.
    async fn send_record_legacy(&self, record: &SensorRecord) -> RecordDispatch {
        let mut summary = RecordDispatch {
            mode: DispatchMode::Legacy,
            delivered: 0,
            skipped: 0,
            failed: 0,
        };

        let Some(target) = &self.legacy else {
            debug!("Factory state and no legacy target configured, nothing to send");
            return summary;
        };

        match self.resolver.resolve_legacy(&target.base_url, record) {
            Resolution::Skip(reason) => {
                self.log_skip("legacy", reason);
                summary.skipped += 1;
                self.metrics.inc_skipped(1);
            }
            Resolution::Deliver(url) => {
                let mut headers = default_headers();
                if let Some(token) = &target.api_token {
                    headers.insert(API_TOKEN_HEADER.to_string(), token.clone());
                }
                let resolved = ResolvedDestination {
                    name: "legacy".to_string(),
                    url,
                    mapping: HashMap::new(),
                    headers,
                };
                let body = Value::Object(record.to_payload());
                if self.deliver(&resolved, body, RECORD_TIMEOUT).await {
                    summary.delivered += 1;
                    self.metrics.inc_delivered(1);
                } else {
                    summary.failed += 1;
                    self.metrics.inc_failed(1);
                }
            }
        }

        summary
    }

    /// POST and reduce to success/failure; failures are logged per
    /// destination and never abort the caller's loop.
    async fn deliver(&self, resolved: &ResolvedDestination, body: Value, timeout: Duration) -> bool {
        match self.post(resolved, body, timeout).await {
            Ok(()) => {
                debug!(destination = %resolved.name, url = %resolved.url, "Delivered");
                true
            }
            Err(message) => {
                warn!(destination = %resolved.name, error = %message, "Delivery failed");
                false
            }
        }
    }

    async fn post(
        &self,
        resolved: &ResolvedDestination,
        body: Value,
        timeout: Duration,
    ) -> Result<(), String> {
        let request = DeliveryRequest {
            url: resolved.url.clone(),
            headers: resolved.headers.clone(),
            body,
            timeout,
        };
        match self.client.post_json(request).await {
            Ok(status) if status.is_success() => Ok(()),
            Ok(status) => Err(format!("HTTP {}", status.code)),
            Err(e) => Err(e.to_string()),
        }
    }

    fn log_skip(&self, destination: &str, reason: SkipReason) {
        match reason {
            SkipReason::SelfLoop => {
                warn!(destination, "Skipping destination: url points back at this gateway");
            }
            SkipReason::TypeMismatch => {
                debug!(destination, "Skipping destination: record lacks the pinned type's fields");
            }
        }
    }
}
