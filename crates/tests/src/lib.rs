//! # Integration Tests
//!
//! End-to-end scenarios over the in-memory store/registry and a recording
//! delivery client. No network, no timers: the scheduler's cycle method
//! and the engine are driven directly.

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use contracts::{
        ContractError, DeliveryClient, DeliveryRequest, DeliveryStatus, Destination,
        DestinationRegistry, RegistrySnapshot, TargetFilter,
    };

    /// Delivery client that records every request and answers with a
    /// fixed status code.
    pub struct RecordingClient {
        pub calls: Arc<Mutex<Vec<DeliveryRequest>>>,
        pub status: u16,
    }

    impl RecordingClient {
        pub fn accepting() -> (Self, Arc<Mutex<Vec<DeliveryRequest>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: Arc::clone(&calls),
                    status: 200,
                },
                calls,
            )
        }
    }

    impl DeliveryClient for RecordingClient {
        async fn post_json(
            &self,
            request: DeliveryRequest,
        ) -> Result<DeliveryStatus, ContractError> {
            self.calls.lock().unwrap().push(request);
            Ok(DeliveryStatus { code: self.status })
        }
    }

    /// Registry whose every read fails (unknown state).
    pub struct FailingRegistry;

    impl DestinationRegistry for FailingRegistry {
        async fn snapshot(&self) -> Result<RegistrySnapshot, ContractError> {
            Err(ContractError::registry_unavailable("connection refused"))
        }
    }

    pub fn destination(
        id: u64,
        url: &str,
        is_active: bool,
        target_type: Option<TargetFilter>,
    ) -> Destination {
        Destination {
            id,
            name: format!("dest-{id}"),
            url: url.into(),
            mapping: None,
            headers: None,
            is_active,
            target_type,
        }
    }
}

#[cfg(test)]
mod dispatch_tests {
    use std::sync::Arc;

    use chrono::Utc;
    use contracts::{
        DispatchMode, LegacyTarget, SensorRecord, SensorType, TargetFilter,
    };
    use dispatcher::{CloudDispatcher, DispatcherConfig};
    use storage::MemoryDestinationRegistry;

    use crate::support::{destination, FailingRegistry, RecordingClient};

    fn power_record() -> SensorRecord {
        let mut record = SensorRecord::new("ID_007", Utc::now());
        record.power = Some(120.5);
        record.humidity = Some(60.0);
        record
    }

    fn legacy() -> Option<LegacyTarget> {
        Some(LegacyTarget {
            base_url: "https://cloud.example/api/v1".into(),
            api_token: Some("tkn".into()),
        })
    }

    /// Registry unavailable: zero outbound calls for any input, both paths.
    #[tokio::test]
    async fn test_unreadable_registry_sends_nothing() {
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: legacy(),
            },
            Arc::new(FailingRegistry),
            client,
        );

        let summary = dispatcher.send_record(&power_record()).await;
        assert_eq!(summary.mode, DispatchMode::Aborted);

        let batch = vec![power_record().to_payload()];
        let outcome = dispatcher.send_bulk(&batch, SensorType::Power).await;
        assert!(!outcome.is_success());

        assert!(calls.lock().unwrap().is_empty());
    }

    /// Destinations defined, none active: zero outbound calls, no error.
    #[tokio::test]
    async fn test_all_inactive_sends_nothing() {
        let registry = Arc::new(MemoryDestinationRegistry::with_destinations(vec![
            destination(1, "https://a.example/api/v1", false, None),
            destination(2, "https://b.example/api/v1", false, None),
        ]));
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: legacy(),
            },
            registry,
            client,
        );

        let summary = dispatcher.send_record(&power_record()).await;
        assert_eq!(summary.mode, DispatchMode::Paused);

        let outcome = dispatcher
            .send_bulk(&[power_record().to_payload()], SensorType::Power)
            .await;
        assert!(outcome.is_success());

        assert!(calls.lock().unwrap().is_empty());
    }

    /// Factory state: exactly one call, to the legacy URL with the suffix
    /// chosen by the fixed classifier priority (power beats humidity).
    #[tokio::test]
    async fn test_factory_state_legacy_call() {
        let registry = Arc::new(MemoryDestinationRegistry::new());
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: legacy(),
            },
            registry,
            client,
        );

        let summary = dispatcher.send_record(&power_record()).await;
        assert_eq!(summary.mode, DispatchMode::Legacy);
        assert_eq!(summary.delivered, 1);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://cloud.example/api/v1/add_power");
        assert_eq!(
            calls[0].headers.get("X-API-TOKEN").map(String::as_str),
            Some("tkn")
        );
    }

    /// A destination on our own port is never called, in any registry
    /// state - including the legacy path.
    #[tokio::test]
    async fn test_self_loop_never_called() {
        // Fanout state
        let registry = Arc::new(MemoryDestinationRegistry::with_destinations(vec![
            destination(1, "http://localhost:5001/api/v1", true, None),
        ]));
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: None,
            },
            registry,
            client,
        );
        let summary = dispatcher.send_record(&power_record()).await;
        assert_eq!(summary.skipped, 1);
        let outcome = dispatcher
            .send_bulk(&[power_record().to_payload()], SensorType::Power)
            .await;
        assert_eq!(outcome.skipped, 1);
        assert!(calls.lock().unwrap().is_empty());

        // Factory state with a self-looping legacy URL
        let registry = Arc::new(MemoryDestinationRegistry::new());
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: Some(LegacyTarget {
                    base_url: "http://127.0.0.1:5001/api/v1".into(),
                    api_token: None,
                }),
            },
            registry,
            client,
        );
        let summary = dispatcher.send_record(&power_record()).await;
        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.skipped, 1);
        assert!(calls.lock().unwrap().is_empty());
    }

    /// A destination pinned to lux receives nothing for a record without
    /// a lux field.
    #[tokio::test]
    async fn test_pinned_lux_without_lux_field() {
        let registry = Arc::new(MemoryDestinationRegistry::with_destinations(vec![
            destination(
                1,
                "https://lux.example/api/v1",
                true,
                Some(TargetFilter::Only(SensorType::Lux)),
            ),
        ]));
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: None,
            },
            registry,
            client,
        );

        let summary = dispatcher.send_record(&power_record()).await;
        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.skipped, 1);
        assert!(calls.lock().unwrap().is_empty());
    }

    /// Bulk sweep for power with one water-pinned and one power-pinned
    /// destination routes to exactly the matching one.
    #[tokio::test]
    async fn test_bulk_sweep_routing() {
        let registry = Arc::new(MemoryDestinationRegistry::with_destinations(vec![
            destination(
                1,
                "https://water.example/api/v1",
                true,
                Some(TargetFilter::Only(SensorType::Water)),
            ),
            destination(
                2,
                "https://power.example/api/v1",
                true,
                Some(TargetFilter::Only(SensorType::Power)),
            ),
        ]));
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: None,
            },
            registry,
            client,
        );

        let outcome = dispatcher
            .send_bulk(&[power_record().to_payload()], SensorType::Power)
            .await;
        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.skipped, 1);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://power.example/api/v1/add_power");
    }
}

#[cfg(test)]
mod gate_tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use ingestion::{IngestOutcome, IngestionGate};
    use storage::MemoryRecordStore;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    /// Arrivals 4 minutes apart grow the store by one; 6 minutes apart by
    /// two.
    #[tokio::test]
    async fn test_rate_gate_spacing() {
        let json = r#"{"device_id": "D1", "power": 10.0}"#;

        let store = Arc::new(MemoryRecordStore::new());
        let gate = IngestionGate::new(Arc::clone(&store), Duration::minutes(5));
        assert_eq!(gate.ingest(json, at(0)).await, IngestOutcome::Stored);
        assert_eq!(gate.ingest(json, at(4)).await, IngestOutcome::RateLimited);
        assert_eq!(store.len(), 1);

        let store = Arc::new(MemoryRecordStore::new());
        let gate = IngestionGate::new(Arc::clone(&store), Duration::minutes(5));
        assert_eq!(gate.ingest(json, at(0)).await, IngestOutcome::Stored);
        assert_eq!(gate.ingest(json, at(6)).await, IngestOutcome::Stored);
        assert_eq!(store.len(), 2);
    }
}

#[cfg(test)]
mod scenario_tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use contracts::SensorType;
    use dispatcher::{CloudDispatcher, DispatcherConfig};
    use ingestion::{IngestOutcome, IngestionGate};
    use storage::{MemoryDestinationRegistry, MemoryRecordStore};
    use sync_engine::SyncEngine;

    use crate::support::{destination, RecordingClient};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    /// The full ID_007 scenario: admitted at T0, duplicate at T0+4m
    /// dropped, power sweep resolves the suffixed URL, posts once, and the
    /// 200 response counts as one synced record.
    #[tokio::test]
    async fn test_id_007_end_to_end() {
        let store = Arc::new(MemoryRecordStore::new());
        let gate = IngestionGate::new(Arc::clone(&store), Duration::minutes(5));

        let message = r#"{"device_id": "ID_007", "power": 120.5}"#;
        assert_eq!(gate.ingest(message, at(0)).await, IngestOutcome::Stored);
        assert_eq!(gate.ingest(message, at(4)).await, IngestOutcome::RateLimited);
        assert_eq!(store.len(), 1);

        let registry = Arc::new(MemoryDestinationRegistry::with_destinations(vec![
            destination(1, "https://collector.example/api/v1", true, None),
        ]));
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: None,
            },
            registry,
            client,
        );
        let engine = SyncEngine::new(Arc::clone(&store), dispatcher);

        let report = engine.sweep_type(SensorType::Power).await;
        assert!(report.is_success());
        assert_eq!(report.synced_count, 1);
        assert_eq!(report.total_records, 1);
        assert_eq!(report.type_filter, Some(SensorType::Power));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://collector.example/api/v1/add_power");

        // One-element batch with identity fields and the power value
        let body = calls[0].body.as_array().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["device_id"], serde_json::json!("ID_007"));
        assert_eq!(body[0]["power"], serde_json::json!(120.5));
    }

    /// Manual sync with no filter visits every type and aggregates one
    /// report.
    #[tokio::test]
    async fn test_sync_once_unfiltered() {
        let store = Arc::new(MemoryRecordStore::new());
        let gate = IngestionGate::new(Arc::clone(&store), Duration::minutes(5));
        gate.ingest(r#"{"device_id": "D1", "power": 10.0}"#, at(0))
            .await;
        gate.ingest(r#"{"device_id": "D2", "lux": 300.0}"#, at(0))
            .await;

        let registry = Arc::new(MemoryDestinationRegistry::with_destinations(vec![
            destination(1, "https://collector.example/api/v1", true, None),
        ]));
        let (client, calls) = RecordingClient::accepting();
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: 5001,
                legacy: None,
            },
            registry,
            client,
        );
        let engine = SyncEngine::new(Arc::clone(&store), dispatcher);

        let report = engine.sync_once(None).await;
        assert!(report.is_success());
        assert_eq!(report.type_filter, None);
        assert_eq!(report.synced_count, 2);
        assert_eq!(report.total_records, 2);

        // One request per non-empty sweep (power + lux)
        let urls: Vec<String> = calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.url.clone())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://collector.example/api/v1/add_power".to_string(),
                "https://collector.example/api/v1/add_lux".to_string(),
            ]
        );
    }
}
