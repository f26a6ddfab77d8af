//! Gateway wiring: blueprint -> storage -> gate -> dispatcher -> engine

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use contracts::GatewayBlueprint;
use dispatcher::{CloudDispatcher, DispatcherConfig, HttpDeliveryClient};
use ingestion::IngestionGate;
use storage::{MemoryDestinationRegistry, MemoryRecordStore};
use sync_engine::SyncEngine;

/// The engine as wired by this binary.
pub type GatewayEngine =
    SyncEngine<MemoryRecordStore, MemoryDestinationRegistry, HttpDeliveryClient>;

/// All runtime components of one gateway instance.
pub struct GatewayStack {
    pub store: Arc<MemoryRecordStore>,
    pub registry: Arc<MemoryDestinationRegistry>,
    pub gate: IngestionGate<MemoryRecordStore>,
    pub engine: Arc<GatewayEngine>,
}

impl GatewayStack {
    /// Wire a full gateway from a validated blueprint.
    pub fn build(blueprint: &GatewayBlueprint) -> Result<Self> {
        let store = Arc::new(MemoryRecordStore::new());
        let registry = Arc::new(MemoryDestinationRegistry::with_destinations(
            blueprint.seed_destinations(),
        ));

        let gate = IngestionGate::new(Arc::clone(&store), blueprint.rate_window());

        let client = HttpDeliveryClient::new()?;
        let dispatcher = CloudDispatcher::new(
            DispatcherConfig {
                listen_port: blueprint.gateway.listen_port,
                legacy: blueprint.legacy_target(),
            },
            Arc::clone(&registry),
            client,
        );
        let engine = Arc::new(SyncEngine::new(Arc::clone(&store), dispatcher));

        info!(
            destinations = blueprint.destinations.len(),
            legacy = blueprint.legacy.is_some(),
            listen_port = blueprint.gateway.listen_port,
            "Gateway stack assembled"
        );

        Ok(Self {
            store,
            registry,
            gate,
            engine,
        })
    }
}
