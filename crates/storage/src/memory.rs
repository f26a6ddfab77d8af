//! In-memory record store and destination registry
//!
//! Lock discipline: every operation is one bounded critical section; no
//! lock is ever held across an await point or a network call.

use std::sync::RwLock;

use tracing::debug;

use contracts::{
    ContractError, Destination, DestinationRegistry, DeviceId, RecordStore, RegistrySnapshot,
    SensorRecord, SensorType,
};

/// Append-only in-memory record store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<SensorRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().expect("record store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    async fn latest_for_device(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<SensorRecord>, ContractError> {
        let records = self.records.read().expect("record store lock poisoned");
        Ok(records
            .iter()
            .filter(|record| record.device_id == *device_id)
            .max_by_key(|record| record.timestamp)
            .cloned())
    }

    async fn insert(&self, record: SensorRecord) -> Result<(), ContractError> {
        let mut records = self.records.write().expect("record store lock poisoned");
        records.push(record);
        Ok(())
    }

    async fn records_for_type(
        &self,
        sensor_type: Option<SensorType>,
    ) -> Result<Vec<SensorRecord>, ContractError> {
        let records = self.records.read().expect("record store lock poisoned");
        Ok(match sensor_type {
            Some(t) => records
                .iter()
                .filter(|record| record.matches_type(t))
                .cloned()
                .collect(),
            None => records.clone(),
        })
    }
}

/// In-memory destination registry.
///
/// The toggling methods model what the external CRUD surface would do;
/// the dispatch core itself only ever calls `snapshot`.
#[derive(Debug, Default)]
pub struct MemoryDestinationRegistry {
    destinations: RwLock<Vec<Destination>>,
}

impl MemoryDestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the given destinations.
    pub fn with_destinations(destinations: Vec<Destination>) -> Self {
        Self {
            destinations: RwLock::new(destinations),
        }
    }

    /// Add a destination.
    pub fn push(&self, destination: Destination) {
        let mut destinations = self.destinations.write().expect("registry lock poisoned");
        debug!(name = %destination.name, "Destination added");
        destinations.push(destination);
    }

    /// Toggle a destination by id. Returns false if the id is unknown.
    pub fn set_active(&self, id: u64, is_active: bool) -> bool {
        let mut destinations = self.destinations.write().expect("registry lock poisoned");
        match destinations.iter_mut().find(|d| d.id == id) {
            Some(destination) => {
                debug!(name = %destination.name, is_active, "Destination toggled");
                destination.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

impl DestinationRegistry for MemoryDestinationRegistry {
    async fn snapshot(&self) -> Result<RegistrySnapshot, ContractError> {
        let destinations = self.destinations.read().expect("registry lock poisoned");
        Ok(RegistrySnapshot {
            total: destinations.len(),
            active: destinations.iter().filter(|d| d.is_active).cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(device_id: &str, minute: u32) -> SensorRecord {
        let mut record = SensorRecord::new(
            device_id,
            Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap(),
        );
        record.power = Some(100.0 + minute as f64);
        record
    }

    fn destination(id: u64, is_active: bool) -> Destination {
        Destination {
            id,
            name: format!("dest-{id}"),
            url: "https://collector.example/api/v1".into(),
            mapping: None,
            headers: None,
            is_active,
            target_type: None,
        }
    }

    #[tokio::test]
    async fn test_latest_for_device_picks_newest() {
        let store = MemoryRecordStore::new();
        store.insert(record("ID_001", 0)).await.unwrap();
        store.insert(record("ID_001", 10)).await.unwrap();
        store.insert(record("ID_002", 5)).await.unwrap();

        let latest = store
            .latest_for_device(&DeviceId::from("ID_001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.power, Some(110.0));

        let missing = store
            .latest_for_device(&DeviceId::from("ID_999"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_records_for_type_filters() {
        let store = MemoryRecordStore::new();
        store.insert(record("ID_001", 0)).await.unwrap();

        let mut lux_record = SensorRecord::new(
            "ID_002",
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 1, 0).unwrap(),
        );
        lux_record.lux = Some(420.0);
        store.insert(lux_record).await.unwrap();

        let power = store.records_for_type(Some(SensorType::Power)).await.unwrap();
        assert_eq!(power.len(), 1);
        assert_eq!(power[0].device_id, "ID_001");

        let all = store.records_for_type(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_registry_snapshot_and_toggle() {
        let registry = MemoryDestinationRegistry::with_destinations(vec![
            destination(1, true),
            destination(2, false),
        ]);

        let snapshot = registry.snapshot().await.unwrap();
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.active.len(), 1);
        assert_eq!(snapshot.active[0].id, 1);

        assert!(registry.set_active(1, false));
        let snapshot = registry.snapshot().await.unwrap();
        assert_eq!(snapshot.total, 2);
        assert!(snapshot.active.is_empty());

        assert!(!registry.set_active(99, true));
    }
}
