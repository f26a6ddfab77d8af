//! RecordStore / DestinationRegistry traits - external collaborators
//!
//! The persistence layer and the destination configuration surface are
//! owned elsewhere; the dispatch core only sees these seams.

use crate::{ContractError, DeviceId, RegistrySnapshot, SensorRecord, SensorType};

/// Record persistence seam.
///
/// One bounded operation per call; implementations must not hold internal
/// locks across network calls.
#[trait_variant::make(RecordStore: Send)]
pub trait LocalRecordStore {
    /// Most recent stored record for the device, if any.
    async fn latest_for_device(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<SensorRecord>, ContractError>;

    /// Append a record. Records are immutable after this point.
    async fn insert(&self, record: SensorRecord) -> Result<(), ContractError>;

    /// Records carrying the defining field(s) of `sensor_type`.
    ///
    /// `None` disables the filter and returns everything.
    async fn records_for_type(
        &self,
        sensor_type: Option<SensorType>,
    ) -> Result<Vec<SensorRecord>, ContractError>;
}

/// Destination configuration seam.
#[trait_variant::make(DestinationRegistry: Send)]
pub trait LocalDestinationRegistry {
    /// One consistent read: total defined count plus the active subset.
    ///
    /// # Errors
    /// A failed read means the registry state is unknown; callers must
    /// fail closed (zero sends), never fall back to a default target.
    async fn snapshot(&self) -> Result<RegistrySnapshot, ContractError>;
}
