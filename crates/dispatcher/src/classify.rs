//! Type classifier - fixed-priority field-presence inference

use contracts::{SensorRecord, SensorType};

/// Classification priority. The first type whose defining field(s) are
/// present wins; a record carrying both `power` and `humidity` classifies
/// as power. This order is part of the contract.
pub const CLASSIFY_ORDER: [SensorType; 9] = [
    SensorType::Power,
    SensorType::Water,
    SensorType::Gas,
    SensorType::Smoke,
    SensorType::Fire,
    SensorType::Weather,
    SensorType::Lux,
    SensorType::Ultrasonic,
    SensorType::HumidityTemp,
];

/// Infer the sensor type of a record from its populated fields.
///
/// Returns `None` when no recognized field is present.
pub fn classify(record: &SensorRecord) -> Option<SensorType> {
    CLASSIFY_ORDER
        .into_iter()
        .find(|sensor_type| record.matches_type(*sensor_type))
}
