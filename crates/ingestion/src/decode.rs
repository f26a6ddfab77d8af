//! Ingest payload decoding
//!
//! Devices report a JSON object with `device_id` and whatever sensor
//! fields apply. Unrecognized fields are ignored; the legacy short names
//! `hum` and `temp` are accepted as aliases.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use contracts::{ContractError, SensorRecord};

/// Wire form of an incoming message.
#[derive(Debug, Deserialize)]
struct IngestPayload {
    device_id: String,

    #[serde(default)]
    power: Option<f64>,
    #[serde(default)]
    voltage: Option<f64>,
    #[serde(default)]
    current: Option<f64>,
    #[serde(default)]
    frequency: Option<f64>,
    #[serde(default)]
    energy: Option<f64>,
    #[serde(default, alias = "hum")]
    humidity: Option<f64>,
    #[serde(default, alias = "temp")]
    temperature: Option<f64>,
    #[serde(default)]
    weather: Option<String>,
    #[serde(default)]
    fire: Option<i64>,
    #[serde(default)]
    gas: Option<f64>,
    #[serde(default)]
    gas_ppm: Option<f64>,
    #[serde(default)]
    gas_voltage: Option<f64>,
    #[serde(default)]
    smoke: Option<f64>,
    #[serde(default)]
    lux: Option<f64>,
    #[serde(default)]
    water: Option<f64>,
    #[serde(default)]
    water_level: Option<f64>,
    #[serde(default)]
    total_volume: Option<f64>,
    #[serde(default)]
    distance: Option<f64>,
}

/// Decode an incoming JSON message into a record stamped at `now`.
///
/// # Errors
/// Malformed JSON, a non-object payload, or a missing/empty `device_id`.
pub fn decode_record(json: &str, now: DateTime<Utc>) -> Result<SensorRecord, ContractError> {
    let payload: IngestPayload = serde_json::from_str(json)
        .map_err(|e| ContractError::payload_decode(e.to_string()))?;

    if payload.device_id.trim().is_empty() {
        return Err(ContractError::payload_decode("device_id must not be empty"));
    }

    let mut record = SensorRecord::new(payload.device_id, now);
    record.power = payload.power;
    record.voltage = payload.voltage;
    record.current = payload.current;
    record.frequency = payload.frequency;
    record.energy = payload.energy;
    record.humidity = payload.humidity;
    record.temperature = payload.temperature;
    record.weather = payload.weather;
    record.fire = payload.fire;
    record.gas = payload.gas;
    record.gas_ppm = payload.gas_ppm;
    record.gas_voltage = payload.gas_voltage;
    record.smoke = payload.smoke;
    record.lux = payload.lux;
    record.water = payload.water;
    record.water_level = payload.water_level;
    record.total_volume = payload.total_volume;
    record.distance = payload.distance;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic() {
        let record =
            decode_record(r#"{"device_id": "ID_007", "power": 120.5}"#, Utc::now()).unwrap();
        assert_eq!(record.device_id, "ID_007");
        assert_eq!(record.power, Some(120.5));
        assert!(record.humidity.is_none());
    }

    #[test]
    fn test_decode_aliases() {
        let record = decode_record(
            r#"{"device_id": "ID_001", "hum": 60.0, "temp": 25.5}"#,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.humidity, Some(60.0));
        assert_eq!(record.temperature, Some(25.5));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let record = decode_record(
            r#"{"device_id": "ID_001", "lux": 300.0, "rssi": -70}"#,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.lux, Some(300.0));
    }

    #[test]
    fn test_decode_rejects_missing_device_id() {
        assert!(decode_record(r#"{"power": 1.0}"#, Utc::now()).is_err());
        assert!(decode_record(r#"{"device_id": "  ", "power": 1.0}"#, Utc::now()).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let err = decode_record("{not json", Utc::now()).unwrap_err();
        assert!(matches!(err, ContractError::PayloadDecode { .. }));
    }
}
