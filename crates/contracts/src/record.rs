//! SensorRecord - one reading for one device at one instant
//!
//! The open set of optional fields mirrors what devices actually report.
//! `None` means "not applicable to this device", not "unknown/zero", and
//! absent fields are omitted from serialized output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DeviceId, SensorType};

/// JSON object form of a record or mapped payload.
pub type PayloadMap = serde_json::Map<String, Value>;

/// One sensor reading. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub device_id: DeviceId,

    /// Instant the record was stored (RFC-3339 on the wire).
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,

    /// 0 = safe, 1 = alarm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fire: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_ppm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_voltage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lux: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl SensorRecord {
    /// Create an empty record for a device; sensor fields start as `None`.
    pub fn new(device_id: impl Into<DeviceId>, timestamp: DateTime<Utc>) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            power: None,
            voltage: None,
            current: None,
            frequency: None,
            energy: None,
            humidity: None,
            temperature: None,
            weather: None,
            fire: None,
            gas: None,
            gas_ppm: None,
            gas_voltage: None,
            smoke: None,
            lux: None,
            water: None,
            water_level: None,
            total_volume: None,
            distance: None,
        }
    }

    /// Whether this record carries the defining field(s) of `sensor_type`.
    pub fn matches_type(&self, sensor_type: SensorType) -> bool {
        match sensor_type {
            SensorType::Power => self.power.is_some(),
            SensorType::Water => self.water.is_some() || self.water_level.is_some(),
            SensorType::Gas => self.gas.is_some() || self.gas_ppm.is_some(),
            SensorType::Smoke => self.smoke.is_some(),
            SensorType::Fire => self.fire.is_some(),
            SensorType::Weather => self.weather.is_some(),
            SensorType::Lux => self.lux.is_some(),
            SensorType::HumidityTemp => self.humidity.is_some() || self.temperature.is_some(),
            SensorType::Ultrasonic => self.distance.is_some(),
        }
    }

    /// Render the record as a JSON object map, `None` fields omitted.
    pub fn to_payload(&self) -> PayloadMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct always serializes to an object
            _ => PayloadMap::new(),
        }
    }
}
