//! SensorType - the closed set of routable sensor categories
//!
//! Used to filter storage queries, pick a URL suffix, and pin destinations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Sensor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Power,
    Water,
    Gas,
    Smoke,
    Fire,
    Weather,
    Lux,
    HumidityTemp,
    Ultrasonic,
}

impl SensorType {
    /// Fixed order used by the periodic sweep scheduler.
    pub const ALL: [SensorType; 9] = [
        SensorType::Power,
        SensorType::Water,
        SensorType::Gas,
        SensorType::Smoke,
        SensorType::Fire,
        SensorType::Weather,
        SensorType::Lux,
        SensorType::HumidityTemp,
        SensorType::Ultrasonic,
    ];

    /// Collector path segment appended during URL resolution.
    pub fn suffix(self) -> &'static str {
        match self {
            SensorType::Power => "/add_power",
            SensorType::Water => "/add_water",
            SensorType::Gas => "/add_gas",
            SensorType::Smoke => "/add_smoke",
            SensorType::Fire => "/add_fire",
            SensorType::Weather => "/add_weather",
            SensorType::Lux => "/add_lux",
            SensorType::HumidityTemp => "/add_humidity_temp",
            SensorType::Ultrasonic => "/add_ultrasonic",
        }
    }

    /// Payload fields that belong to this type in a bulk projection.
    ///
    /// Identity fields (`device_id`, `timestamp`) are always kept and are
    /// not listed here.
    pub fn payload_fields(self) -> &'static [&'static str] {
        match self {
            SensorType::Power => &["power", "voltage", "current", "frequency", "energy"],
            SensorType::Water => &["water", "water_level", "total_volume"],
            SensorType::Gas => &["gas", "gas_ppm", "gas_voltage"],
            SensorType::Smoke => &["smoke"],
            SensorType::Fire => &["fire", "temperature", "smoke"],
            SensorType::Weather => &["weather", "temperature"],
            SensorType::Lux => &["lux"],
            SensorType::HumidityTemp => &["humidity", "temperature"],
            SensorType::Ultrasonic => &["distance"],
        }
    }

    /// Canonical snake_case label (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            SensorType::Power => "power",
            SensorType::Water => "water",
            SensorType::Gas => "gas",
            SensorType::Smoke => "smoke",
            SensorType::Fire => "fire",
            SensorType::Weather => "weather",
            SensorType::Lux => "lux",
            SensorType::HumidityTemp => "humidity_temp",
            SensorType::Ultrasonic => "ultrasonic",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power" => Ok(SensorType::Power),
            "water" => Ok(SensorType::Water),
            "gas" => Ok(SensorType::Gas),
            "smoke" => Ok(SensorType::Smoke),
            "fire" => Ok(SensorType::Fire),
            "weather" => Ok(SensorType::Weather),
            "lux" => Ok(SensorType::Lux),
            "humidity_temp" => Ok(SensorType::HumidityTemp),
            "ultrasonic" => Ok(SensorType::Ultrasonic),
            other => Err(ContractError::config_validation(
                "sensor_type",
                format!("unknown sensor type '{other}'"),
            )),
        }
    }
}

/// Destination pinning: a single fixed type, or the explicit wildcard.
///
/// Serialized as a plain string (`"all"`, `"power"`, ...), matching the
/// external configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetFilter {
    /// Wildcard: receives every sweep / record the mapping allows.
    All,
    /// Pinned to exactly one sensor type.
    Only(SensorType),
}

impl TargetFilter {
    /// Whether a sweep of `sweep_type` should include this destination.
    pub fn accepts_sweep(self, sweep_type: SensorType) -> bool {
        match self {
            TargetFilter::All => true,
            TargetFilter::Only(t) => t == sweep_type,
        }
    }

    /// The pinned type, if this filter pins one.
    pub fn pinned(self) -> Option<SensorType> {
        match self {
            TargetFilter::All => None,
            TargetFilter::Only(t) => Some(t),
        }
    }
}

impl fmt::Display for TargetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFilter::All => f.write_str("all"),
            TargetFilter::Only(t) => f.write_str(t.as_str()),
        }
    }
}

impl FromStr for TargetFilter {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(TargetFilter::All)
        } else {
            SensorType::from_str(s).map(TargetFilter::Only)
        }
    }
}

impl TryFrom<String> for TargetFilter {
    type Error = ContractError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TargetFilter> for String {
    fn from(filter: TargetFilter) -> Self {
        filter.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_table() {
        assert_eq!(SensorType::Power.suffix(), "/add_power");
        assert_eq!(SensorType::HumidityTemp.suffix(), "/add_humidity_temp");
        assert_eq!(SensorType::Ultrasonic.suffix(), "/add_ultrasonic");
    }

    #[test]
    fn test_round_trip_labels() {
        for t in SensorType::ALL {
            assert_eq!(t.as_str().parse::<SensorType>().unwrap(), t);
        }
    }

    #[test]
    fn test_target_filter_parse() {
        assert_eq!("all".parse::<TargetFilter>().unwrap(), TargetFilter::All);
        assert_eq!(
            "lux".parse::<TargetFilter>().unwrap(),
            TargetFilter::Only(SensorType::Lux)
        );
        assert!("bogus".parse::<TargetFilter>().is_err());
    }

    #[test]
    fn test_target_filter_sweep() {
        assert!(TargetFilter::All.accepts_sweep(SensorType::Gas));
        assert!(TargetFilter::Only(SensorType::Gas).accepts_sweep(SensorType::Gas));
        assert!(!TargetFilter::Only(SensorType::Water).accepts_sweep(SensorType::Gas));
    }

    #[test]
    fn test_target_filter_serde() {
        let json = serde_json::to_string(&TargetFilter::Only(SensorType::Power)).unwrap();
        assert_eq!(json, "\"power\"");
        let parsed: TargetFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, TargetFilter::All);
    }
}
