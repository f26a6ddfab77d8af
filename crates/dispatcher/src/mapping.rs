//! Payload mapping and header handling
//!
//! Mapping/header configuration arrives as raw JSON object text and may be
//! malformed; parsing returns a Result and the caller falls back to the
//! identity mapping / default headers. A send is never blocked by bad
//! mapping configuration.

use std::collections::HashMap;

use serde_json::Value;

use contracts::{PayloadMap, FULL_PAYLOAD};

/// Parse mapping JSON text (target key -> source key).
///
/// # Errors
/// Malformed or non-object input; the caller treats this as "no mapping".
pub fn parse_mapping(raw: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Parse header JSON text (header name -> value).
pub fn parse_headers(raw: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Headers every outbound request starts from.
pub fn default_headers() -> HashMap<String, String> {
    HashMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

/// Reshape a record payload per the destination mapping.
///
/// For each `(target, source)` pair the source value is copied under the
/// target key; the reserved source `FULL_PAYLOAD` embeds the entire
/// original record. An empty mapping, or a mapping that selects nothing,
/// falls back to the original payload unchanged.
pub fn apply_mapping(mapping: &HashMap<String, String>, payload: &PayloadMap) -> PayloadMap {
    if mapping.is_empty() {
        return payload.clone();
    }

    let mut shaped = PayloadMap::new();
    for (target_key, source_key) in mapping {
        if source_key == FULL_PAYLOAD {
            shaped.insert(target_key.clone(), Value::Object(payload.clone()));
        } else if let Some(value) = payload.get(source_key) {
            shaped.insert(target_key.clone(), value.clone());
        }
    }

    if shaped.is_empty() {
        payload.clone()
    } else {
        shaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> PayloadMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_rename_field() {
        let mapping = HashMap::from([("a".to_string(), "power".to_string())]);
        let shaped = apply_mapping(&mapping, &payload(json!({"power": 10})));
        assert_eq!(Value::Object(shaped), json!({"a": 10}));
    }

    #[test]
    fn test_full_payload_sentinel() {
        let mapping = HashMap::from([("b".to_string(), "FULL_PAYLOAD".to_string())]);
        let shaped = apply_mapping(&mapping, &payload(json!({"power": 10})));
        assert_eq!(Value::Object(shaped), json!({"b": {"power": 10}}));
    }

    #[test]
    fn test_empty_mapping_is_identity() {
        let original = payload(json!({"power": 10, "device_id": "ID_001"}));
        let shaped = apply_mapping(&HashMap::new(), &original);
        assert_eq!(shaped, original);
    }

    #[test]
    fn test_mapping_selecting_nothing_falls_back() {
        let mapping = HashMap::from([("a".to_string(), "nonexistent".to_string())]);
        let original = payload(json!({"power": 10}));
        let shaped = apply_mapping(&mapping, &original);
        assert_eq!(shaped, original);
    }

    #[test]
    fn test_parse_mapping_malformed() {
        assert!(parse_mapping("not json at all").is_err());
        assert!(parse_mapping("[1, 2]").is_err());
        assert!(parse_mapping(r#"{"gw": "device_id"}"#).is_ok());
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(
            headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }
}
