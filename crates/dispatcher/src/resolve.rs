//! URL resolution - self-loop guard, pinned types, suffix joining
//!
//! The persisted destination is never mutated; resolution produces an
//! immutable `ResolvedDestination` value carrying the final URL, the
//! parsed mapping and the merged headers.

use tracing::debug;

use contracts::{Destination, ResolvedDestination, SensorRecord, SensorType, TargetFilter};

use crate::classify::classify;
use crate::mapping::{default_headers, parse_headers, parse_mapping};

/// Fallback path segment when no type can be determined on the legacy path.
pub const GENERIC_SUFFIX: &str = "/add_data_record";

/// Outcome of URL resolution for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Send to this final URL.
    Deliver(String),
    /// Do not send to this destination.
    Skip(SkipReason),
}

/// Why a destination was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL points back at this gateway instance.
    SelfLoop,
    /// The destination is pinned to a type the record does not carry.
    TypeMismatch,
}

/// Computes final destination URLs.
///
/// Self-loop detection is a port match inside the URL authority: a remote
/// collector on our own listen port is misconfiguration either way.
#[derive(Debug, Clone, Copy)]
pub struct UrlResolver {
    listen_port: u16,
}

impl UrlResolver {
    pub fn new(listen_port: u16) -> Self {
        Self { listen_port }
    }

    /// Resolve for the single-record path.
    ///
    /// Rules in order: self-loop guard (unconditional), pinned-type field
    /// check, suffix from the effective type (pinned, else classified),
    /// idempotent join. With no type determined the base URL is returned
    /// unchanged (generic endpoint).
    pub fn resolve_record(&self, destination: &Destination, record: &SensorRecord) -> Resolution {
        if self.is_self_loop(&destination.url) {
            return Resolution::Skip(SkipReason::SelfLoop);
        }

        let pinned = destination.target_type.and_then(TargetFilter::pinned);
        if let Some(sensor_type) = pinned {
            if !record.matches_type(sensor_type) {
                return Resolution::Skip(SkipReason::TypeMismatch);
            }
        }

        let effective = pinned.or_else(|| classify(record));
        let suffix = effective.map(SensorType::suffix).unwrap_or("");
        Resolution::Deliver(join_suffix(&destination.url, suffix))
    }

    /// Resolve for the bulk path: one URL per destination per sweep.
    ///
    /// The strict type-equality filter has already run; only the self-loop
    /// guard and the sweep type's suffix apply here.
    pub fn resolve_sweep(&self, destination: &Destination, sweep_type: SensorType) -> Resolution {
        if self.is_self_loop(&destination.url) {
            return Resolution::Skip(SkipReason::SelfLoop);
        }
        Resolution::Deliver(join_suffix(&destination.url, sweep_type.suffix()))
    }

    /// Resolve for the legacy static destination.
    ///
    /// The self-loop guard applies in every registry state. An
    /// unclassifiable record goes to the generic endpoint.
    pub fn resolve_legacy(&self, base_url: &str, record: &SensorRecord) -> Resolution {
        if self.is_self_loop(base_url) {
            return Resolution::Skip(SkipReason::SelfLoop);
        }
        let suffix = classify(record)
            .map(SensorType::suffix)
            .unwrap_or(GENERIC_SUFFIX);
        Resolution::Deliver(join_suffix(base_url, suffix))
    }

    fn is_self_loop(&self, url: &str) -> bool {
        authority(url).ends_with(&format!(":{}", self.listen_port))
    }
}

/// Append `suffix` unless the URL already ends with it; strip one trailing
/// slash when joining. Resolving an already-suffixed URL is a no-op.
pub fn join_suffix(base: &str, suffix: &str) -> String {
    if suffix.is_empty() || base.ends_with(suffix) {
        return base.to_string();
    }
    match base.strip_suffix('/') {
        Some(stripped) => format!("{stripped}{suffix}"),
        None => format!("{base}{suffix}"),
    }
}

/// The authority portion of a URL (host[:port]), scheme and path stripped.
fn authority(url: &str) -> &str {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => url,
    };
    rest.split(['/', '?']).next().unwrap_or(rest)
}

/// Build the immutable per-send view of a destination.
///
/// Malformed mapping/header text falls back to the identity mapping and
/// default headers; destination headers override defaults on key clash.
pub fn resolved_destination(destination: &Destination, url: String) -> ResolvedDestination {
    let mapping = match destination.mapping.as_deref() {
        Some(raw) => parse_mapping(raw).unwrap_or_else(|e| {
            debug!(destination = %destination.name, error = %e, "Malformed mapping, using identity");
            Default::default()
        }),
        None => Default::default(),
    };

    let mut headers = default_headers();
    if let Some(raw) = destination.headers.as_deref() {
        match parse_headers(raw) {
            Ok(custom) => headers.extend(custom),
            Err(e) => {
                debug!(destination = %destination.name, error = %e, "Malformed headers, using defaults");
            }
        }
    }

    ResolvedDestination {
        name: destination.name.clone(),
        url,
        mapping,
        headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn destination(url: &str, target_type: Option<TargetFilter>) -> Destination {
        Destination {
            id: 1,
            name: "collector-a".into(),
            url: url.into(),
            mapping: None,
            headers: None,
            is_active: true,
            target_type,
        }
    }

    fn power_record() -> SensorRecord {
        let mut record = SensorRecord::new("ID_007", Utc::now());
        record.power = Some(120.5);
        record
    }

    #[test]
    fn test_join_suffix_idempotent() {
        let once = join_suffix("https://collector.example/api/v1", "/add_power");
        assert_eq!(once, "https://collector.example/api/v1/add_power");
        let twice = join_suffix(&once, "/add_power");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_join_suffix_strips_trailing_slash() {
        assert_eq!(
            join_suffix("https://collector.example/api/v1/", "/add_gas"),
            "https://collector.example/api/v1/add_gas"
        );
    }

    #[test]
    fn test_self_loop_skipped() {
        let resolver = UrlResolver::new(5001);
        let dest = destination("http://127.0.0.1:5001/api/v1", None);
        assert_eq!(
            resolver.resolve_record(&dest, &power_record()),
            Resolution::Skip(SkipReason::SelfLoop)
        );
        // Other ports pass
        let dest = destination("http://127.0.0.1:5002/api/v1", None);
        assert!(matches!(
            resolver.resolve_record(&dest, &power_record()),
            Resolution::Deliver(_)
        ));
    }

    #[test]
    fn test_pinned_type_requires_field() {
        let resolver = UrlResolver::new(5001);
        let dest = destination(
            "https://collector.example/api/v1",
            Some(TargetFilter::Only(SensorType::Lux)),
        );
        assert_eq!(
            resolver.resolve_record(&dest, &power_record()),
            Resolution::Skip(SkipReason::TypeMismatch)
        );
    }

    #[test]
    fn test_pinned_type_drives_suffix() {
        let resolver = UrlResolver::new(5001);
        let dest = destination(
            "https://collector.example/api/v1",
            Some(TargetFilter::Only(SensorType::Power)),
        );
        assert_eq!(
            resolver.resolve_record(&dest, &power_record()),
            Resolution::Deliver("https://collector.example/api/v1/add_power".into())
        );
    }

    #[test]
    fn test_wildcard_auto_detects() {
        let resolver = UrlResolver::new(5001);
        let dest = destination("https://collector.example/api/v1", Some(TargetFilter::All));
        assert_eq!(
            resolver.resolve_record(&dest, &power_record()),
            Resolution::Deliver("https://collector.example/api/v1/add_power".into())
        );
    }

    #[test]
    fn test_unclassifiable_record_keeps_base_url() {
        let resolver = UrlResolver::new(5001);
        let dest = destination("https://collector.example/api/v1", None);
        let record = SensorRecord::new("ID_001", Utc::now());
        assert_eq!(
            resolver.resolve_record(&dest, &record),
            Resolution::Deliver("https://collector.example/api/v1".into())
        );
    }

    #[test]
    fn test_legacy_generic_fallback() {
        let resolver = UrlResolver::new(5001);
        let record = SensorRecord::new("ID_001", Utc::now());
        assert_eq!(
            resolver.resolve_legacy("https://cloud.example/api/v1", &record),
            Resolution::Deliver("https://cloud.example/api/v1/add_data_record".into())
        );
    }

    #[test]
    fn test_resolved_destination_fallbacks() {
        let mut dest = destination("https://collector.example/api/v1", None);
        dest.mapping = Some("{broken".into());
        dest.headers = Some(r#"{"X-Auth": "abc"}"#.into());

        let resolved = resolved_destination(&dest, dest.url.clone());
        assert!(resolved.mapping.is_empty());
        assert_eq!(resolved.headers.get("X-Auth").map(String::as_str), Some("abc"));
        assert_eq!(
            resolved.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }
}
