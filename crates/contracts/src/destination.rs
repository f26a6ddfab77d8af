//! Destination - a configured forwarding target
//!
//! Read-only to the dispatch core. The persisted `url` is never mutated;
//! a derived `ResolvedDestination` value carries the per-send URL.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::TargetFilter;

/// Reserved mapping source key: embed the entire original record.
pub const FULL_PAYLOAD: &str = "FULL_PAYLOAD";

/// A configured remote collector.
///
/// `mapping` and `headers` hold raw JSON object text exactly as the
/// external configuration surface stores them; malformed text is a normal
/// branch at dispatch time (identity mapping / default headers), never an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: u64,
    pub name: String,
    pub url: String,

    /// JSON object text: target key -> source key.
    #[serde(default)]
    pub mapping: Option<String>,

    /// JSON object text: extra request headers merged over defaults.
    #[serde(default)]
    pub headers: Option<String>,

    pub is_active: bool,

    /// Pin to one sensor type, the `"all"` wildcard, or unpinned (`None`).
    #[serde(default)]
    pub target_type: Option<TargetFilter>,
}

/// One consistent read of the destination registry.
///
/// `total` counts every defined destination regardless of state; a failed
/// read never produces a snapshot, so "unknown state" and "zero
/// destinations" cannot be confused.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub total: usize,
    pub active: Vec<Destination>,
}

/// Immutable per-send view of a destination: final URL, parsed mapping and
/// merged headers. Computed from the stored entity plus the resolved
/// suffix; the stored entity itself is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDestination {
    pub name: String,
    pub url: String,
    pub mapping: HashMap<String, String>,
    pub headers: HashMap<String, String>,
}

/// The legacy static destination from process configuration.
///
/// Used only in the factory state (no destinations ever defined).
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyTarget {
    pub base_url: String,
    pub api_token: Option<String>,
}
