//! GatewayBlueprint - Config Loader output
//!
//! Describes the full gateway configuration: listen identity, legacy
//! target, scheduler cadence, rate gate window, seeded destinations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Destination, LegacyTarget, TargetFilter};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete gateway configuration blueprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Own listen identity (drives the self-loop guard)
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Legacy static destination (factory state only)
    #[serde(default)]
    pub legacy: Option<LegacyConfig>,

    /// Periodic sweep settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Ingestion rate gate settings
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// Seeded destination list (the external CRUD surface in file form)
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

/// Listen identity of this gateway instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
        }
    }
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    5001
}

/// Legacy collector endpoint, sourced from process-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyConfig {
    pub base_url: String,

    /// Sent as `X-API-TOKEN` when present.
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Periodic sweep settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Interval between sweep cycles (seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            enabled: true,
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}

/// Ingestion rate gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Minimum spacing between stored records per device (seconds)
    #[serde(default = "default_rate_window_secs")]
    pub rate_window_secs: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            rate_window_secs: default_rate_window_secs(),
        }
    }
}

fn default_rate_window_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

/// One seeded destination entry.
///
/// `mapping` and `headers` are plain tables here for config ergonomics;
/// they are serialized to JSON object text when the registry is seeded,
/// matching how the external surface stores them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub name: String,
    pub url: String,

    #[serde(default)]
    pub mapping: HashMap<String, String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub target_type: Option<TargetFilter>,
}

impl GatewayBlueprint {
    /// Destinations in registry form, ids assigned by position.
    pub fn seed_destinations(&self) -> Vec<Destination> {
        self.destinations
            .iter()
            .enumerate()
            .map(|(index, config)| Destination {
                id: index as u64 + 1,
                name: config.name.clone(),
                url: config.url.clone(),
                mapping: encode_table(&config.mapping),
                headers: encode_table(&config.headers),
                is_active: config.is_active,
                target_type: config.target_type,
            })
            .collect()
    }

    /// Legacy target, if the section is configured.
    pub fn legacy_target(&self) -> Option<LegacyTarget> {
        self.legacy.as_ref().map(|legacy| LegacyTarget {
            base_url: legacy.base_url.clone(),
            api_token: legacy.api_token.clone(),
        })
    }

    /// Rate gate window as a chrono duration.
    pub fn rate_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ingestion.rate_window_secs as i64)
    }

    /// Sweep interval as a std duration.
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.scheduler.interval_secs)
    }
}

fn encode_table(table: &HashMap<String, String>) -> Option<String> {
    if table.is_empty() {
        None
    } else {
        serde_json::to_string(table).ok()
    }
}
