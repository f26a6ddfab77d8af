//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    gateway: GatewayInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    legacy: Option<LegacyInfo>,
    scheduler: SchedulerInfo,
    ingestion: IngestionInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    destinations: Vec<DestinationInfo>,
}

#[derive(Serialize)]
struct GatewayInfo {
    listen_host: String,
    listen_port: u16,
}

#[derive(Serialize)]
struct LegacyInfo {
    base_url: String,
    has_api_token: bool,
}

#[derive(Serialize)]
struct SchedulerInfo {
    interval_secs: u64,
    enabled: bool,
}

#[derive(Serialize)]
struct IngestionInfo {
    rate_window_secs: u64,
}

#[derive(Serialize)]
struct DestinationInfo {
    name: String,
    url: String,
    is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_type: Option<String>,
    mapped_fields: usize,
    extra_headers: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::GatewayBlueprint, args: &InfoArgs) -> ConfigInfo {
    let destinations = if args.destinations {
        blueprint
            .destinations
            .iter()
            .map(|d| DestinationInfo {
                name: d.name.clone(),
                url: d.url.clone(),
                is_active: d.is_active,
                target_type: d.target_type.map(|t| t.to_string()),
                mapped_fields: d.mapping.len(),
                extra_headers: d.headers.len(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        gateway: GatewayInfo {
            listen_host: blueprint.gateway.listen_host.clone(),
            listen_port: blueprint.gateway.listen_port,
        },
        legacy: blueprint.legacy.as_ref().map(|l| LegacyInfo {
            base_url: l.base_url.clone(),
            has_api_token: l.api_token.is_some(),
        }),
        scheduler: SchedulerInfo {
            interval_secs: blueprint.scheduler.interval_secs,
            enabled: blueprint.scheduler.enabled,
        },
        ingestion: IngestionInfo {
            rate_window_secs: blueprint.ingestion.rate_window_secs,
        },
        destinations,
    }
}

fn print_config_info(blueprint: &contracts::GatewayBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Cloudsync Gateway Configuration              ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Gateway info
    println!("📍 Gateway");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!(
        "   └─ Listen: {}:{}",
        blueprint.gateway.listen_host, blueprint.gateway.listen_port
    );

    // Legacy target
    println!("\n☁️  Legacy Target");
    match &blueprint.legacy {
        Some(legacy) => {
            println!("   ├─ Base URL: {}", legacy.base_url);
            println!(
                "   └─ API token: {}",
                if legacy.api_token.is_some() {
                    "configured"
                } else {
                    "(none)"
                }
            );
        }
        None => {
            println!("   └─ (not configured)");
        }
    }

    // Scheduler
    println!("\n⚙️  Scheduler");
    println!("   ├─ Interval: {}s", blueprint.scheduler.interval_secs);
    println!("   └─ Enabled: {}", blueprint.scheduler.enabled);

    // Ingestion
    println!("\n⏱️  Ingestion");
    println!(
        "   └─ Rate window: {}s",
        blueprint.ingestion.rate_window_secs
    );

    // Destinations
    println!("\n📤 Destinations ({})", blueprint.destinations.len());
    for (i, destination) in blueprint.destinations.iter().enumerate() {
        let is_last = i == blueprint.destinations.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        let state = if destination.is_active {
            "active"
        } else {
            "inactive"
        };
        println!("   {} {} ({})", prefix, destination.name, state);

        if args.destinations {
            println!("   {}  ├─ URL: {}", child_prefix, destination.url);
            match destination.target_type {
                Some(filter) => {
                    println!("   {}  ├─ Target type: {}", child_prefix, filter);
                }
                None => {
                    println!("   {}  ├─ Target type: (auto-detect)", child_prefix);
                }
            }
            println!(
                "   {}  └─ Mapping: {} field(s), {} extra header(s)",
                child_prefix,
                destination.mapping.len(),
                destination.headers.len()
            );
        }
    }

    println!();
}
