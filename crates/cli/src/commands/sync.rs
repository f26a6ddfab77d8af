//! `sync` command implementation - the manual bulk sync trigger.

use anyhow::{Context, Result};
use tracing::info;

use config_loader::ConfigLoader;
use contracts::SensorType;
use ingestion::ReplaySource;

use crate::cli::SyncArgs;
use crate::pipeline::GatewayStack;

/// Execute the `sync` command
pub async fn run_sync(args: &SyncArgs) -> Result<()> {
    let blueprint = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let type_filter: Option<SensorType> = args
        .type_filter
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("Invalid --type value")?;

    let stack = GatewayStack::build(&blueprint)?;

    if let Some(path) = &args.ingest {
        let stats = ReplaySource::replay_path(path, &stack.gate)
            .await
            .with_context(|| format!("Failed to replay {}", path.display()))?;
        info!(stored = stats.stored, "Ingest replay complete");
    }

    let report = stack.engine.sync_once(type_filter).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize sync report")?
        );
    } else {
        print_report(&report);
    }

    if report.is_success() {
        Ok(())
    } else {
        anyhow::bail!("Bulk sync failed: {}", report.message)
    }
}

fn print_report(report: &contracts::SyncReport) {
    let mark = if report.is_success() { "✓" } else { "✗" };
    let filter = report
        .type_filter
        .map(|t| t.to_string())
        .unwrap_or_else(|| "all".to_string());

    println!("{mark} {}", report.message);
    println!("  Type filter: {filter}");
    println!(
        "  Synced: {} / {} records",
        report.synced_count, report.total_records
    );
}
