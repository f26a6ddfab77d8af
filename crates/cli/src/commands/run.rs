//! `run` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use config_loader::ConfigLoader;
use ingestion::ReplaySource;
use sync_engine::SweepScheduler;

use crate::cli::RunArgs;
use crate::pipeline::GatewayStack;

/// Execute the `run` command
pub async fn run_gateway(args: &RunArgs) -> Result<()> {
    let blueprint = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.dry_run {
        println!("✓ Configuration is valid: {}", args.config.display());
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let stack = GatewayStack::build(&blueprint)?;

    // Replay recorded ingest traffic through the gate, if requested
    if let Some(path) = &args.ingest {
        let stats = ReplaySource::replay_path(path, &stack.gate)
            .await
            .with_context(|| format!("Failed to replay {}", path.display()))?;
        info!(
            stored = stats.stored,
            rate_limited = stats.rate_limited,
            rejected = stats.rejected,
            "Ingest replay complete"
        );
    }

    let scheduler = SweepScheduler::new(Arc::clone(&stack.engine), blueprint.sweep_interval());
    let aggregator = scheduler.aggregator();

    if args.once {
        scheduler.run_cycle().await;
    } else if blueprint.scheduler.enabled {
        let handle = scheduler.spawn();
        info!("Gateway running; press ctrl-c to stop");
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;
        // Shutdown is immediate: in-flight sends are not drained, the next
        // sweep re-offers whatever was missed
        handle.abort();
        info!("Shutdown requested");
    } else {
        warn!("Scheduler disabled in configuration; nothing to do");
        return Ok(());
    }

    let summary = {
        let aggregator = aggregator.lock().expect("aggregator lock poisoned");
        aggregator.summary()
    };
    if summary.total_sweeps > 0 {
        println!("{summary}");
    }

    let ingest = stack.gate.metrics().snapshot();
    info!(
        stored = ingest.stored,
        rate_limited = ingest.rate_limited,
        rejected = ingest.rejected,
        "Final ingestion counters"
    );

    Ok(())
}
