//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    listen: String,
    destination_count: usize,
    active_destination_count: usize,
    legacy_configured: bool,
    sweep_interval_secs: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            let active_count = blueprint.destinations.iter().filter(|d| d.is_active).count();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    listen: format!(
                        "{}:{}",
                        blueprint.gateway.listen_host, blueprint.gateway.listen_port
                    ),
                    destination_count: blueprint.destinations.len(),
                    active_destination_count: active_count,
                    legacy_configured: blueprint.legacy.is_some(),
                    sweep_interval_secs: blueprint.scheduler.interval_secs,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &contracts::GatewayBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.destinations.is_empty() && blueprint.legacy.is_none() {
        warnings.push(
            "No destinations and no legacy target configured - records will not be forwarded"
                .to_string(),
        );
    }

    if !blueprint.destinations.is_empty()
        && blueprint.destinations.iter().all(|d| !d.is_active)
    {
        warnings.push("Every destination is inactive - forwarding is paused".to_string());
    }

    if let Some(legacy) = &blueprint.legacy {
        if legacy.api_token.is_none() {
            warnings.push("legacy.api_token is not set - legacy sends go unauthenticated".to_string());
        }
        if !blueprint.destinations.is_empty() {
            warnings.push(
                "legacy target is configured but ignored while destinations exist".to_string(),
            );
        }
    }

    if !blueprint.scheduler.enabled {
        warnings.push("Scheduler is disabled - bulk sync only runs on manual trigger".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Listen: {}", summary.listen);
            println!(
                "  Destinations: {} ({} active)",
                summary.destination_count, summary.active_destination_count
            );
            println!("  Legacy target: {}", summary.legacy_configured);
            println!("  Sweep interval: {}s", summary.sweep_interval_secs);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
