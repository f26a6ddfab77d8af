//! Configuration validation
//!
//! Rules:
//! - destination names unique and non-empty
//! - destination URLs non-empty
//! - legacy base_url non-empty when the section is present
//! - interval_secs > 0
//! - rate_window_secs > 0

use std::collections::HashSet;

use contracts::{ContractError, GatewayBlueprint};

/// Validate a GatewayBlueprint.
///
/// Returns the first violation encountered, or Ok(()).
pub fn validate(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    validate_destinations(blueprint)?;
    validate_legacy(blueprint)?;
    validate_scheduler(blueprint)?;
    validate_ingestion(blueprint)?;
    Ok(())
}

fn validate_destinations(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for destination in &blueprint.destinations {
        if destination.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                "destinations[].name",
                "destination name must not be empty",
            ));
        }
        if !seen.insert(&destination.name) {
            return Err(ContractError::config_validation(
                format!("destinations[name={}]", destination.name),
                "duplicate destination name",
            ));
        }
        if destination.url.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("destinations[name={}].url", destination.name),
                "destination url must not be empty",
            ));
        }
    }
    Ok(())
}

fn validate_legacy(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    if let Some(legacy) = &blueprint.legacy {
        if legacy.base_url.trim().is_empty() {
            return Err(ContractError::config_validation(
                "legacy.base_url",
                "legacy base_url must not be empty",
            ));
        }
    }
    Ok(())
}

fn validate_scheduler(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    if blueprint.scheduler.interval_secs == 0 {
        return Err(ContractError::config_validation(
            "scheduler.interval_secs",
            "interval must be > 0",
        ));
    }
    Ok(())
}

fn validate_ingestion(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    if blueprint.ingestion.rate_window_secs == 0 {
        return Err(ContractError::config_validation(
            "ingestion.rate_window_secs",
            "rate window must be > 0",
        ));
    }
    Ok(())
}
