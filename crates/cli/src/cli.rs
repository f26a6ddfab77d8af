//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cloudsync - rule-driven sensor record forwarding gateway
#[derive(Parser, Debug)]
#[command(
    name = "cloudsync",
    author,
    version,
    about = "Cloud sync dispatch gateway for sensor records",
    long_about = "A rule-driven router that forwards locally stored sensor records \n\
                  to configured collector destinations.\n\n\
                  Admits incoming records through a per-device rate gate, sweeps the \n\
                  store on a fixed interval per sensor type, and fans each batch out \n\
                  to every qualifying destination."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CLOUDSYNC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "CLOUDSYNC_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gateway (scheduler plus optional replay ingest)
    Run(RunArgs),

    /// Trigger one bulk sync and print the report
    Sync(SyncArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "gateway.toml", env = "CLOUDSYNC_CONFIG")]
    pub config: PathBuf,

    /// JSON-lines file replayed through the ingestion gate at startup
    #[arg(long, env = "CLOUDSYNC_INGEST")]
    pub ingest: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "CLOUDSYNC_METRICS_PORT")]
    pub metrics_port: u16,

    /// Run a single sweep cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `sync` command
#[derive(Parser, Debug, Clone)]
pub struct SyncArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "gateway.toml", env = "CLOUDSYNC_CONFIG")]
    pub config: PathBuf,

    /// Sweep only this sensor type (default: every type)
    #[arg(short = 't', long = "type")]
    pub type_filter: Option<String>,

    /// JSON-lines file replayed through the ingestion gate first
    #[arg(long)]
    pub ingest: Option<PathBuf>,

    /// Output the sync report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "gateway.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "gateway.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detailed destination information
    #[arg(long)]
    pub destinations: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
