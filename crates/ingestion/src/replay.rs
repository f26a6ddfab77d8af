//! Replay source - feeds recorded messages through the gate
//!
//! Reads JSON lines (one message per line, as the transport would deliver
//! them) and pushes each through the ingestion gate. Stands in for the
//! out-of-scope transport client during development and tests.

use std::io::BufRead;
use std::path::Path;

use chrono::Utc;
use tracing::{info, instrument};

use contracts::{ContractError, RecordStore};

use crate::gate::{IngestOutcome, IngestionGate};

/// Totals for one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub stored: u64,
    pub rate_limited: u64,
    pub rejected: u64,
}

/// JSON-lines replay source.
pub struct ReplaySource;

impl ReplaySource {
    /// Replay every line of a file through the gate.
    #[instrument(name = "replay_file", skip(gate))]
    pub async fn replay_path<S>(
        path: &Path,
        gate: &IngestionGate<S>,
    ) -> Result<ReplayStats, ContractError>
    where
        S: RecordStore + Send + Sync,
    {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let stats = Self::replay_lines(reader, gate).await?;
        info!(
            stored = stats.stored,
            rate_limited = stats.rate_limited,
            rejected = stats.rejected,
            "Replay finished"
        );
        Ok(stats)
    }

    /// Replay every line of a reader through the gate.
    ///
    /// Blank lines are skipped; each message is stamped at arrival time.
    pub async fn replay_lines<R, S>(
        reader: R,
        gate: &IngestionGate<S>,
    ) -> Result<ReplayStats, ContractError>
    where
        R: BufRead,
        S: RecordStore + Send + Sync,
    {
        let mut stats = ReplayStats::default();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match gate.ingest(&line, Utc::now()).await {
                IngestOutcome::Stored => stats.stored += 1,
                IngestOutcome::RateLimited => stats.rate_limited += 1,
                IngestOutcome::Rejected(_) => stats.rejected += 1,
            }
        }
        Ok(stats)
    }
}
