//! Sweep metrics collection
//!
//! Records per-sweep outcomes on the metrics facade and aggregates them in
//! memory for end-of-run summaries.

use std::collections::HashMap;

use contracts::SyncReport;
use metrics::{counter, histogram};

/// Record one sweep outcome.
///
/// Called once per sensor type per cycle (and per manual trigger).
pub fn record_sweep_report(sweep_type: &str, report: &SyncReport) {
    let status = if report.is_success() {
        "success"
    } else {
        "failure"
    };
    counter!(
        "cloudsync_sweeps_total",
        "sweep_type" => sweep_type.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    if report.synced_count > 0 {
        counter!(
            "cloudsync_records_synced_total",
            "sweep_type" => sweep_type.to_string()
        )
        .increment(report.synced_count as u64);
    }

    histogram!("cloudsync_sweep_batch_size").record(report.total_records as f64);
}

/// Sweep statistics aggregator.
///
/// Aggregates reports in memory for a readable summary.
#[derive(Debug, Clone, Default)]
pub struct SweepAggregator {
    total_sweeps: u64,
    failed_sweeps: u64,
    records_synced: u64,
    /// Batch size statistics across sweeps
    batch_stats: RunningStats,
    /// Failure counts per sweep type
    failure_counts: HashMap<String, u64>,
}

impl SweepAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one report into the aggregate
    pub fn update(&mut self, sweep_type: &str, report: &SyncReport) {
        self.total_sweeps += 1;
        self.records_synced += report.synced_count as u64;
        self.batch_stats.push(report.total_records as f64);

        if !report.is_success() {
            self.failed_sweeps += 1;
            *self
                .failure_counts
                .entry(sweep_type.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Sweeps observed so far
    pub fn total_sweeps(&self) -> u64 {
        self.total_sweeps
    }

    /// Produce a summary report
    pub fn summary(&self) -> SweepSummary {
        SweepSummary {
            total_sweeps: self.total_sweeps,
            failed_sweeps: self.failed_sweeps,
            records_synced: self.records_synced,
            failure_rate: if self.total_sweeps > 0 {
                self.failed_sweeps as f64 / self.total_sweeps as f64 * 100.0
            } else {
                0.0
            },
            batch_size: StatsSummary::from(&self.batch_stats),
            failure_counts: self.failure_counts.clone(),
        }
    }

    /// Reset the aggregate
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Aggregated sweep summary
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    pub total_sweeps: u64,
    pub failed_sweeps: u64,
    pub records_synced: u64,
    pub failure_rate: f64,
    pub batch_size: StatsSummary,
    pub failure_counts: HashMap<String, u64>,
}

impl std::fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Sweep Summary ===")?;
        writeln!(f, "Total sweeps: {}", self.total_sweeps)?;
        writeln!(
            f,
            "Failed sweeps: {} ({:.2}%)",
            self.failed_sweeps, self.failure_rate
        )?;
        writeln!(f, "Records synced: {}", self.records_synced)?;
        writeln!(f, "Batch size: {}", self.batch_size)?;

        if !self.failure_counts.is_empty() {
            writeln!(f, "Failures per type:")?;
            for (sweep_type, count) in &self.failure_counts {
                writeln!(f, "  {}: {}", sweep_type, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Push a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
