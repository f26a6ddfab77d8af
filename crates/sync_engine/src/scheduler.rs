//! SweepScheduler - periodic bulk sync driver
//!
//! One cycle per interval; each cycle visits every sensor type in the
//! fixed sweep order. A failed type is logged and never stops the
//! remaining types or the next cycle. Outbound HTTP runs entirely on this
//! task, off the ingestion and request-handling paths.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use contracts::{DeliveryClient, DestinationRegistry, RecordStore, SensorType};
use observability::SweepAggregator;

use crate::engine::SyncEngine;

/// Periodic sweep driver.
pub struct SweepScheduler<S, R, C> {
    engine: Arc<SyncEngine<S, R, C>>,
    interval: Duration,
    aggregator: Arc<Mutex<SweepAggregator>>,
}

impl<S, R, C> SweepScheduler<S, R, C>
where
    S: RecordStore + Send + Sync + 'static,
    R: DestinationRegistry + Send + Sync + 'static,
    C: DeliveryClient + Send + Sync + 'static,
{
    pub fn new(engine: Arc<SyncEngine<S, R, C>>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            aggregator: Arc::new(Mutex::new(SweepAggregator::new())),
        }
    }

    /// Shared sweep statistics (for the end-of-run summary).
    pub fn aggregator(&self) -> Arc<Mutex<SweepAggregator>> {
        Arc::clone(&self.aggregator)
    }

    /// Spawn the scheduler loop as a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop. The first cycle fires one interval after
    /// start; a cycle that overruns delays the next instead of bursting.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Sweep scheduler started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; consume that tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// One full cycle: every sensor type in sweep order.
    #[instrument(name = "sweep_cycle", skip(self))]
    pub async fn run_cycle(&self) {
        info!("Auto-sync cycle started");

        for sweep_type in SensorType::ALL {
            let report = self.engine.sweep_type(sweep_type).await;
            if report.is_success() {
                debug!(
                    sweep_type = %sweep_type,
                    synced = report.synced_count,
                    total = report.total_records,
                    "Sweep completed"
                );
            } else {
                warn!(
                    sweep_type = %sweep_type,
                    message = %report.message,
                    "Sweep failed, continuing with remaining types"
                );
            }

            let mut aggregator = self.aggregator.lock().expect("aggregator lock poisoned");
            aggregator.update(sweep_type.as_str(), &report);
        }

        info!("Auto-sync cycle finished");
    }
}
