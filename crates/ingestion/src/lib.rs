//! # Ingestion
//!
//! Ingestion rate gate and payload intake.
//!
//! Responsibilities:
//! - Decode incoming sensor JSON (with legacy field aliases)
//! - Admit or drop arrivals per device based on recency
//! - Insert admitted records into the store
//!
//! The transport client that delivers raw messages is out of scope; the
//! replay source stands in for it.

pub mod decode;
pub mod gate;
pub mod metrics;
pub mod replay;

pub use decode::decode_record;
pub use gate::{IngestOutcome, IngestionGate};
pub use metrics::{IngestionMetrics, MetricsSnapshot};
pub use replay::{ReplayStats, ReplaySource};
