//! # Sync Engine
//!
//! Bulk sync orchestration.
//!
//! Responsibilities:
//! - Pull the per-type batch from the store and project it
//! - Run the bulk dispatcher and shape the outcome into a `SyncReport`
//! - Drive the periodic sweep cycle (fixed interval, fixed type order)
//!
//! There is no retry: a failed sweep leaves the records in the store and
//! the next cycle naturally re-offers them.

pub mod engine;
pub mod scheduler;

pub use engine::{project_record, SyncEngine};
pub use scheduler::SweepScheduler;
