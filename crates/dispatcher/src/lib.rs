//! # Dispatcher
//!
//! Cloud dispatch core.
//!
//! Responsibilities:
//! - Classify records into sensor types (fixed priority order)
//! - Reshape payloads per destination mapping
//! - Resolve final URLs (self-loop guard, pinned types, suffix table)
//! - Fan out single records and bulk batches to qualifying destinations
//!
//! Fail-closed: when the registry state is unreadable nothing is sent.
//! Per-destination failures never abort the loop.

pub mod classify;
pub mod client;
pub mod error;
pub mod mapping;
pub mod metrics;
pub mod resolve;
pub mod send;

pub use classify::{classify, CLASSIFY_ORDER};
pub use client::HttpDeliveryClient;
pub use error::DispatchError;
pub use mapping::{apply_mapping, default_headers, parse_headers, parse_mapping};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use resolve::{resolved_destination, Resolution, SkipReason, UrlResolver, GENERIC_SUFFIX};
pub use send::{CloudDispatcher, DispatcherConfig};
