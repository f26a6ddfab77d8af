//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Wall-clock UTC (`chrono::DateTime<Utc>`) is the primary clock
//! - Timestamps render as RFC-3339 strings on the wire

mod blueprint;
mod delivery;
mod destination;
mod device_id;
mod error;
mod outcome;
mod record;
mod sensor_type;
mod store;

pub use blueprint::*;
pub use delivery::*;
pub use destination::*;
pub use device_id::DeviceId;
pub use error::*;
pub use outcome::*;
pub use record::*;
pub use sensor_type::*;
pub use store::{DestinationRegistry, RecordStore};
