//! Command implementations.

mod info;
mod run;
mod sync;
mod validate;

pub use info::run_info;
pub use run::run_gateway;
pub use sync::run_sync;
pub use validate::run_validate;
