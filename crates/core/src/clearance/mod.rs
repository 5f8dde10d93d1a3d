//! Settlement of outstanding transactions.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod props;

pub use engine::{ClearanceEngine, Settlement};
pub use error::ClearanceError;
pub use types::Clearance;
