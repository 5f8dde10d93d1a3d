//! Yearly reporting periods and the posting gate.

pub mod error;
pub mod types;

#[cfg(test)]
mod props;

pub use error::{ClosedPeriodError, PeriodError};
pub use types::{PeriodStatus, ReportingPeriod, ensure_open};
