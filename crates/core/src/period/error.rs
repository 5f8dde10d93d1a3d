//! Reporting period errors.

use thiserror::Error;

use super::types::PeriodStatus;
use crate::store::StoreError;

/// A mutation was attempted on a transaction dated in a closed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Transaction cannot be modified because the {year} reporting period is closed")]
pub struct ClosedPeriodError {
    /// Calendar year of the closed period.
    pub year: i32,
}

/// Errors raised by period transitions.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// The status change is not permitted.
    #[error("Cannot move reporting period from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: PeriodStatus,
        /// Requested status.
        to: PeriodStatus,
    },

    /// Closing would leave unposted transactions dated inside the period.
    #[error("Cannot close {year}: {count} transaction(s) are still unposted")]
    UnpostedTransactions {
        /// Period year.
        year: i32,
        /// Number of unposted transactions.
        count: usize,
    },

    /// Backing store failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl PeriodError {
    /// Machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_PERIOD_TRANSITION",
            Self::UnpostedTransactions { .. } => "UNPOSTED_TRANSACTIONS",
            Self::Persistence(e) => e.error_code(),
        }
    }
}
