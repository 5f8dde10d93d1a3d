//! Clearance errors.

use rust_decimal::Decimal;
use thiserror::Error;
use folio_shared::types::{ClearanceId, TransactionId};

use crate::recycle::RecordRef;
use crate::store::StoreError;
use crate::transaction::{TransactionType, ValidationError};

/// Reasons an allocation is rejected.
#[derive(Debug, Error)]
pub enum ClearanceError {
    /// Both sides must be posted.
    #[error("Transaction {0} must be posted before it can be cleared")]
    UnpostedTransaction(TransactionId),

    /// The clearing side cannot settle other transactions.
    #[error("{0} transactions cannot be used to clear other transactions")]
    UnassignableTransaction(TransactionType),

    /// The target cannot be settled.
    #[error("{0} transactions cannot be cleared")]
    UnclearableTransaction(TransactionType),

    /// A transaction cannot clear itself.
    #[error("Transaction cannot clear itself")]
    SelfClearance,

    /// Both transactions must share a main account.
    #[error("Clearing and cleared transactions must have the same main account")]
    MainAccountMismatch,

    /// Both transactions must share a currency.
    #[error("Clearing and cleared transactions must be in the same currency")]
    CurrencyMismatch,

    /// A clearing transaction must post on the opposite side of its target.
    #[error("Clearing and cleared transactions must post on opposite sides")]
    IncompatibleEntrySide,

    /// A transaction may either clear or be cleared, not both.
    #[error("Transaction {0} cannot both clear and be cleared")]
    MixedAssignment(TransactionId),

    /// Allocations must be positive.
    #[error("Clearance amount must be positive, got {0}")]
    NegativeAmount(Decimal),

    /// The target's outstanding balance is smaller than the amount.
    #[error("Clearance of {requested} exceeds the {available} outstanding on the cleared transaction")]
    OverClearance {
        /// Requested amount.
        requested: Decimal,
        /// Uncleared balance.
        available: Decimal,
    },

    /// The clearing transaction has less left to allocate than the amount.
    #[error("Clearance of {requested} exceeds the {available} unallocated on the clearing transaction")]
    OverAllocation {
        /// Requested amount.
        requested: Decimal,
        /// Unallocated balance.
        available: Decimal,
    },

    /// No such record.
    #[error("{0} not found")]
    NotFound(RecordRef),

    /// No such clearance.
    #[error("Clearance not found: {0}")]
    ClearanceNotFound(ClearanceId),

    /// The transaction total is not representable.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backing store failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl ClearanceError {
    /// Machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnpostedTransaction(_) => "UNPOSTED_TRANSACTION",
            Self::UnassignableTransaction(_) => "UNASSIGNABLE_TRANSACTION",
            Self::UnclearableTransaction(_) => "UNCLEARABLE_TRANSACTION",
            Self::SelfClearance => "SELF_CLEARANCE",
            Self::MainAccountMismatch => "MAIN_ACCOUNT_MISMATCH",
            Self::CurrencyMismatch => "CURRENCY_MISMATCH",
            Self::IncompatibleEntrySide => "INCOMPATIBLE_ENTRY_SIDE",
            Self::MixedAssignment(_) => "MIXED_ASSIGNMENT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::OverClearance { .. } => "OVER_CLEARANCE",
            Self::OverAllocation { .. } => "OVER_ALLOCATION",
            Self::NotFound(_) | Self::ClearanceNotFound(_) => "NOT_FOUND",
            Self::Validation(e) => e.error_code(),
            Self::Persistence(e) => e.error_code(),
        }
    }

    /// Returns true if repeating the call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Persistence(e) => e.is_retryable(),
            _ => false,
        }
    }
}
