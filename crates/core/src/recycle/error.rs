//! Recycle bin errors.

use thiserror::Error;

use super::types::RecordRef;
use crate::period::ClosedPeriodError;
use crate::store::StoreError;

/// Errors raised by soft delete, restore and destroy.
#[derive(Debug, Error)]
pub enum RecycleError {
    /// Clearances still reference the transaction.
    #[error("{record} has {count} clearance(s) and cannot be deleted")]
    HangingClearances {
        /// The record being deleted.
        record: RecordRef,
        /// Number of clearances on either side.
        count: usize,
    },

    /// Other live records still reference the record.
    #[error("{record} is referenced by {count} record(s) and cannot be deleted")]
    HangingReferences {
        /// The record being deleted.
        record: RecordRef,
        /// Number of referencing records.
        count: usize,
    },

    /// The record points at something that is no longer active.
    #[error("{record} cannot be restored while {dependency} is deleted")]
    DeletedDependency {
        /// The record being restored.
        record: RecordRef,
        /// The inactive record it points at.
        dependency: RecordRef,
    },

    /// Another active record has taken the record's place.
    #[error("{record} cannot be restored because {replacement} is active")]
    Replaced {
        /// The record being restored.
        record: RecordRef,
        /// The active record in its place.
        replacement: RecordRef,
    },

    /// Only soft-deleted records can be restored or destroyed.
    #[error("{0} is not in the recycle bin")]
    NotDeleted(RecordRef),

    /// The record is already in the recycle bin.
    #[error("{0} has already been deleted")]
    AlreadyDeleted(RecordRef),

    /// Destroyed records are gone for good.
    #[error("{0} has been destroyed")]
    AlreadyDestroyed(RecordRef),

    /// The transaction's period is closed.
    #[error(transparent)]
    ClosedPeriod(#[from] ClosedPeriodError),

    /// No such record.
    #[error("{0} not found")]
    NotFound(RecordRef),

    /// Backing store failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl RecycleError {
    /// Machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::HangingClearances { .. } => "HANGING_CLEARANCES",
            Self::HangingReferences { .. } => "HANGING_REFERENCES",
            Self::DeletedDependency { .. } => "DELETED_DEPENDENCY",
            Self::Replaced { .. } => "REPLACED",
            Self::NotDeleted(_) => "NOT_DELETED",
            Self::AlreadyDeleted(_) => "ALREADY_DELETED",
            Self::AlreadyDestroyed(_) => "ALREADY_DESTROYED",
            Self::ClosedPeriod(_) => "CLOSED_PERIOD",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Persistence(e) => e.error_code(),
        }
    }
}
