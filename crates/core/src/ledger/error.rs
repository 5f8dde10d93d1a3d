//! Posting errors.
//!
//! Every variant is raised before anything is written, except
//! `Persistence`, which means the store rejected an otherwise valid batch.

use thiserror::Error;
use folio_shared::AppError;
use folio_shared::types::TransactionId;

use super::validation::LedgerValidationError;
use crate::currency::CurrencyError;
use crate::period::ClosedPeriodError;
use crate::recycle::RecordRef;
use crate::store::StoreError;
use crate::transaction::ValidationError;

/// Errors that can occur while creating, editing, posting or unposting.
#[derive(Debug, Error)]
pub enum PostingError {
    /// Account type, amount or edit rule violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The period for the transaction date is closed.
    #[error(transparent)]
    ClosedPeriod(#[from] ClosedPeriodError),

    /// Rate lookup failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Nothing to post.
    #[error("Transaction {0} has no line items")]
    MissingLineItems(TransactionId),

    /// Already posted.
    #[error("Transaction {0} is already posted")]
    AlreadyPosted(TransactionId),

    /// Unpost called on an unposted transaction.
    #[error("Transaction {0} is not posted")]
    NotPosted(TransactionId),

    /// Clearances reference the transaction.
    #[error("Transaction {transaction} has {count} clearance(s) and cannot be unposted")]
    HangingClearances {
        /// The transaction.
        transaction: TransactionId,
        /// Number of clearances on either side.
        count: usize,
    },

    /// Generated rows do not balance.
    #[error(transparent)]
    Unbalanced(#[from] LedgerValidationError),

    /// A referenced record does not exist or is inactive.
    #[error("{0} not found")]
    NotFound(RecordRef),

    /// Backing store failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::ClosedPeriod(_) => "CLOSED_PERIOD",
            Self::Currency(e) => e.error_code(),
            Self::MissingLineItems(_) => "MISSING_LINE_ITEMS",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::HangingClearances { .. } => "HANGING_CLEARANCES",
            Self::Unbalanced(_) => "UNBALANCED_TRANSACTION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Persistence(e) => e.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Persistence(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Validation(_) | PostingError::Unbalanced(_) => Self::Validation(err.to_string()),
            PostingError::NotFound(_) | PostingError::Currency(CurrencyError::NotFound(_)) => {
                Self::NotFound(err.to_string())
            }
            PostingError::Persistence(e) => e.into(),
            PostingError::Currency(_)
            | PostingError::ClosedPeriod(_)
            | PostingError::MissingLineItems(_)
            | PostingError::AlreadyPosted(_)
            | PostingError::NotPosted(_)
            | PostingError::HangingClearances { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
