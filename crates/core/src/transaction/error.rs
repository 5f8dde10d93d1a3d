//! Transaction model validation errors.

use rust_decimal::Decimal;
use thiserror::Error;
use folio_shared::types::LineItemId;

use super::kind::TransactionType;
use crate::account::{AccountType, AccountTypeList};

/// Rule violations detected on a transaction before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The main account type is not allowed for the transaction type.
    #[error("{transaction_type} Main Account must be of type {expected}")]
    MainAccount {
        /// Transaction type being validated.
        transaction_type: TransactionType,
        /// Allowed account types.
        expected: AccountTypeList,
        /// Type of the offending account.
        actual: AccountType,
    },

    /// A line item account type is not allowed for the transaction type.
    #[error("{transaction_type} LineItem Account must be of type {expected}")]
    LineItemAccount {
        /// Transaction type being validated.
        transaction_type: TransactionType,
        /// Allowed account types.
        expected: AccountTypeList,
        /// Type of the offending account.
        actual: AccountType,
    },

    /// Amounts must be positive.
    #[error("LineItem amount must be positive, got {0}")]
    NegativeAmount(Decimal),

    /// Quantities must be positive.
    #[error("LineItem quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// Posted transactions are immutable until unposted.
    #[error("Transaction is posted and cannot be modified")]
    CannotModifyPosted,

    /// The credited side is fixed for every type except journal entries.
    #[error("{0} transactions cannot change their credited side")]
    CreditSideFixed(TransactionType),

    /// No such line item on the transaction.
    #[error("LineItem not found: {0}")]
    LineItemNotFound(LineItemId),

    /// The line item is already attached.
    #[error("LineItem {0} has already been added")]
    DuplicateLineItem(LineItemId),

    /// VAT rates are percentages.
    #[error("VAT rate must be between 0 and 100, got {0}")]
    InvalidVatRate(Decimal),

    /// A line total, VAT amount or conversion is too large to represent.
    #[error("Amount is too large to be represented")]
    AmountOverflow,
}

impl ValidationError {
    /// Machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MainAccount { .. } => "MAIN_ACCOUNT",
            Self::LineItemAccount { .. } => "LINE_ITEM_ACCOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::CreditSideFixed(_) => "CREDIT_SIDE_FIXED",
            Self::LineItemNotFound(_) => "LINE_ITEM_NOT_FOUND",
            Self::DuplicateLineItem(_) => "DUPLICATE_LINE_ITEM",
            Self::InvalidVatRate(_) => "INVALID_VAT_RATE",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
        }
    }
}
