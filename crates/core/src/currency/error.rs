//! Currency and exchange rate errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use folio_shared::types::{CurrencyId, ExchangeRateId};

use crate::store::StoreError;

/// Errors raised by currency lookups and rate validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// No rate is recorded for a foreign currency on or before the date.
    #[error("No exchange rate found for currency {currency} on {date}")]
    MissingExchangeRate {
        /// Currency that needed translating.
        currency: CurrencyId,
        /// Transaction date.
        date: NaiveDate,
    },

    /// Exchange rates must be strictly positive.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),

    /// An explicit rate was supplied for a different currency.
    #[error("Exchange rate {rate} does not belong to currency {currency}")]
    RateCurrencyMismatch {
        /// The supplied rate.
        rate: ExchangeRateId,
        /// The transaction currency.
        currency: CurrencyId,
    },

    /// Unknown currency.
    #[error("Currency not found: {0}")]
    NotFound(CurrencyId),

    /// Backing store failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl CurrencyError {
    /// Machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingExchangeRate { .. } => "MISSING_EXCHANGE_RATE",
            Self::InvalidRate(_) => "INVALID_EXCHANGE_RATE",
            Self::RateCurrencyMismatch { .. } => "RATE_CURRENCY_MISMATCH",
            Self::NotFound(_) => "CURRENCY_NOT_FOUND",
            Self::Persistence(e) => e.error_code(),
        }
    }
}
