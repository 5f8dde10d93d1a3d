//! Conversion and rounding helpers.
//!
//! All monetary rounding in the engine goes through here so that every
//! amount uses Banker's Rounding (`MidpointNearestEven`).

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Stateless currency arithmetic.
pub struct CurrencyService;

impl CurrencyService {
    /// Translates `amount` at `rate` and rounds to `decimal_places`.
    /// `None` on overflow.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use folio_core::currency::CurrencyService;
    ///
    /// assert_eq!(CurrencyService::convert(dec!(100), dec!(1.5), 2), Some(dec!(150.00)));
    /// ```
    #[must_use]
    pub fn convert(amount: Decimal, rate: Decimal, decimal_places: u32) -> Option<Decimal> {
        amount
            .checked_mul(rate)
            .map(|value| Self::round(value, decimal_places))
    }

    /// Rounds with Banker's Rounding.
    ///
    /// - 2.5 → 2
    /// - 3.5 → 4
    /// - 2.25 → 2.2 (one decimal)
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }

    /// `round(amount × percent / 100)`. Used for VAT. `None` on overflow.
    #[must_use]
    pub fn percentage(amount: Decimal, percent: Decimal, decimal_places: u32) -> Option<Decimal> {
        amount
            .checked_mul(percent)?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(|value| Self::round(value, decimal_places))
    }
}
