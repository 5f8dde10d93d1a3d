//! Time-indexed exchange rates.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use folio_shared::types::{CurrencyId, EntityId, ExchangeRateId};

use super::error::CurrencyError;

/// Rate from a currency into the entity's reporting currency.
///
/// `1 unit of currency = rate units of reporting currency`, effective from
/// `valid_from` until superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Unique identifier.
    pub id: ExchangeRateId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// Currency being translated.
    pub currency_id: CurrencyId,
    /// Conversion factor, always positive.
    pub rate: Decimal,
    /// First date the rate applies to.
    pub valid_from: NaiveDate,
    /// Insertion time. Breaks ties between rates with the same `valid_from`.
    pub created_at: DateTime<Utc>,
    /// Set when moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when permanently destroyed.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidRate` if `rate` is zero or negative.
    pub fn new(
        entity_id: EntityId,
        currency_id: CurrencyId,
        rate: Decimal,
        valid_from: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate(rate));
        }
        Ok(Self {
            id: ExchangeRateId::new(),
            entity_id,
            currency_id,
            rate,
            valid_from,
            created_at,
            deleted_at: None,
            destroyed_at: None,
        })
    }

    /// Returns true unless soft-deleted or destroyed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.destroyed_at.is_none()
    }

    /// Returns true if the rate is live and already in effect on `date`.
    #[must_use]
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.is_active() && self.valid_from <= date
    }
}

/// Picks the rate in effect for `currency` on `date`.
///
/// The latest `valid_from` not after `date` wins; equal dates resolve to the
/// most recently created rate. Inactive rates are skipped.
#[must_use]
pub fn select_rate<'a, I>(rates: I, currency: CurrencyId, date: NaiveDate) -> Option<&'a ExchangeRate>
where
    I: IntoIterator<Item = &'a ExchangeRate>,
{
    rates
        .into_iter()
        .filter(|r| r.currency_id == currency && r.applies_on(date))
        .max_by_key(|r| (r.valid_from, r.created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let result = ExchangeRate::new(
            EntityId::new(),
            CurrencyId::new(),
            dec!(0),
            date(2024, 1, 1),
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), CurrencyError::InvalidRate(dec!(0)));
    }

    #[test]
    fn test_select_most_recent_not_after_date() {
        let entity = EntityId::new();
        let eur = CurrencyId::new();
        let now = Utc::now();
        let rates = vec![
            ExchangeRate::new(entity, eur, dec!(1.10), date(2024, 1, 1), now).unwrap(),
            ExchangeRate::new(entity, eur, dec!(1.20), date(2024, 3, 1), now).unwrap(),
            ExchangeRate::new(entity, eur, dec!(1.30), date(2024, 6, 1), now).unwrap(),
        ];

        let picked = select_rate(&rates, eur, date(2024, 4, 15)).unwrap();
        assert_eq!(picked.rate, dec!(1.20));
        assert!(select_rate(&rates, eur, date(2023, 12, 31)).is_none());
    }

    #[test]
    fn test_select_tie_prefers_latest_created() {
        let entity = EntityId::new();
        let eur = CurrencyId::new();
        let now = Utc::now();
        let older = ExchangeRate::new(entity, eur, dec!(1.10), date(2024, 1, 1), now).unwrap();
        let newer = ExchangeRate::new(
            entity,
            eur,
            dec!(1.15),
            date(2024, 1, 1),
            now + Duration::seconds(5),
        )
        .unwrap();
        let rates = [newer, older];

        assert_eq!(select_rate(&rates, eur, date(2024, 2, 1)).unwrap().rate, dec!(1.15));
    }

    #[test]
    fn test_select_skips_deleted_and_other_currencies() {
        let entity = EntityId::new();
        let eur = CurrencyId::new();
        let gbp = CurrencyId::new();
        let now = Utc::now();
        let mut deleted = ExchangeRate::new(entity, eur, dec!(2), date(2024, 2, 1), now).unwrap();
        deleted.deleted_at = Some(now);
        let rates = vec![
            ExchangeRate::new(entity, eur, dec!(1.10), date(2024, 1, 1), now).unwrap(),
            deleted,
            ExchangeRate::new(entity, gbp, dec!(1.25), date(2024, 2, 1), now).unwrap(),
        ];

        assert_eq!(select_rate(&rates, eur, date(2024, 3, 1)).unwrap().rate, dec!(1.10));
    }
}
