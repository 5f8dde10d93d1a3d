//! Property tests for currency rounding and rate selection.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use folio_shared::types::{CurrencyId, EntityId};

use super::exchange::{ExchangeRate, select_rate};
use super::service::CurrencyService;

/// 0.01 to 1,000,000.00
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// 0.0001 to 10000.0000
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn decimal_places() -> impl Strategy<Value = u32> {
    0u32..=4
}

fn vat_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|bp| Decimal::new(bp, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_convert_respects_precision(
        amount in positive_amount(),
        rate in positive_rate(),
        dp in decimal_places(),
    ) {
        let result = CurrencyService::convert(amount, rate, dp).unwrap();
        prop_assert!(result.scale() <= dp, "{} has more than {} places", result, dp);
    }

    #[test]
    fn prop_convert_within_half_unit(
        amount in positive_amount(),
        rate in positive_rate(),
        dp in decimal_places(),
    ) {
        let exact = amount * rate;
        let result = CurrencyService::convert(amount, rate, dp).unwrap();
        let half_unit = Decimal::new(5, dp + 1);
        prop_assert!((result - exact).abs() <= half_unit);
    }

    #[test]
    fn prop_identity_rate_preserves_cents(amount in positive_amount()) {
        prop_assert_eq!(CurrencyService::convert(amount, Decimal::ONE, 2), Some(amount));
    }

    #[test]
    fn prop_percentage_matches_formula(amount in positive_amount(), rate in vat_rate()) {
        let vat = CurrencyService::percentage(amount, rate, 2).unwrap();
        let expected = CurrencyService::round(amount * rate / Decimal::ONE_HUNDRED, 2);
        prop_assert_eq!(vat, expected);
        prop_assert!(vat >= Decimal::ZERO);
        prop_assert!(vat <= amount);
    }

    #[test]
    fn prop_selected_rate_is_latest_applicable(
        offsets in prop::collection::vec(0i64..365, 1..20),
        query in 0i64..400,
    ) {
        let entity = EntityId::new();
        let currency = CurrencyId::new();
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let now = Utc::now();
        let rates: Vec<ExchangeRate> = offsets
            .iter()
            .enumerate()
            .map(|(i, days)| {
                ExchangeRate::new(
                    entity,
                    currency,
                    Decimal::from(i + 1),
                    base + Duration::days(*days),
                    now + Duration::milliseconds(i64::try_from(i).unwrap()),
                )
                .unwrap()
            })
            .collect();
        let on = base + Duration::days(query);

        match select_rate(&rates, currency, on) {
            Some(picked) => {
                prop_assert!(picked.valid_from <= on);
                for r in rates.iter().filter(|r| r.valid_from <= on) {
                    prop_assert!((r.valid_from, r.created_at) <= (picked.valid_from, picked.created_at));
                }
            }
            None => prop_assert!(rates.iter().all(|r| r.valid_from > on)),
        }
    }
}
