//! Property-based tests for the posting engine.
//!
//! - Balance integrity: debits equal credits in both currencies
//! - VAT rows match `round(line_total × rate / 100)`
//! - Row count is two per line plus two per non-zero VAT

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use folio_shared::types::{AccountId, CurrencyId, EntityId, LineItemId, VatId};

use super::entry::EntryType;
use super::posting::{PostingContext, PostingEngine};
use crate::currency::CurrencyService;
use crate::transaction::{LineItem, NewTransaction, Transaction, TransactionType};
use crate::vat::AppliedVat;

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 100.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000i64).prop_map(|v| Decimal::new(v, 1))
}

fn vat_rate() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((0i64..=2_500i64).prop_map(|bp| Decimal::new(bp, 2)))
}

fn transaction_type() -> impl Strategy<Value = TransactionType> {
    prop::sample::select(TransactionType::ALL.to_vec())
}

fn build(kind: TransactionType, lines: &[(Decimal, Decimal, Option<Decimal>)]) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let input = NewTransaction::new(kind, AccountId::new(), date, "prop");
    let mut tx = Transaction::new(EntityId::new(), input, CurrencyId::new(), Utc::now()).unwrap();
    for (amount, quantity, rate) in lines {
        let item = LineItem {
            id: LineItemId::new(),
            transaction_id: tx.id,
            account_id: AccountId::new(),
            narration: None,
            amount: *amount,
            quantity: *quantity,
            vat: rate.map(|rate| AppliedVat {
                vat_id: VatId::new(),
                rate,
                account_id: AccountId::new(),
            }),
        };
        tx.add_line_item(item).unwrap();
    }
    tx
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_posting_balances(
        kind in transaction_type(),
        lines in prop::collection::vec((positive_amount(), quantity(), vat_rate()), 1..10),
        rate in positive_rate(),
        reporting_dp in 0u32..=3,
    ) {
        let tx = build(kind, &lines);
        let ctx = PostingContext {
            rate,
            transaction_decimal_places: 2,
            reporting_decimal_places: reporting_dp,
        };
        let entries = PostingEngine::entries(&tx, ctx).unwrap();

        let debits: Decimal = entries.iter().filter(|e| e.entry_type == EntryType::Debit).map(|e| e.amount).sum();
        let credits: Decimal = entries.iter().filter(|e| e.entry_type == EntryType::Credit).map(|e| e.amount).sum();
        prop_assert_eq!(debits, credits);

        let tx_debits: Decimal = entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Debit)
            .map(|e| e.transaction_currency_amount)
            .sum();
        prop_assert_eq!(Ok(tx_debits), tx.amount(2));
    }

    #[test]
    fn prop_vat_rows_match_formula(
        kind in transaction_type(),
        lines in prop::collection::vec((positive_amount(), quantity(), vat_rate()), 1..10),
    ) {
        let tx = build(kind, &lines);
        let ctx = PostingContext {
            rate: Decimal::ONE,
            transaction_decimal_places: 2,
            reporting_decimal_places: 2,
        };
        let entries = PostingEngine::entries(&tx, ctx).unwrap();

        let mut expected_rows = 0;
        for item in &tx.line_items {
            expected_rows += 2;
            let rows: Vec<_> = entries.iter().filter(|e| e.line_item_id == Some(item.id)).collect();
            if let Some(vat) = item.vat {
                let expected = CurrencyService::round(item.total(2).unwrap() * vat.rate / Decimal::ONE_HUNDRED, 2);
                if expected.is_zero() {
                    prop_assert_eq!(rows.len(), 2);
                } else {
                    expected_rows += 2;
                    prop_assert_eq!(rows.len(), 4);
                    prop_assert_eq!(rows[2].transaction_currency_amount, expected);
                    prop_assert!(rows[2].post_account == vat.account_id || rows[2].folio_account == vat.account_id);
                }
            }
        }
        prop_assert_eq!(entries.len(), expected_rows);
    }

    #[test]
    fn prop_main_account_on_credited_side(
        kind in transaction_type(),
        lines in prop::collection::vec((positive_amount(), quantity(), vat_rate()), 1..5),
    ) {
        let tx = build(kind, &lines);
        let ctx = PostingContext {
            rate: Decimal::ONE,
            transaction_decimal_places: 2,
            reporting_decimal_places: 2,
        };
        let main_side = if tx.credited { EntryType::Credit } else { EntryType::Debit };
        for entry in PostingEngine::entries(&tx, ctx).unwrap() {
            prop_assert_eq!(entry.post_account == tx.account_id, entry.entry_type == main_side);
        }
    }
}
