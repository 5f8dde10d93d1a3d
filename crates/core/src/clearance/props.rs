//! Property tests for clearance bounds.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use folio_shared::types::{AccountId, CurrencyId, EntityId};

use super::engine::{ClearanceEngine, Settlement};
use crate::transaction::{NewTransaction, Transaction, TransactionType};

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn posted(kind: TransactionType, account: AccountId, currency: CurrencyId, day: i64) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day);
    let input = NewTransaction::new(kind, account, date, "prop");
    let mut tx = Transaction::new(EntityId::new(), input, currency, Utc::now()).unwrap();
    tx.posted = true;
    tx
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Applying any sequence of accepted allocations never pushes either
    /// side past its total.
    #[test]
    fn prop_accepted_allocations_stay_bounded(
        invoice_amount in amount(),
        receipt_amount in amount(),
        requests in prop::collection::vec(amount(), 1..20),
    ) {
        let account = AccountId::new();
        let currency = CurrencyId::new();
        let invoice = posted(TransactionType::ClientInvoice, account, currency, 0);
        let receipt = posted(TransactionType::ClientReceipt, account, currency, 1);
        let mut target = Settlement { amount: invoice_amount, cleared: Decimal::ZERO, allocated: Decimal::ZERO };
        let mut clearing = Settlement { amount: receipt_amount, cleared: Decimal::ZERO, allocated: Decimal::ZERO };

        for requested in requests {
            if ClearanceEngine::validate(&receipt, &clearing, &invoice, &target, requested).is_ok() {
                target.cleared += requested;
                clearing.allocated += requested;
            }
            prop_assert!(target.cleared <= target.amount);
            prop_assert!(clearing.allocated <= clearing.amount);
        }
    }

    /// The plan never allocates more than is available on either side.
    #[test]
    fn prop_plan_respects_balances(
        receipt_amount in amount(),
        invoices in prop::collection::vec((amount(), 0i64..60), 1..15),
    ) {
        let account = AccountId::new();
        let currency = CurrencyId::new();
        let receipt = posted(TransactionType::ClientReceipt, account, currency, 90);
        let targets: Vec<Transaction> = invoices
            .iter()
            .map(|(_, day)| posted(TransactionType::ClientInvoice, account, currency, *day))
            .collect();
        let candidates: Vec<(&Transaction, Settlement)> = targets
            .iter()
            .zip(&invoices)
            .map(|(tx, (amount, _))| (tx, Settlement { amount: *amount, cleared: Decimal::ZERO, allocated: Decimal::ZERO }))
            .collect();
        let clearing = Settlement { amount: receipt_amount, cleared: Decimal::ZERO, allocated: Decimal::ZERO };

        let plan = ClearanceEngine::plan(&receipt, &clearing, &candidates);
        let total: Decimal = plan.iter().map(|(_, amount)| *amount).sum();
        prop_assert!(total <= receipt_amount);
        let invoice_total: Decimal = invoices.iter().map(|(amount, _)| *amount).sum();
        prop_assert_eq!(total, receipt_amount.min(invoice_total));
        for (id, taken) in &plan {
            let (_, position) = candidates.iter().find(|(tx, _)| tx.id == *id).unwrap();
            prop_assert!(*taken > Decimal::ZERO);
            prop_assert!(*taken <= position.amount);
        }
    }
}
