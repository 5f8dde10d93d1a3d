//! Concurrent posting and allocation against one shared store.
//!
//! These tests verify that:
//! - Posting from many threads never hands out the same number twice
//! - Concurrent allocations never clear more than a transaction's amount

use std::collections::HashSet;
use std::thread;

mod common;

use common::{books, today};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use folio_core::clearance::ClearanceError;
use folio_core::transaction::TransactionNumber;

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

#[test]
fn test_parallel_posts_get_unique_contiguous_numbers() {
    let books = books();

    let numbers: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    (0..PER_THREAD)
                        .map(|_| {
                            books
                                .posted_invoice(today(), dec!(1))
                                .transaction_no
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = numbers.iter().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);

    let mut sequences: Vec<u32> = numbers
        .iter()
        .map(|n| n.parse::<TransactionNumber>().unwrap().sequence)
        .collect();
    sequences.sort_unstable();
    let expected: Vec<u32> = (1..=u32::try_from(THREADS * PER_THREAD).unwrap()).collect();
    assert_eq!(sequences, expected);
}

#[test]
fn test_parallel_allocations_never_over_clear() {
    let books = books();
    let invoice = books.posted_invoice(today(), dec!(100));
    let receipts: Vec<_> = (0..20).map(|_| books.posted_receipt(today(), dec!(10))).collect();

    let results: Vec<Result<_, ClearanceError>> = receipts
        .par_iter()
        .map(|receipt| books.ledger.allocate(&books.ctx, receipt.id, invoice.id, dec!(10)))
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 10);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|err| matches!(err, ClearanceError::OverClearance { .. })));
    assert_eq!(books.ledger.cleared_amount(&books.ctx, invoice.id).unwrap().amount, dec!(100));
}

#[test]
fn test_parallel_auto_allocation_stays_bounded() {
    let books = books();
    let invoices: Vec<_> = (0..5).map(|_| books.posted_invoice(today(), dec!(30))).collect();
    let receipts: Vec<_> = (0..12).map(|_| books.posted_receipt(today(), dec!(17))).collect();

    receipts.par_iter().for_each(|receipt| {
        books.ledger.auto_allocate(&books.ctx, receipt.id).unwrap();
    });

    let cleared: Decimal = invoices
        .iter()
        .map(|invoice| {
            let cleared = books.ledger.cleared_amount(&books.ctx, invoice.id).unwrap().amount;
            assert!(cleared <= dec!(30));
            cleared
        })
        .sum();
    // 12 x 17 = 204 offered against 150 outstanding.
    assert_eq!(cleared, dec!(150));
}
