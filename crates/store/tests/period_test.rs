//! Reporting period lifecycle.

mod common;

use common::{books, date};
use rust_decimal_macros::dec;
use folio_core::ledger::PostingError;
use folio_core::period::{PeriodError, PeriodStatus};
use folio_core::recycle::RecycleError;

#[test]
fn test_periods_are_created_lazily_and_numbered() {
    let books = books();
    let first = books.ledger.period_for(&books.ctx, date(2022, 5, 1)).unwrap();
    let second = books.ledger.period_for(&books.ctx, date(2023, 5, 1)).unwrap();
    assert_eq!((first.year, first.period_count), (2022, 1));
    assert_eq!((second.year, second.period_count), (2023, 2));
    assert_eq!(first.status, PeriodStatus::Open);
    assert_eq!(
        books.ledger.period_for(&books.ctx, date(2022, 12, 31)).unwrap().id,
        first.id
    );
}

#[test]
fn test_close_requires_every_transaction_posted() {
    let books = books();
    let draft = books.invoice(date(2023, 4, 1), dec!(10), false);

    let err = books.ledger.close_period(&books.ctx, 2023).unwrap_err();
    assert!(matches!(err, PeriodError::UnpostedTransactions { year: 2023, count: 1 }));

    books.ledger.post(&books.ctx, draft.id).unwrap();
    let closed = books.ledger.close_period(&books.ctx, 2023).unwrap();
    assert_eq!(closed.status, PeriodStatus::Closed);

    let err = books.ledger.close_period(&books.ctx, 2023).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_PERIOD_TRANSITION");
}

#[test]
fn test_closed_period_freezes_posted_transactions() {
    let books = books();
    let invoice = books.posted_invoice(date(2023, 8, 1), dec!(10));
    books.ledger.close_period(&books.ctx, 2023).unwrap();

    assert!(matches!(
        books.ledger.unpost(&books.ctx, invoice.id).unwrap_err(),
        PostingError::ClosedPeriod(_)
    ));
    assert!(matches!(
        books.ledger.soft_delete(&books.ctx, invoice.id).unwrap_err(),
        RecycleError::ClosedPeriod(_)
    ));
    assert_eq!(books.ledger.ledger_entries(&books.ctx, invoice.id).unwrap().len(), 2);
}

#[test]
fn test_adjusting_period_accepts_corrections() {
    let books = books();
    let invoice = books.posted_invoice(date(2023, 8, 1), dec!(10));

    let err = books.ledger.open_adjusting_period(&books.ctx, 2023).unwrap_err();
    assert!(matches!(
        err,
        PeriodError::InvalidTransition {
            from: PeriodStatus::Open,
            to: PeriodStatus::Adjusting
        }
    ));

    books.ledger.close_period(&books.ctx, 2023).unwrap();
    let adjusting = books.ledger.open_adjusting_period(&books.ctx, 2023).unwrap();
    assert_eq!(adjusting.status, PeriodStatus::Adjusting);

    books.ledger.unpost(&books.ctx, invoice.id).unwrap();
    let correction = books.invoice(date(2023, 12, 31), dec!(3), false);
    books.ledger.post(&books.ctx, correction.id).unwrap();
    books.ledger.post(&books.ctx, invoice.id).unwrap();

    let closed = books.ledger.close_period(&books.ctx, 2023).unwrap();
    assert_eq!(closed.status, PeriodStatus::Closed);
}

#[test]
fn test_other_years_stay_writable() {
    let books = books();
    books.ledger.close_period(&books.ctx, 2023).unwrap();
    let next_year = books.posted_invoice(date(2024, 1, 1), dec!(10));
    assert_eq!(next_year.transaction_no.as_deref(), Some("IN02/0001"));
}
