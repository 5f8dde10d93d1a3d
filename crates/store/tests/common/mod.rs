//! Shared fixture for ledger integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use folio_core::account::{Account, AccountType};
use folio_core::context::{EntityContext, FixedClock};
use folio_core::transaction::{LineItemInput, NewTransaction, Transaction, TransactionType};
use folio_core::vat::Vat;
use folio_core::Ledger;
use folio_store::MemoryStore;

pub type TestLedger = Ledger<MemoryStore, FixedClock>;

/// One entity with a small chart of accounts and a 16% VAT rate.
pub struct Books {
    pub ledger: TestLedger,
    pub ctx: EntityContext,
    pub receivable: Account,
    pub revenue: Account,
    pub bank: Account,
    pub vat_control: Account,
    pub payable: Account,
    pub expense: Account,
    pub reconciliation: Account,
    pub vat: Vat,
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn today() -> NaiveDate {
    date(2024, 6, 15)
}

pub fn books() -> Books {
    let ledger = Ledger::new(Arc::new(MemoryStore::new()), FixedClock::at_date(today()));
    let (entity, _) = ledger.create_entity("Acme Ltd", "US Dollar", "USD", 2).unwrap();
    let ctx = EntityContext::from(&entity);

    let account = |name: &str, account_type: AccountType| {
        ledger.create_account(&ctx, name, account_type, None).unwrap()
    };
    let receivable = account("Clients", AccountType::Receivable);
    let revenue = account("Sales", AccountType::OperatingRevenue);
    let bank = account("Checking", AccountType::Bank);
    let vat_control = account("VAT Control", AccountType::Control);
    let payable = account("Suppliers", AccountType::Payable);
    let expense = account("Office Costs", AccountType::OperatingExpense);
    let reconciliation = account("Suspense", AccountType::Reconciliation);
    let vat = ledger
        .create_vat(&ctx, "Standard", "S", dec!(16), vat_control.id)
        .unwrap();

    Books {
        ledger,
        ctx,
        receivable,
        revenue,
        bank,
        vat_control,
        payable,
        expense,
        reconciliation,
        vat,
    }
}

impl Books {
    /// Unposted client invoice with one revenue line.
    pub fn invoice(&self, on: NaiveDate, amount: Decimal, with_vat: bool) -> Transaction {
        let tx = self
            .ledger
            .new_transaction(
                &self.ctx,
                NewTransaction::new(TransactionType::ClientInvoice, self.receivable.id, on, "Consulting"),
            )
            .unwrap();
        let mut line = LineItemInput::new(self.revenue.id, amount);
        if with_vat {
            line = line.with_vat(self.vat.id);
        }
        self.ledger.add_line_item(&self.ctx, tx.id, line).unwrap()
    }

    /// Posted client invoice.
    pub fn posted_invoice(&self, on: NaiveDate, amount: Decimal) -> Transaction {
        let tx = self.invoice(on, amount, false);
        self.ledger.post(&self.ctx, tx.id).unwrap()
    }

    /// Posted client receipt into the bank account.
    pub fn posted_receipt(&self, on: NaiveDate, amount: Decimal) -> Transaction {
        let tx = self
            .ledger
            .new_transaction(
                &self.ctx,
                NewTransaction::new(TransactionType::ClientReceipt, self.receivable.id, on, "Payment"),
            )
            .unwrap();
        self.ledger
            .add_line_item(&self.ctx, tx.id, LineItemInput::new(self.bank.id, amount))
            .unwrap();
        self.ledger.post(&self.ctx, tx.id).unwrap()
    }
}
