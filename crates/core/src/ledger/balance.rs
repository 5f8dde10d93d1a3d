//! Account balances summed from ledger rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use folio_shared::types::AccountId;

use super::entry::{EntryType, LedgerEntry};
use crate::account::NormalBalance;

/// Debit and credit totals of an account, in the reporting currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Normal side of the account.
    pub normal_balance: NormalBalance,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub const fn new(account_id: AccountId, normal_balance: NormalBalance) -> Self {
        Self {
            account_id,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            normal_balance,
        }
    }

    /// Sums the rows posted to `account_id`. Rows for other accounts are ignored.
    #[must_use]
    pub fn from_entries<'a, I>(account_id: AccountId, normal_balance: NormalBalance, entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut balance = Self::new(account_id, normal_balance);
        for entry in entries.into_iter().filter(|e| e.post_account == account_id) {
            balance.apply(entry.entry_type, entry.amount);
        }
        balance
    }

    /// Adds one row.
    pub fn apply(&mut self, entry_type: EntryType, amount: Decimal) {
        match entry_type {
            EntryType::Debit => self.debit_total += amount,
            EntryType::Credit => self.credit_total += amount,
        }
    }

    /// Balance on the account's normal side.
    ///
    /// - Debit-normal: debit - credit
    /// - Credit-normal: credit - debit
    #[must_use]
    pub fn balance(&self) -> Decimal {
        match self.normal_balance {
            NormalBalance::Debit => self.debit_total - self.credit_total,
            NormalBalance::Credit => self.credit_total - self.debit_total,
        }
    }
}
