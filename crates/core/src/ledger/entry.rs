//! Ledger entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use folio_shared::types::{AccountId, CurrencyId, LedgerEntryId, LineItemId, TransactionId};

/// Type of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit entry (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

impl EntryType {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// One row of the ledger.
///
/// `post_account` is the account this row debits or credits and
/// `folio_account` is its contra, so every row names both sides of the pair
/// it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// The transaction this entry belongs to.
    pub transaction_id: TransactionId,
    /// The line item that produced it.
    pub line_item_id: Option<LineItemId>,
    /// Whether this is a debit or credit.
    pub entry_type: EntryType,
    /// Contra account.
    pub folio_account: AccountId,
    /// Affected account.
    pub post_account: AccountId,
    /// Amount in the reporting currency.
    pub amount: Decimal,
    /// Amount in the transaction currency.
    pub transaction_currency_amount: Decimal,
    /// Transaction currency.
    pub currency_id: CurrencyId,
    /// Transaction date.
    pub date: NaiveDate,
}

impl LedgerEntry {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }

    /// Signed amount in the transaction currency.
    #[must_use]
    pub fn signed_transaction_currency_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.transaction_currency_amount,
            EntryType::Credit => -self.transaction_currency_amount,
        }
    }
}
