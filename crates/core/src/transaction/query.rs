//! Transaction search filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use folio_shared::types::{AccountId, CurrencyId};

use super::kind::{Capability, TransactionType};
use super::model::Transaction;

/// Filter applied by `fetch`. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Earliest date included.
    pub start_date: Option<NaiveDate>,
    /// Latest date included.
    pub end_date: Option<NaiveDate>,
    /// Main account.
    pub account_id: Option<AccountId>,
    /// Transaction currency. The ledger fills in the reporting currency when unset.
    pub currency_id: Option<CurrencyId>,
    /// Transaction type.
    pub transaction_type: Option<TransactionType>,
    /// Posted state.
    pub posted: Option<bool>,
}

impl TransactionQuery {
    /// Matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes transactions on or after `date`.
    #[must_use]
    pub const fn since(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Includes transactions on or before `date`.
    #[must_use]
    pub const fn until(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Restricts to one main account.
    #[must_use]
    pub const fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Restricts to one currency.
    #[must_use]
    pub const fn currency(mut self, currency_id: CurrencyId) -> Self {
        self.currency_id = Some(currency_id);
        self
    }

    /// Restricts to one transaction type.
    #[must_use]
    pub const fn of_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Restricts by posted state.
    #[must_use]
    pub const fn posted(mut self, posted: bool) -> Self {
        self.posted = Some(posted);
        self
    }

    /// Returns true if `tx` passes every set filter. Inactive and
    /// non-fetchable transactions never match.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        tx.is_active()
            && tx.has(Capability::Fetchable)
            && self.start_date.is_none_or(|d| tx.date >= d)
            && self.end_date.is_none_or(|d| tx.date <= d)
            && self.account_id.is_none_or(|a| tx.account_id == a)
            && self.currency_id.is_none_or(|c| tx.currency_id == c)
            && self.transaction_type.is_none_or(|t| tx.transaction_type == t)
            && self.posted.is_none_or(|p| tx.posted == p)
    }
}
