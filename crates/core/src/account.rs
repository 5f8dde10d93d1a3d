//! Chart of accounts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use folio_shared::types::{AccountId, CurrencyId, EntityId};

/// Side on which an account's balance normally accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Assets and expenses: balance += debit - credit.
    Debit,
    /// Liabilities, equity and revenue: balance += credit - debit.
    Credit,
}

/// Account classification. Fixes which transaction roles an account may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Long-lived assets (plant, equipment).
    NonCurrentAsset,
    /// Offsets an asset (accumulated depreciation).
    ContraAsset,
    /// Stock held for sale.
    Inventory,
    /// Bank and cash accounts.
    Bank,
    /// Short-term assets other than bank and receivables.
    CurrentAsset,
    /// Amounts owed by clients.
    Receivable,
    /// Long-term obligations.
    NonCurrentLiability,
    /// Control accounts (e.g. VAT control).
    Control,
    /// Short-term obligations other than payables.
    CurrentLiability,
    /// Amounts owed to suppliers.
    Payable,
    /// Owner's equity.
    Equity,
    /// Revenue from the main line of business.
    OperatingRevenue,
    /// Costs of running the business.
    OperatingExpense,
    /// Revenue outside the main line of business.
    NonOperatingRevenue,
    /// Costs directly attributable to sales.
    DirectExpense,
    /// Overheads.
    OverheadExpense,
    /// Anything else expensed.
    OtherExpense,
    /// Suspense account used while reconciling.
    Reconciliation,
    /// VAT paid on purchases, recoverable.
    TaxInput,
    /// VAT collected on sales, payable.
    TaxOutput,
}

impl AccountType {
    /// Every account type, in chart order.
    pub const ALL: [Self; 20] = [
        Self::NonCurrentAsset,
        Self::ContraAsset,
        Self::Inventory,
        Self::Bank,
        Self::CurrentAsset,
        Self::Receivable,
        Self::NonCurrentLiability,
        Self::Control,
        Self::CurrentLiability,
        Self::Payable,
        Self::Equity,
        Self::OperatingRevenue,
        Self::OperatingExpense,
        Self::NonOperatingRevenue,
        Self::DirectExpense,
        Self::OverheadExpense,
        Self::OtherExpense,
        Self::Reconciliation,
        Self::TaxInput,
        Self::TaxOutput,
    ];

    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NonCurrentAsset => "Non Current Asset",
            Self::ContraAsset => "Contra Asset",
            Self::Inventory => "Inventory",
            Self::Bank => "Bank",
            Self::CurrentAsset => "Current Asset",
            Self::Receivable => "Receivable",
            Self::NonCurrentLiability => "Non Current Liability",
            Self::Control => "Control",
            Self::CurrentLiability => "Current Liability",
            Self::Payable => "Payable",
            Self::Equity => "Equity",
            Self::OperatingRevenue => "Operating Revenue",
            Self::OperatingExpense => "Operating Expense",
            Self::NonOperatingRevenue => "Non Operating Revenue",
            Self::DirectExpense => "Direct Expense",
            Self::OverheadExpense => "Overhead Expense",
            Self::OtherExpense => "Other Expense",
            Self::Reconciliation => "Reconciliation",
            Self::TaxInput => "Tax Input",
            Self::TaxOutput => "Tax Output",
        }
    }

    /// The side this account type's balance grows on.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::NonCurrentAsset
            | Self::Inventory
            | Self::Bank
            | Self::CurrentAsset
            | Self::Receivable
            | Self::OperatingExpense
            | Self::DirectExpense
            | Self::OverheadExpense
            | Self::OtherExpense
            | Self::Reconciliation
            | Self::TaxInput => NormalBalance::Debit,
            Self::ContraAsset
            | Self::NonCurrentLiability
            | Self::Control
            | Self::CurrentLiability
            | Self::Payable
            | Self::Equity
            | Self::OperatingRevenue
            | Self::NonOperatingRevenue
            | Self::TaxOutput => NormalBalance::Credit,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of allowed account types, rendered as "Bank or Receivable".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountTypeList(pub &'static [AccountType]);

impl fmt::Display for AccountTypeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, account_type) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            f.write_str(account_type.label())?;
        }
        Ok(())
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// Display name.
    pub name: String,
    /// Optional chart code (e.g. "1200").
    pub code: Option<String>,
    /// Classification, immutable once created.
    pub account_type: AccountType,
    /// Denomination of the account.
    pub currency_id: CurrencyId,
    /// Set when moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when permanently destroyed.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates a new active account.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        name: impl Into<String>,
        account_type: AccountType,
        currency_id: CurrencyId,
    ) -> Self {
        Self {
            id: AccountId::new(),
            entity_id,
            name: name.into(),
            code: None,
            account_type,
            currency_id,
            deleted_at: None,
            destroyed_at: None,
        }
    }

    /// Sets the chart code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns true unless the account is in the recycle bin or destroyed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.destroyed_at.is_none()
    }
}
