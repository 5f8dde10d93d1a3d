//! Transaction header and line items.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use folio_shared::types::{
    AccountId, CurrencyId, EntityId, ExchangeRateId, LineItemId, TransactionId, VatId,
};

use super::error::ValidationError;
use super::kind::{Capability, TransactionType};
use crate::account::{Account, AccountTypeList};
use crate::currency::CurrencyService;
use crate::ledger::EntryType;
use crate::vat::AppliedVat;

/// Full `Decimal` precision, so totals are checked before any rounding.
const UNROUNDED: u32 = 28;

/// Input for creating a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Kind of transaction.
    pub transaction_type: TransactionType,
    /// Main account.
    pub account_id: AccountId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Free-text description.
    pub narration: String,
    /// Transaction currency. Defaults to the reporting currency.
    pub currency_id: Option<CurrencyId>,
    /// Explicit rate overriding the dated lookup.
    pub exchange_rate_id: Option<ExchangeRateId>,
    /// External reference (e.g. supplier invoice number).
    pub reference: Option<String>,
    /// Credited override. Journal entries only.
    pub credited: Option<bool>,
}

impl NewTransaction {
    /// Minimal input. Everything optional is left unset.
    #[must_use]
    pub fn new(
        transaction_type: TransactionType,
        account_id: AccountId,
        date: NaiveDate,
        narration: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            account_id,
            date,
            narration: narration.into(),
            currency_id: None,
            exchange_rate_id: None,
            reference: None,
            credited: None,
        }
    }

    /// Sets the transaction currency.
    #[must_use]
    pub const fn in_currency(mut self, currency_id: CurrencyId) -> Self {
        self.currency_id = Some(currency_id);
        self
    }

    /// Pins an explicit exchange rate.
    #[must_use]
    pub const fn with_exchange_rate(mut self, exchange_rate_id: ExchangeRateId) -> Self {
        self.exchange_rate_id = Some(exchange_rate_id);
        self
    }

    /// Sets the external reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Overrides the credited side.
    #[must_use]
    pub const fn credited(mut self, credited: bool) -> Self {
        self.credited = Some(credited);
        self
    }
}

/// Input for attaching a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Line item account.
    pub account_id: AccountId,
    /// Unit amount in transaction currency.
    pub amount: Decimal,
    /// Multiplier applied to `amount`.
    pub quantity: Decimal,
    /// VAT to apply.
    pub vat_id: Option<VatId>,
    /// Free-text description.
    pub narration: Option<String>,
}

impl LineItemInput {
    /// A single unit of `amount` with no VAT.
    #[must_use]
    pub const fn new(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount,
            quantity: Decimal::ONE,
            vat_id: None,
            narration: None,
        }
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Applies a VAT rate.
    #[must_use]
    pub const fn with_vat(mut self, vat_id: VatId) -> Self {
        self.vat_id = Some(vat_id);
        self
    }

    /// Sets the narration.
    #[must_use]
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }
}

/// One itemised amount on a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier.
    pub id: LineItemId,
    /// Owning transaction.
    pub transaction_id: TransactionId,
    /// Account on the opposite side of the main account.
    pub account_id: AccountId,
    /// Free-text description.
    pub narration: Option<String>,
    /// Unit amount in transaction currency.
    pub amount: Decimal,
    /// Multiplier applied to `amount`.
    pub quantity: Decimal,
    /// VAT terms captured when the item was added.
    pub vat: Option<AppliedVat>,
}

impl LineItem {
    /// `amount × quantity`, rounded to `decimal_places`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::AmountOverflow` if the product is not representable.
    pub fn total(&self, decimal_places: u32) -> Result<Decimal, ValidationError> {
        self.amount
            .checked_mul(self.quantity)
            .map(|total| CurrencyService::round(total, decimal_places))
            .ok_or(ValidationError::AmountOverflow)
    }

    /// VAT on the line total. Zero when no VAT applies.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::AmountOverflow` as `total` does.
    pub fn vat_amount(&self, decimal_places: u32) -> Result<Decimal, ValidationError> {
        match self.vat {
            Some(vat) => vat.amount(self.total(decimal_places)?, decimal_places),
            None => Ok(Decimal::ZERO),
        }
    }
}

/// Changes allowed on an unposted transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New narration.
    pub narration: Option<String>,
    /// New reference.
    pub reference: Option<String>,
}

/// A business transaction and its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// Kind of transaction.
    pub transaction_type: TransactionType,
    /// Assigned on first post, e.g. `IN01/0003`.
    pub transaction_no: Option<String>,
    /// Main account.
    pub account_id: AccountId,
    /// True if the main account is credited.
    pub credited: bool,
    /// Transaction date.
    pub date: NaiveDate,
    /// Free-text description.
    pub narration: String,
    /// Transaction currency.
    pub currency_id: CurrencyId,
    /// Explicit rate overriding the dated lookup.
    pub exchange_rate_id: Option<ExchangeRateId>,
    /// External reference.
    pub reference: Option<String>,
    /// Itemised amounts.
    pub line_items: Vec<LineItem>,
    /// True once ledger rows exist.
    pub posted: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Set when moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when permanently destroyed.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Builds an unposted transaction from `input`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CreditSideFixed` if `input.credited`
    /// disagrees with a type whose side cannot be overridden.
    pub fn new(
        entity_id: EntityId,
        input: NewTransaction,
        default_currency: CurrencyId,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let descriptor = input.transaction_type.descriptor();
        let credited = match input.credited {
            Some(c) if c != descriptor.credited && !descriptor.credit_overridable => {
                return Err(ValidationError::CreditSideFixed(input.transaction_type));
            }
            Some(c) => c,
            None => descriptor.credited,
        };

        Ok(Self {
            id: TransactionId::new(),
            entity_id,
            transaction_type: input.transaction_type,
            transaction_no: None,
            account_id: input.account_id,
            credited,
            date: input.date,
            narration: input.narration,
            currency_id: input.currency_id.unwrap_or(default_currency),
            exchange_rate_id: input.exchange_rate_id,
            reference: input.reference,
            line_items: Vec::new(),
            posted: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            destroyed_at: None,
        })
    }

    /// Returns true unless soft-deleted or destroyed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.destroyed_at.is_none()
    }

    /// Returns true if the type opts into `capability`.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.transaction_type.has(capability)
    }

    /// Side the main account is posted on.
    #[must_use]
    pub const fn main_entry_side(&self) -> EntryType {
        if self.credited {
            EntryType::Credit
        } else {
            EntryType::Debit
        }
    }

    /// Checks the main account type.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MainAccount` on mismatch.
    pub fn validate_main_account(&self, account: &Account) -> Result<(), ValidationError> {
        let descriptor = self.transaction_type.descriptor();
        match descriptor.main_account_types {
            Some(allowed) if !allowed.contains(&account.account_type) => {
                Err(ValidationError::MainAccount {
                    transaction_type: self.transaction_type,
                    expected: AccountTypeList(allowed),
                    actual: account.account_type,
                })
            }
            _ => Ok(()),
        }
    }

    /// Checks a line item account type.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::LineItemAccount` on mismatch.
    pub fn validate_line_item_account(&self, account: &Account) -> Result<(), ValidationError> {
        let descriptor = self.transaction_type.descriptor();
        match descriptor.line_item_account_types {
            Some(allowed) if !allowed.contains(&account.account_type) => {
                Err(ValidationError::LineItemAccount {
                    transaction_type: self.transaction_type,
                    expected: AccountTypeList(allowed),
                    actual: account.account_type,
                })
            }
            _ => Ok(()),
        }
    }

    /// Guards every edit.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CannotModifyPosted` once posted.
    pub fn ensure_editable(&self) -> Result<(), ValidationError> {
        if self.posted {
            Err(ValidationError::CannotModifyPosted)
        } else {
            Ok(())
        }
    }

    /// Attaches a line item.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is posted, the item is already attached,
    /// its amount or quantity is not positive, or the transaction total
    /// would overflow.
    pub fn add_line_item(&mut self, item: LineItem) -> Result<(), ValidationError> {
        self.ensure_editable()?;
        if item.amount <= Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(item.amount));
        }
        if item.quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity(item.quantity));
        }
        if self.line_items.iter().any(|li| li.id == item.id) {
            return Err(ValidationError::DuplicateLineItem(item.id));
        }
        self.line_items.push(item);
        if let Err(err) = self.amount(UNROUNDED) {
            self.line_items.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Detaches a line item and returns it.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is posted or the item is not attached.
    pub fn remove_line_item(&mut self, id: LineItemId) -> Result<LineItem, ValidationError> {
        self.ensure_editable()?;
        let index = self
            .line_items
            .iter()
            .position(|li| li.id == id)
            .ok_or(ValidationError::LineItemNotFound(id))?;
        Ok(self.line_items.remove(index))
    }

    /// Applies header changes. Moving to another year drops the number so
    /// the transaction is renumbered in its new period.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CannotModifyPosted` once posted.
    pub fn apply_update(&mut self, update: TransactionUpdate, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.ensure_editable()?;
        if let Some(date) = update.date {
            if date.year() != self.date.year() {
                self.transaction_no = None;
            }
            self.date = date;
        }
        if let Some(narration) = update.narration {
            self.narration = narration;
        }
        if let Some(reference) = update.reference {
            self.reference = Some(reference);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Sum of line totals before VAT.
    pub fn subtotal(&self, decimal_places: u32) -> Result<Decimal, ValidationError> {
        self.line_items.iter().try_fold(Decimal::ZERO, |sum, li| {
            sum.checked_add(li.total(decimal_places)?)
                .ok_or(ValidationError::AmountOverflow)
        })
    }

    /// Sum of VAT across line items.
    pub fn vat_total(&self, decimal_places: u32) -> Result<Decimal, ValidationError> {
        self.line_items.iter().try_fold(Decimal::ZERO, |sum, li| {
            sum.checked_add(li.vat_amount(decimal_places)?)
                .ok_or(ValidationError::AmountOverflow)
        })
    }

    /// Total value in transaction currency: line totals plus VAT.
    pub fn amount(&self, decimal_places: u32) -> Result<Decimal, ValidationError> {
        self.subtotal(decimal_places)?
            .checked_add(self.vat_total(decimal_places)?)
            .ok_or(ValidationError::AmountOverflow)
    }
}
