//! Value added tax rates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use folio_shared::types::{AccountId, EntityId, VatId};

use crate::currency::CurrencyService;
use crate::transaction::ValidationError;

/// A named VAT rate posting to a control account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vat {
    /// Unique identifier.
    pub id: VatId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// Display name ("Standard Rate").
    pub name: String,
    /// Short code ("S").
    pub code: String,
    /// Percentage, 0 to 100 inclusive.
    pub rate: Decimal,
    /// Account the tax is posted to.
    pub account_id: AccountId,
    /// Set when moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when permanently destroyed.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl Vat {
    /// Creates a VAT rate.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidVatRate` if `rate` is outside 0..=100.
    pub fn new(
        entity_id: EntityId,
        name: impl Into<String>,
        code: impl Into<String>,
        rate: Decimal,
        account_id: AccountId,
    ) -> Result<Self, ValidationError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(ValidationError::InvalidVatRate(rate));
        }
        Ok(Self {
            id: VatId::new(),
            entity_id,
            name: name.into(),
            code: code.into(),
            rate,
            account_id,
            deleted_at: None,
            destroyed_at: None,
        })
    }

    /// Returns true unless soft-deleted or destroyed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.destroyed_at.is_none()
    }

    /// Freezes the current rate and account for a line item.
    #[must_use]
    pub const fn snapshot(&self) -> AppliedVat {
        AppliedVat {
            vat_id: self.id,
            rate: self.rate,
            account_id: self.account_id,
        }
    }
}

/// The VAT terms captured on a line item when it was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedVat {
    /// Source VAT record.
    pub vat_id: VatId,
    /// Rate at the time the line item was added.
    pub rate: Decimal,
    /// Account at the time the line item was added.
    pub account_id: AccountId,
}

impl AppliedVat {
    /// Tax on `line_total`, rounded to `decimal_places`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::AmountOverflow` if the tax is not representable.
    pub fn amount(&self, line_total: Decimal, decimal_places: u32) -> Result<Decimal, ValidationError> {
        CurrencyService::percentage(line_total, self.rate, decimal_places).ok_or(ValidationError::AmountOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_bounds() {
        let entity = EntityId::new();
        let account = AccountId::new();
        assert!(Vat::new(entity, "Zero", "Z", dec!(0), account).is_ok());
        assert!(Vat::new(entity, "Full", "F", dec!(100), account).is_ok());
        assert_eq!(
            Vat::new(entity, "Bad", "B", dec!(100.01), account).unwrap_err(),
            ValidationError::InvalidVatRate(dec!(100.01))
        );
        assert!(Vat::new(entity, "Neg", "N", dec!(-1), account).is_err());
    }

    #[test]
    fn test_snapshot_survives_rate_change() {
        let mut vat = Vat::new(EntityId::new(), "Standard", "S", dec!(16), AccountId::new()).unwrap();
        let applied = vat.snapshot();
        vat.rate = dec!(20);
        assert_eq!(applied.amount(dec!(100), 2), Ok(dec!(16.00)));
    }
}
