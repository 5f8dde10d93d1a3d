//! Currency records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use folio_shared::types::{CurrencyId, EntityId};

/// Decimal places used when a currency does not specify its own.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// A currency an entity transacts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Unique identifier.
    pub id: CurrencyId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// Display name ("US Dollar").
    pub name: String,
    /// ISO 4217 code ("USD").
    pub code: String,
    /// Minor-unit precision used for rounding.
    pub decimal_places: u32,
    /// Set when moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when permanently destroyed.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl Currency {
    /// Creates a currency with the default precision.
    #[must_use]
    pub fn new(entity_id: EntityId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: CurrencyId::new(),
            entity_id,
            name: name.into(),
            code: code.into(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
            deleted_at: None,
            destroyed_at: None,
        }
    }

    /// Overrides the precision (JPY has 0, BHD has 3).
    #[must_use]
    pub const fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    /// Returns true unless soft-deleted or destroyed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.destroyed_at.is_none()
    }
}
