//! Explicit per-call context and the injected clock.
//!
//! Every `Ledger` operation receives an [`EntityContext`] instead of reading
//! a "current entity" from ambient state, so one engine can serve callers
//! for different entities concurrently.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use folio_shared::types::{CurrencyId, EntityId};

/// A reporting entity (tenant). Owns accounts, currencies and transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Legal or display name.
    pub name: String,
    /// The functional currency all amounts roll up to.
    pub reporting_currency: CurrencyId,
}

/// Tenant scope resolved by the surrounding layer before any core call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityContext {
    /// The entity all reads and writes are scoped to.
    pub entity_id: EntityId,
    /// The entity's reporting currency.
    pub reporting_currency: CurrencyId,
}

impl EntityContext {
    /// Creates a context from its parts.
    #[must_use]
    pub const fn new(entity_id: EntityId, reporting_currency: CurrencyId) -> Self {
        Self {
            entity_id,
            reporting_currency,
        }
    }
}

impl From<&Entity> for EntityContext {
    fn from(entity: &Entity) -> Self {
        Self::new(entity.id, entity.reporting_currency)
    }
}

/// Source of "now" for audit timestamps.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freezes the clock at midnight UTC of `date`.
    #[must_use]
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
