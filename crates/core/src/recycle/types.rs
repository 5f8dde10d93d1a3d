//! Recycle bin records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use folio_shared::types::{
    AccountId, CurrencyId, EntityId, ExchangeRateId, RecycledObjectId, ReportingPeriodId,
    TransactionId, VatId,
};

use crate::account::Account;
use crate::currency::{Currency, ExchangeRate};
use crate::period::ReportingPeriod;
use crate::transaction::Transaction;
use crate::vat::Vat;

/// Kinds of record that can be recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Chart of accounts entry.
    Account,
    /// Currency.
    Currency,
    /// Exchange rate.
    ExchangeRate,
    /// VAT rate.
    Vat,
    /// Reporting period.
    ReportingPeriod,
    /// Transaction.
    Transaction,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Account => "Account",
            Self::Currency => "Currency",
            Self::ExchangeRate => "Exchange Rate",
            Self::Vat => "Vat",
            Self::ReportingPeriod => "Reporting Period",
            Self::Transaction => "Transaction",
        })
    }
}

/// `(kind, id)` pointer to any recyclable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    /// What the id points at.
    pub kind: RecordKind,
    /// Raw identifier.
    pub id: Uuid,
}

impl RecordRef {
    /// Creates a reference.
    #[must_use]
    pub const fn new(kind: RecordKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

macro_rules! record_ref_from {
    ($($id:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<$id> for RecordRef {
                fn from(id: $id) -> Self {
                    Self::new(RecordKind::$kind, id.into_inner())
                }
            }
        )*
    };
}

record_ref_from! {
    AccountId => Account,
    CurrencyId => Currency,
    ExchangeRateId => ExchangeRate,
    VatId => Vat,
    ReportingPeriodId => ReportingPeriod,
    TransactionId => Transaction,
}

/// Deletion timestamps shared by every recyclable record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Set while in the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set once destroyed. Never cleared.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    /// Neither deleted nor destroyed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.destroyed_at.is_none()
    }
}

/// A record with a deletion lifecycle.
pub trait Recyclable {
    /// Pointer used by the recycle bin.
    fn record_ref(&self) -> RecordRef;

    /// Current deletion state.
    fn lifecycle(&self) -> Lifecycle;

    /// Overwrites the deletion state.
    fn set_lifecycle(&mut self, lifecycle: Lifecycle);
}

macro_rules! impl_recyclable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Recyclable for $ty {
                fn record_ref(&self) -> RecordRef {
                    self.id.into()
                }

                fn lifecycle(&self) -> Lifecycle {
                    Lifecycle {
                        deleted_at: self.deleted_at,
                        destroyed_at: self.destroyed_at,
                    }
                }

                fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
                    self.deleted_at = lifecycle.deleted_at;
                    self.destroyed_at = lifecycle.destroyed_at;
                }
            }
        )*
    };
}

impl_recyclable!(Account, Currency, ExchangeRate, Vat, ReportingPeriod, Transaction);

/// Entry in the recycle bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecycledObject {
    /// Unique identifier.
    pub id: RecycledObjectId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// The deleted record.
    pub record: RecordRef,
    /// When it was deleted.
    pub deleted_at: DateTime<Utc>,
}

/// What still points at a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct References {
    /// Clearances on either side of a transaction.
    pub clearances: usize,
    /// Other live records (ledger rows, transactions, line items, accounts, rates).
    pub records: usize,
}

/// What stands in the way of restoring a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreBlockers {
    /// Records the restored record points at that are deleted or destroyed.
    pub deleted_dependencies: Vec<RecordRef>,
    /// Active records that took the restored record's place.
    pub replacements: Vec<RecordRef>,
}

impl RestoreBlockers {
    /// Nothing blocks the restore.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deleted_dependencies.is_empty() && self.replacements.is_empty()
    }
}
