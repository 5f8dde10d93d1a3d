//! The persistence boundary.
//!
//! `LedgerStore` is everything the engine needs from storage. Every method
//! is scoped to one entity. Methods that take a batch must apply all of it
//! or none of it.

use chrono::{DateTime, Utc};
use thiserror::Error;
use folio_shared::AppError;
use folio_shared::types::{
    AccountId, ClearanceId, CurrencyId, EntityId, ExchangeRateId, ReportingPeriodId,
    TransactionId, VatId,
};

use crate::account::Account;
use crate::clearance::Clearance;
use crate::context::Entity;
use crate::currency::{Currency, ExchangeRate};
use crate::ledger::LedgerEntry;
use crate::period::ReportingPeriod;
use crate::recycle::{Lifecycle, RecordRef, RecycledObject, References, RestoreBlockers};
use crate::transaction::{Transaction, TransactionQuery};
use crate::vat::Vat;

/// Failures reported by a `LedgerStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the write.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A compare-and-set precondition failed.
    #[error("Store conflict: {0}")]
    Conflict(String),

    /// Stored data violates an invariant.
    #[error("Store corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
            Self::Conflict(_) => "STORE_CONFLICT",
            Self::Corrupt(_) => "STORE_CORRUPT",
        }
    }

    /// Returns true if repeating the call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Conflict(_))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::Conflict(err.to_string()),
            StoreError::Unavailable(_) | StoreError::Corrupt(_) => Self::Database(err.to_string()),
        }
    }
}

/// Claim on the next number in a (period, prefix) series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceClaim {
    /// Period the series belongs to.
    pub period_id: ReportingPeriodId,
    /// Transaction type prefix.
    pub prefix: &'static str,
    /// The number being taken. The store rejects the claim unless the
    /// series currently ends at `sequence - 1`.
    pub sequence: u32,
}

/// Everything written when a transaction is posted.
#[derive(Debug, Clone)]
pub struct PostingBatch {
    /// The transaction with `posted` and `transaction_no` set.
    pub transaction: Transaction,
    /// Present when a new number was assigned.
    pub sequence: Option<SequenceClaim>,
    /// Balanced ledger rows.
    pub entries: Vec<LedgerEntry>,
}

/// Storage used by the `Ledger` facade.
pub trait LedgerStore: Send + Sync {
    // -- reference data -----------------------------------------------------

    /// Inserts a new entity.
    fn insert_entity(&self, entity: Entity) -> Result<(), StoreError>;

    /// Loads an entity.
    fn entity(&self, id: EntityId) -> Result<Option<Entity>, StoreError>;

    /// Inserts a currency.
    fn insert_currency(&self, currency: Currency) -> Result<(), StoreError>;

    /// Loads a currency, including soft-deleted ones.
    fn currency(&self, entity: EntityId, id: CurrencyId) -> Result<Option<Currency>, StoreError>;

    /// Inserts an account.
    fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Loads an account, including soft-deleted ones.
    fn account(&self, entity: EntityId, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Inserts an exchange rate.
    fn insert_exchange_rate(&self, rate: ExchangeRate) -> Result<(), StoreError>;

    /// Loads one exchange rate.
    fn exchange_rate(
        &self,
        entity: EntityId,
        id: ExchangeRateId,
    ) -> Result<Option<ExchangeRate>, StoreError>;

    /// All rates recorded for a currency, including inactive ones.
    fn exchange_rates(
        &self,
        entity: EntityId,
        currency: CurrencyId,
    ) -> Result<Vec<ExchangeRate>, StoreError>;

    /// Inserts a VAT rate.
    fn insert_vat(&self, vat: Vat) -> Result<(), StoreError>;

    /// Loads a VAT rate.
    fn vat(&self, entity: EntityId, id: VatId) -> Result<Option<Vat>, StoreError>;

    // -- reporting periods --------------------------------------------------

    /// The active period for `year`, if one exists.
    fn reporting_period(
        &self,
        entity: EntityId,
        year: i32,
    ) -> Result<Option<ReportingPeriod>, StoreError>;

    /// Returns the active period for `year`, creating an open one numbered
    /// after the entity's existing periods when there is none.
    fn get_or_create_reporting_period(
        &self,
        entity: EntityId,
        year: i32,
    ) -> Result<ReportingPeriod, StoreError>;

    /// Persists a status change.
    fn update_reporting_period(&self, period: &ReportingPeriod) -> Result<(), StoreError>;

    // -- transactions -------------------------------------------------------

    /// Inserts or replaces an unposted transaction.
    fn save_transaction(&self, transaction: &Transaction) -> Result<(), StoreError>;

    /// Loads a transaction regardless of lifecycle state.
    fn transaction(
        &self,
        entity: EntityId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Transactions matching `query`, ordered by date then id.
    fn transactions(
        &self,
        entity: EntityId,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Last number taken in a (period, prefix) series. Zero when unused.
    fn last_sequence(
        &self,
        entity: EntityId,
        period: ReportingPeriodId,
        prefix: &str,
    ) -> Result<u32, StoreError>;

    /// Writes ledger rows, the posted flag and the number in one step.
    ///
    /// Fails with `StoreError::Conflict` if the sequence claim is stale or
    /// the transaction is already posted.
    fn commit_posting(&self, batch: PostingBatch) -> Result<(), StoreError>;

    /// Deletes the transaction's ledger rows and stores it unposted, in one step.
    fn commit_unposting(&self, transaction: &Transaction) -> Result<(), StoreError>;

    /// Rows written for one transaction.
    fn ledger_entries(
        &self,
        entity: EntityId,
        transaction: TransactionId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Rows whose `post_account` is `account`, skipping rows of inactive
    /// transactions. Ordered by date.
    fn account_ledger(
        &self,
        entity: EntityId,
        account: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    // -- clearances ---------------------------------------------------------

    /// Inserts clearances in one step.
    fn insert_clearances(&self, clearances: &[Clearance]) -> Result<(), StoreError>;

    /// Loads one clearance.
    fn clearance(&self, entity: EntityId, id: ClearanceId) -> Result<Option<Clearance>, StoreError>;

    /// Clearances where `transaction` is on either side.
    fn clearances_for(
        &self,
        entity: EntityId,
        transaction: TransactionId,
    ) -> Result<Vec<Clearance>, StoreError>;

    /// Removes a clearance. Returns false if it did not exist.
    fn delete_clearance(&self, entity: EntityId, id: ClearanceId) -> Result<bool, StoreError>;

    // -- recycle bin --------------------------------------------------------

    /// Deletion state of any recyclable record.
    fn lifecycle(&self, entity: EntityId, record: RecordRef) -> Result<Option<Lifecycle>, StoreError>;

    /// Live records and clearances pointing at `record`.
    fn references(&self, entity: EntityId, record: RecordRef) -> Result<References, StoreError>;

    /// Inactive records `record` points at, and active records that took
    /// its place.
    fn restore_blockers(&self, entity: EntityId, record: RecordRef) -> Result<RestoreBlockers, StoreError>;

    /// Sets `deleted_at` and files the recycled object, in one step.
    fn recycle(&self, object: RecycledObject) -> Result<(), StoreError>;

    /// Clears `deleted_at` and removes the recycled object, in one step.
    ///
    /// Fails with `StoreError::Conflict` while `restore_blockers` is non-empty.
    fn restore(&self, entity: EntityId, record: RecordRef) -> Result<(), StoreError>;

    /// Sets `destroyed_at`.
    fn destroy(&self, entity: EntityId, record: RecordRef, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Everything in the entity's recycle bin.
    fn recycled_objects(&self, entity: EntityId) -> Result<Vec<RecycledObject>, StoreError>;
}
