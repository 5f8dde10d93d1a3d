//! `LedgerStore` implementation over in-process tables.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;
use folio_core::account::Account;
use folio_core::clearance::Clearance;
use folio_core::context::Entity;
use folio_core::currency::{Currency, ExchangeRate};
use folio_core::ledger::LedgerEntry;
use folio_core::period::ReportingPeriod;
use folio_core::recycle::{Lifecycle, RecordRef, RecycledObject, References, RestoreBlockers};
use folio_core::store::{LedgerStore, PostingBatch, StoreError};
use folio_core::transaction::{Transaction, TransactionQuery};
use folio_core::vat::Vat;
use folio_shared::types::{
    AccountId, ClearanceId, CurrencyId, EntityId, ExchangeRateId, ReportingPeriodId,
    TransactionId, VatId,
};

use crate::tables::Tables;

/// A `LedgerStore` that keeps every table in memory.
///
/// Clones of the engine share one store through `Arc<MemoryStore>`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_next_write: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next batch write fail with `StoreError::Unavailable`
    /// before anything is applied.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }
}

fn owned<T>(row: Option<&T>, entity: EntityId, owner: impl Fn(&T) -> EntityId) -> Option<T>
where
    T: Clone,
{
    row.filter(|r| owner(*r) == entity).cloned()
}

impl LedgerStore for MemoryStore {
    fn insert_entity(&self, entity: Entity) -> Result<(), StoreError> {
        self.tables.write().entities.insert(entity.id, entity);
        Ok(())
    }

    fn entity(&self, id: EntityId) -> Result<Option<Entity>, StoreError> {
        Ok(self.tables.read().entities.get(&id).cloned())
    }

    fn insert_currency(&self, currency: Currency) -> Result<(), StoreError> {
        self.tables.write().currencies.insert(currency.id, currency);
        Ok(())
    }

    fn currency(&self, entity: EntityId, id: CurrencyId) -> Result<Option<Currency>, StoreError> {
        Ok(owned(self.tables.read().currencies.get(&id), entity, |c| c.entity_id))
    }

    fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        self.tables.write().accounts.insert(account.id, account);
        Ok(())
    }

    fn account(&self, entity: EntityId, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(owned(self.tables.read().accounts.get(&id), entity, |a| a.entity_id))
    }

    fn insert_exchange_rate(&self, rate: ExchangeRate) -> Result<(), StoreError> {
        self.tables.write().rates.insert(rate.id, rate);
        Ok(())
    }

    fn exchange_rate(
        &self,
        entity: EntityId,
        id: ExchangeRateId,
    ) -> Result<Option<ExchangeRate>, StoreError> {
        Ok(owned(self.tables.read().rates.get(&id), entity, |r| r.entity_id))
    }

    fn exchange_rates(
        &self,
        entity: EntityId,
        currency: CurrencyId,
    ) -> Result<Vec<ExchangeRate>, StoreError> {
        let tables = self.tables.read();
        let mut rates: Vec<_> = tables
            .rates
            .values()
            .filter(|r| r.entity_id == entity && r.currency_id == currency)
            .cloned()
            .collect();
        rates.sort_by_key(|r| (r.valid_from, r.created_at, r.id));
        Ok(rates)
    }

    fn insert_vat(&self, vat: Vat) -> Result<(), StoreError> {
        self.tables.write().vats.insert(vat.id, vat);
        Ok(())
    }

    fn vat(&self, entity: EntityId, id: VatId) -> Result<Option<Vat>, StoreError> {
        Ok(owned(self.tables.read().vats.get(&id), entity, |v| v.entity_id))
    }

    fn reporting_period(
        &self,
        entity: EntityId,
        year: i32,
    ) -> Result<Option<ReportingPeriod>, StoreError> {
        Ok(self.tables.read().active_period(entity, year).cloned())
    }

    fn get_or_create_reporting_period(
        &self,
        entity: EntityId,
        year: i32,
    ) -> Result<ReportingPeriod, StoreError> {
        let mut tables = self.tables.write();
        if let Some(period) = tables.active_period(entity, year) {
            return Ok(period.clone());
        }
        let period_count = tables
            .periods
            .values()
            .filter(|p| p.entity_id == entity)
            .map(|p| p.period_count)
            .max()
            .unwrap_or(0)
            + 1;
        let period = ReportingPeriod::new(entity, year, period_count);
        debug!(entity_id = %entity, year, period_count, "Reporting period created");
        tables.periods.insert(period.id, period.clone());
        Ok(period)
    }

    fn update_reporting_period(&self, period: &ReportingPeriod) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        match tables.periods.get_mut(&period.id) {
            Some(stored) if stored.entity_id == period.entity_id => {
                stored.clone_from(period);
                Ok(())
            }
            _ => Err(StoreError::Conflict(format!(
                "reporting period {} does not exist",
                period.id
            ))),
        }
    }

    fn save_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables
            .transactions
            .get(&transaction.id)
            .is_some_and(|stored| stored.posted)
        {
            return Err(StoreError::Conflict(format!(
                "transaction {} is posted",
                transaction.id
            )));
        }
        tables.transactions.insert(transaction.id, transaction.clone());
        Ok(())
    }

    fn transaction(
        &self,
        entity: EntityId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(owned(self.tables.read().transactions.get(&id), entity, |t| t.entity_id))
    }

    fn transactions(
        &self,
        entity: EntityId,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError> {
        let tables = self.tables.read();
        let mut found: Vec<_> = tables
            .transactions
            .values()
            .filter(|tx| tx.entity_id == entity && query.matches(tx))
            .cloned()
            .collect();
        found.sort_by_key(|tx| (tx.date, tx.id));
        Ok(found)
    }

    fn last_sequence(
        &self,
        entity: EntityId,
        period: ReportingPeriodId,
        prefix: &str,
    ) -> Result<u32, StoreError> {
        let tables = self.tables.read();
        if tables.periods.get(&period).is_none_or(|p| p.entity_id != entity) {
            return Ok(0);
        }
        Ok(tables
            .sequences
            .get(&(period, prefix.to_string()))
            .copied()
            .unwrap_or(0))
    }

    fn commit_posting(&self, batch: PostingBatch) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write();
        let PostingBatch {
            transaction,
            sequence,
            entries,
        } = batch;

        match tables.transactions.get(&transaction.id) {
            Some(stored) if stored.entity_id == transaction.entity_id && !stored.posted => {}
            Some(stored) if stored.posted => {
                return Err(StoreError::Conflict(format!(
                    "transaction {} is already posted",
                    transaction.id
                )));
            }
            _ => {
                return Err(StoreError::Conflict(format!(
                    "transaction {} does not exist",
                    transaction.id
                )));
            }
        }

        let claimed = match sequence {
            Some(claim) => {
                let key = (claim.period_id, claim.prefix.to_string());
                let last = tables.sequences.get(&key).copied().unwrap_or(0);
                if claim.sequence != last + 1 {
                    return Err(StoreError::Conflict(format!(
                        "{} sequence is at {last}, cannot take {}",
                        claim.prefix, claim.sequence
                    )));
                }
                Some((key, claim.sequence))
            }
            None => None,
        };

        if let Some((key, sequence)) = claimed {
            tables.sequences.insert(key, sequence);
        }
        tables.entries.insert(transaction.id, entries);
        tables.transactions.insert(transaction.id, transaction);
        Ok(())
    }

    fn commit_unposting(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write();
        if !tables
            .transactions
            .get(&transaction.id)
            .is_some_and(|stored| stored.entity_id == transaction.entity_id && stored.posted)
        {
            return Err(StoreError::Conflict(format!(
                "transaction {} is not posted",
                transaction.id
            )));
        }
        tables.entries.remove(&transaction.id);
        tables.transactions.insert(transaction.id, transaction.clone());
        Ok(())
    }

    fn ledger_entries(
        &self,
        entity: EntityId,
        transaction: TransactionId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let tables = self.tables.read();
        if tables
            .transactions
            .get(&transaction)
            .is_none_or(|tx| tx.entity_id != entity)
        {
            return Ok(Vec::new());
        }
        Ok(tables.entries.get(&transaction).cloned().unwrap_or_default())
    }

    fn account_ledger(
        &self,
        entity: EntityId,
        account: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let tables = self.tables.read();
        let mut rows: Vec<LedgerEntry> = tables
            .live_transactions(entity)
            .filter_map(|tx| tables.entries.get(&tx.id))
            .flatten()
            .filter(|row| row.post_account == account)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.date, row.transaction_id));
        Ok(rows)
    }

    fn insert_clearances(&self, clearances: &[Clearance]) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write();
        for clearance in clearances {
            tables.clearances.insert(clearance.id, clearance.clone());
        }
        Ok(())
    }

    fn clearance(&self, entity: EntityId, id: ClearanceId) -> Result<Option<Clearance>, StoreError> {
        Ok(owned(self.tables.read().clearances.get(&id), entity, |c| c.entity_id))
    }

    fn clearances_for(
        &self,
        entity: EntityId,
        transaction: TransactionId,
    ) -> Result<Vec<Clearance>, StoreError> {
        let tables = self.tables.read();
        let mut found: Vec<_> = tables
            .clearances
            .values()
            .filter(|c| {
                c.entity_id == entity
                    && (c.clearing_transaction_id == transaction
                        || c.cleared_transaction_id == transaction)
            })
            .cloned()
            .collect();
        found.sort_by_key(|c| (c.created_at, c.id));
        Ok(found)
    }

    fn delete_clearance(&self, entity: EntityId, id: ClearanceId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write();
        if tables.clearances.get(&id).is_some_and(|c| c.entity_id == entity) {
            tables.clearances.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    fn lifecycle(&self, entity: EntityId, record: RecordRef) -> Result<Option<Lifecycle>, StoreError> {
        Ok(self
            .tables
            .read()
            .recyclable(entity, record)
            .map(|r| r.lifecycle()))
    }

    fn references(&self, entity: EntityId, record: RecordRef) -> Result<References, StoreError> {
        Ok(self.tables.read().references(entity, record))
    }

    fn recycle(&self, object: RecycledObject) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let target = tables
            .recyclable_mut(object.entity_id, object.record)
            .ok_or_else(|| StoreError::Conflict(format!("{} does not exist", object.record)))?;
        let mut lifecycle = target.lifecycle();
        if !lifecycle.is_active() {
            return Err(StoreError::Conflict(format!("{} is not active", object.record)));
        }
        lifecycle.deleted_at = Some(object.deleted_at);
        target.set_lifecycle(lifecycle);
        tables.recycled.push(object);
        Ok(())
    }

    fn restore_blockers(&self, entity: EntityId, record: RecordRef) -> Result<RestoreBlockers, StoreError> {
        Ok(self.tables.read().restore_blockers(entity, record))
    }

    fn restore(&self, entity: EntityId, record: RecordRef) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.restore_blockers(entity, record).is_empty() {
            return Err(StoreError::Conflict(format!("{record} cannot be restored")));
        }
        let target = tables
            .recyclable_mut(entity, record)
            .ok_or_else(|| StoreError::Conflict(format!("{record} does not exist")))?;
        let mut lifecycle = target.lifecycle();
        if lifecycle.deleted_at.is_none() || lifecycle.destroyed_at.is_some() {
            return Err(StoreError::Conflict(format!("{record} is not in the recycle bin")));
        }
        lifecycle.deleted_at = None;
        target.set_lifecycle(lifecycle);
        tables
            .recycled
            .retain(|o| !(o.entity_id == entity && o.record == record));
        Ok(())
    }

    fn destroy(&self, entity: EntityId, record: RecordRef, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let target = tables
            .recyclable_mut(entity, record)
            .ok_or_else(|| StoreError::Conflict(format!("{record} does not exist")))?;
        let mut lifecycle = target.lifecycle();
        if lifecycle.deleted_at.is_none() || lifecycle.destroyed_at.is_some() {
            return Err(StoreError::Conflict(format!("{record} is not in the recycle bin")));
        }
        lifecycle.destroyed_at = Some(at);
        target.set_lifecycle(lifecycle);
        tables
            .recycled
            .retain(|o| !(o.entity_id == entity && o.record == record));
        Ok(())
    }

    fn recycled_objects(&self, entity: EntityId) -> Result<Vec<RecycledObject>, StoreError> {
        let tables = self.tables.read();
        let mut objects: Vec<_> = tables
            .recycled
            .iter()
            .filter(|o| o.entity_id == entity)
            .cloned()
            .collect();
        objects.sort_by_key(|o| o.deleted_at);
        Ok(objects)
    }
}
