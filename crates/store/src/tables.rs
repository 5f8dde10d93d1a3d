//! Row storage behind `MemoryStore`.

use std::collections::HashMap;

use chrono::Datelike;
use folio_core::account::Account;
use folio_core::clearance::Clearance;
use folio_core::context::Entity;
use folio_core::currency::{Currency, ExchangeRate};
use folio_core::ledger::LedgerEntry;
use folio_core::period::ReportingPeriod;
use folio_core::recycle::{
    RecordKind, RecordRef, Recyclable, RecycledObject, References, RestoreBlockers,
};
use folio_core::transaction::Transaction;
use folio_core::vat::Vat;
use folio_shared::types::{
    AccountId, ClearanceId, CurrencyId, EntityId, ExchangeRateId, ReportingPeriodId,
    TransactionId, VatId,
};

/// Looks up a recyclable record owned by `$entity`, using `get` or `get_mut`.
macro_rules! recyclable {
    ($tables:expr, $get:ident, $entity:expr, $record:expr, $as:ty) => {{
        let entity = $entity;
        let id = $record.id;
        match $record.kind {
            RecordKind::Account => $tables
                .accounts
                .$get(&AccountId::from_uuid(id))
                .filter(|r| r.entity_id == entity)
                .map(|r| r as $as),
            RecordKind::Currency => $tables
                .currencies
                .$get(&CurrencyId::from_uuid(id))
                .filter(|r| r.entity_id == entity)
                .map(|r| r as $as),
            RecordKind::ExchangeRate => $tables
                .rates
                .$get(&ExchangeRateId::from_uuid(id))
                .filter(|r| r.entity_id == entity)
                .map(|r| r as $as),
            RecordKind::Vat => $tables
                .vats
                .$get(&VatId::from_uuid(id))
                .filter(|r| r.entity_id == entity)
                .map(|r| r as $as),
            RecordKind::ReportingPeriod => $tables
                .periods
                .$get(&ReportingPeriodId::from_uuid(id))
                .filter(|r| r.entity_id == entity)
                .map(|r| r as $as),
            RecordKind::Transaction => $tables
                .transactions
                .$get(&TransactionId::from_uuid(id))
                .filter(|r| r.entity_id == entity)
                .map(|r| r as $as),
        }
    }};
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub entities: HashMap<EntityId, Entity>,
    pub currencies: HashMap<CurrencyId, Currency>,
    pub accounts: HashMap<AccountId, Account>,
    pub rates: HashMap<ExchangeRateId, ExchangeRate>,
    pub vats: HashMap<VatId, Vat>,
    pub periods: HashMap<ReportingPeriodId, ReportingPeriod>,
    pub transactions: HashMap<TransactionId, Transaction>,
    /// Ledger rows keyed by transaction, in posting order.
    pub entries: HashMap<TransactionId, Vec<LedgerEntry>>,
    pub clearances: HashMap<ClearanceId, Clearance>,
    pub recycled: Vec<RecycledObject>,
    /// Last number taken per (period, prefix).
    pub sequences: HashMap<(ReportingPeriodId, String), u32>,
}

impl Tables {
    pub fn recyclable(&self, entity: EntityId, record: RecordRef) -> Option<&dyn Recyclable> {
        recyclable!(self, get, entity, record, &dyn Recyclable)
    }

    pub fn recyclable_mut(&mut self, entity: EntityId, record: RecordRef) -> Option<&mut dyn Recyclable> {
        recyclable!(self, get_mut, entity, record, &mut dyn Recyclable)
    }

    pub fn live_transactions(&self, entity: EntityId) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .values()
            .filter(move |tx| tx.entity_id == entity && tx.is_active())
    }

    pub fn active_period(&self, entity: EntityId, year: i32) -> Option<&ReportingPeriod> {
        self.periods
            .values()
            .find(|p| p.entity_id == entity && p.year == year && p.is_active())
    }

    /// What `record` points at that is no longer active, and any active
    /// period that replaced it.
    pub fn restore_blockers(&self, entity: EntityId, record: RecordRef) -> RestoreBlockers {
        let id = record.id;
        let mut dependencies: Vec<RecordRef> = Vec::new();
        let mut replacements = Vec::new();
        match record.kind {
            RecordKind::Account => {
                if let Some(account) = self.accounts.get(&AccountId::from_uuid(id)) {
                    dependencies.push(account.currency_id.into());
                }
            }
            RecordKind::Currency => {}
            RecordKind::ExchangeRate => {
                if let Some(rate) = self.rates.get(&ExchangeRateId::from_uuid(id)) {
                    dependencies.push(rate.currency_id.into());
                }
            }
            RecordKind::Vat => {
                if let Some(vat) = self.vats.get(&VatId::from_uuid(id)) {
                    dependencies.push(vat.account_id.into());
                }
            }
            RecordKind::ReportingPeriod => {
                let period = self
                    .periods
                    .get(&ReportingPeriodId::from_uuid(id))
                    .filter(|p| p.entity_id == entity);
                if let Some(active) = period.and_then(|p| self.active_period(entity, p.year)) {
                    replacements.push(active.record_ref());
                }
            }
            RecordKind::Transaction => {
                if let Some(tx) = self.transactions.get(&TransactionId::from_uuid(id)) {
                    dependencies.push(tx.account_id.into());
                    dependencies.push(tx.currency_id.into());
                    dependencies.extend(tx.exchange_rate_id.map(RecordRef::from));
                    for item in &tx.line_items {
                        dependencies.push(item.account_id.into());
                        if let Some(vat) = item.vat {
                            dependencies.push(vat.vat_id.into());
                            dependencies.push(vat.account_id.into());
                        }
                    }
                }
            }
        }
        dependencies.retain(|dependency| {
            self.recyclable(entity, *dependency)
                .is_none_or(|r| !r.lifecycle().is_active())
        });
        dependencies.dedup();
        RestoreBlockers {
            deleted_dependencies: dependencies,
            replacements,
        }
    }

    /// Live records and clearances that would dangle if `record` went away.
    pub fn references(&self, entity: EntityId, record: RecordRef) -> References {
        let id = record.id;
        match record.kind {
            RecordKind::Account => {
                let account = AccountId::from_uuid(id);
                let transactions = self
                    .live_transactions(entity)
                    .filter(|tx| {
                        tx.account_id == account
                            || tx.line_items.iter().any(|item| {
                                item.account_id == account
                                    || item.vat.as_ref().is_some_and(|vat| vat.account_id == account)
                            })
                    })
                    .count();
                let vats = self
                    .vats
                    .values()
                    .filter(|v| v.entity_id == entity && v.is_active() && v.account_id == account)
                    .count();
                References {
                    clearances: 0,
                    records: transactions + vats,
                }
            }
            RecordKind::Currency => {
                let currency = CurrencyId::from_uuid(id);
                let accounts = self
                    .accounts
                    .values()
                    .filter(|a| a.entity_id == entity && a.is_active() && a.currency_id == currency)
                    .count();
                let transactions = self
                    .live_transactions(entity)
                    .filter(|tx| tx.currency_id == currency)
                    .count();
                let rates = self
                    .rates
                    .values()
                    .filter(|r| r.entity_id == entity && r.is_active() && r.currency_id == currency)
                    .count();
                let reporting = usize::from(
                    self.entities
                        .get(&entity)
                        .is_some_and(|e| e.reporting_currency == currency),
                );
                References {
                    clearances: 0,
                    records: accounts + transactions + rates + reporting,
                }
            }
            RecordKind::ExchangeRate => {
                let rate = ExchangeRateId::from_uuid(id);
                References {
                    clearances: 0,
                    records: self
                        .live_transactions(entity)
                        .filter(|tx| tx.exchange_rate_id == Some(rate))
                        .count(),
                }
            }
            RecordKind::Vat => {
                let vat = VatId::from_uuid(id);
                References {
                    clearances: 0,
                    records: self
                        .live_transactions(entity)
                        .flat_map(|tx| &tx.line_items)
                        .filter(|item| item.vat.as_ref().is_some_and(|v| v.vat_id == vat))
                        .count(),
                }
            }
            RecordKind::ReportingPeriod => {
                let year = self
                    .periods
                    .get(&ReportingPeriodId::from_uuid(id))
                    .filter(|p| p.entity_id == entity)
                    .map(|p| p.year);
                References {
                    clearances: 0,
                    records: year.map_or(0, |year| {
                        self.live_transactions(entity)
                            .filter(|tx| tx.date.year() == year)
                            .count()
                    }),
                }
            }
            RecordKind::Transaction => {
                let transaction = TransactionId::from_uuid(id);
                References {
                    clearances: self
                        .clearances
                        .values()
                        .filter(|c| {
                            c.entity_id == entity
                                && (c.clearing_transaction_id == transaction
                                    || c.cleared_transaction_id == transaction)
                        })
                        .count(),
                    records: 0,
                }
            }
        }
    }
}
