//! The `Ledger` facade.
//!
//! Owns the store, the clock and the lock registry, and is the only place
//! engine rules meet persistence. Every method takes an explicit
//! [`EntityContext`].

mod clearance;
mod period;
mod posting;
mod recycle;
mod reference;

use std::sync::Arc;

use folio_shared::types::{AccountId, CurrencyId, TransactionId};

use crate::account::Account;
use crate::context::{Clock, EntityContext};
use crate::currency::{Currency, CurrencyError};
use crate::ledger::PostingError;
use crate::lock::LockRegistry;
use crate::store::LedgerStore;
use crate::transaction::Transaction;

/// Bookkeeping engine over a `LedgerStore`.
pub struct Ledger<S, C> {
    store: Arc<S>,
    clock: C,
    locks: LockRegistry,
}

impl<S: LedgerStore, C: Clock> Ledger<S, C> {
    /// Creates a ledger over `store`.
    pub fn new(store: Arc<S>, clock: C) -> Self {
        Self {
            store,
            clock,
            locks: LockRegistry::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The injected clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    fn live_transaction(&self, ctx: &EntityContext, id: TransactionId) -> Result<Transaction, PostingError> {
        self.store
            .transaction(ctx.entity_id, id)?
            .filter(Transaction::is_active)
            .ok_or_else(|| PostingError::NotFound(id.into()))
    }

    fn live_account(&self, ctx: &EntityContext, id: AccountId) -> Result<Account, PostingError> {
        self.store
            .account(ctx.entity_id, id)?
            .filter(Account::is_active)
            .ok_or_else(|| PostingError::NotFound(id.into()))
    }

    fn live_currency(&self, ctx: &EntityContext, id: CurrencyId) -> Result<Currency, CurrencyError> {
        self.store
            .currency(ctx.entity_id, id)
            .map_err(CurrencyError::from)?
            .filter(Currency::is_active)
            .ok_or(CurrencyError::NotFound(id))
    }

    fn decimal_places(&self, ctx: &EntityContext, id: CurrencyId) -> Result<u32, CurrencyError> {
        Ok(self.live_currency(ctx, id)?.decimal_places)
    }
}
