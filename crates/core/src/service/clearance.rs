//! Allocation of settling transactions.

use rust_decimal::Decimal;
use tracing::{debug, info};
use folio_shared::types::{ClearanceId, Money, TransactionId};

use super::Ledger;
use crate::clearance::{Clearance, ClearanceEngine, ClearanceError, Settlement};
use crate::context::{Clock, EntityContext};
use crate::currency::CurrencyError;
use crate::lock::LockKey;
use crate::store::LedgerStore;
use crate::transaction::{Capability, Transaction, TransactionQuery};

impl<S: LedgerStore, C: Clock> Ledger<S, C> {
    /// Allocates `amount` of `clearing_id` against `cleared_id`.
    pub fn allocate(
        &self,
        ctx: &EntityContext,
        clearing_id: TransactionId,
        cleared_id: TransactionId,
        amount: Decimal,
    ) -> Result<Clearance, ClearanceError> {
        let keys = [LockKey::Transaction(clearing_id), LockKey::Transaction(cleared_id)];
        self.locks.with_locks(keys, || {
            let clearing = self.settlement_transaction(ctx, clearing_id)?;
            let cleared = self.settlement_transaction(ctx, cleared_id)?;
            let clearing_position = self.position(ctx, &clearing)?;
            let cleared_position = self.position(ctx, &cleared)?;
            ClearanceEngine::validate(&clearing, &clearing_position, &cleared, &cleared_position, amount)?;

            let clearance = Clearance::new(ctx.entity_id, clearing_id, cleared_id, amount, self.clock.now());
            self.store.insert_clearances(std::slice::from_ref(&clearance))?;
            info!(
                entity_id = %ctx.entity_id,
                clearance_id = %clearance.id,
                clearing_transaction_id = %clearing_id,
                cleared_transaction_id = %cleared_id,
                amount = %amount,
                "Clearance allocated"
            );
            Ok(clearance)
        })
    }

    /// Allocates whatever `clearing_id` has left to the oldest outstanding
    /// transactions on the same main account.
    pub fn auto_allocate(&self, ctx: &EntityContext, clearing_id: TransactionId) -> Result<Vec<Clearance>, ClearanceError> {
        let peek = self.settlement_transaction(ctx, clearing_id)?;
        let query = TransactionQuery::new()
            .account(peek.account_id)
            .currency(peek.currency_id)
            .posted(true);
        let candidate_ids: Vec<TransactionId> = self
            .store
            .transactions(ctx.entity_id, &query)?
            .into_iter()
            .filter(|tx| tx.id != clearing_id && tx.has(Capability::Clearable))
            .map(|tx| tx.id)
            .collect();

        let keys = std::iter::once(clearing_id)
            .chain(candidate_ids.iter().copied())
            .map(LockKey::Transaction)
            .collect::<Vec<_>>();
        self.locks.with_locks(keys, || {
            let clearing = self.settlement_transaction(ctx, clearing_id)?;
            let clearing_position = self.position(ctx, &clearing)?;

            let mut targets = Vec::with_capacity(candidate_ids.len());
            for id in &candidate_ids {
                if let Some(tx) = self.store.transaction(ctx.entity_id, *id)?.filter(Transaction::is_active) {
                    let position = self.position(ctx, &tx)?;
                    targets.push((tx, position));
                }
            }
            let candidates: Vec<(&Transaction, Settlement)> = targets.iter().map(|(tx, p)| (tx, *p)).collect();

            let now = self.clock.now();
            let clearances: Vec<Clearance> = ClearanceEngine::plan(&clearing, &clearing_position, &candidates)
                .into_iter()
                .map(|(target, amount)| Clearance::new(ctx.entity_id, clearing_id, target, amount, now))
                .collect();
            if clearances.is_empty() {
                debug!(clearing_transaction_id = %clearing_id, "Nothing to auto-allocate");
                return Ok(clearances);
            }
            self.store.insert_clearances(&clearances)?;
            let total: Decimal = clearances.iter().map(|c| c.line_item_amount).sum();
            info!(
                entity_id = %ctx.entity_id,
                clearing_transaction_id = %clearing_id,
                clearances = clearances.len(),
                amount = %total,
                "Clearances auto-allocated"
            );
            Ok(clearances)
        })
    }

    /// Removes a clearance and returns it.
    pub fn remove_clearance(&self, ctx: &EntityContext, clearance_id: ClearanceId) -> Result<Clearance, ClearanceError> {
        let clearance = self
            .store
            .clearance(ctx.entity_id, clearance_id)?
            .ok_or(ClearanceError::ClearanceNotFound(clearance_id))?;
        let keys = [
            LockKey::Transaction(clearance.clearing_transaction_id),
            LockKey::Transaction(clearance.cleared_transaction_id),
        ];
        self.locks.with_locks(keys, || {
            if !self.store.delete_clearance(ctx.entity_id, clearance_id)? {
                return Err(ClearanceError::ClearanceNotFound(clearance_id));
            }
            info!(entity_id = %ctx.entity_id, clearance_id = %clearance_id, "Clearance removed");
            Ok(clearance)
        })
    }

    /// Total allocated against `transaction_id`.
    pub fn cleared_amount(&self, ctx: &EntityContext, transaction_id: TransactionId) -> Result<Money, ClearanceError> {
        let tx = self.settlement_transaction(ctx, transaction_id)?;
        let position = self.position(ctx, &tx)?;
        Ok(Money::new(position.cleared, tx.currency_id))
    }

    /// `amount - cleared_amount`.
    pub fn uncleared_amount(&self, ctx: &EntityContext, transaction_id: TransactionId) -> Result<Money, ClearanceError> {
        let tx = self.settlement_transaction(ctx, transaction_id)?;
        let position = self.position(ctx, &tx)?;
        Ok(Money::new(position.uncleared(), tx.currency_id))
    }

    /// What a settling transaction has left to allocate.
    pub fn unallocated_amount(&self, ctx: &EntityContext, transaction_id: TransactionId) -> Result<Money, ClearanceError> {
        let tx = self.settlement_transaction(ctx, transaction_id)?;
        let position = self.position(ctx, &tx)?;
        Ok(Money::new(position.unallocated(), tx.currency_id))
    }

    fn settlement_transaction(&self, ctx: &EntityContext, id: TransactionId) -> Result<Transaction, ClearanceError> {
        self.store
            .transaction(ctx.entity_id, id)?
            .filter(Transaction::is_active)
            .ok_or_else(|| ClearanceError::NotFound(id.into()))
    }

    fn position(&self, ctx: &EntityContext, tx: &Transaction) -> Result<Settlement, ClearanceError> {
        let dp = self.decimal_places(ctx, tx.currency_id).map_err(|err| match err {
            CurrencyError::Persistence(e) => ClearanceError::Persistence(e),
            _ => ClearanceError::NotFound(tx.currency_id.into()),
        })?;
        let clearances = self.store.clearances_for(ctx.entity_id, tx.id)?;
        Ok(Settlement::from_clearances(tx.id, tx.amount(dp)?, &clearances))
    }
}
