//! Allocation rules.
//!
//! The engine is pure. The `Ledger` facade loads both transactions and
//! their existing clearances under lock, asks the engine whether the
//! allocation is allowed, then writes it.

use rust_decimal::Decimal;
use folio_shared::types::TransactionId;

use super::error::ClearanceError;
use super::types::Clearance;
use crate::transaction::{Capability, Transaction};

/// Settlement position of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Transaction total (line items plus VAT).
    pub amount: Decimal,
    /// Allocated against this transaction.
    pub cleared: Decimal,
    /// Allocated from this transaction to others.
    pub allocated: Decimal,
}

impl Settlement {
    /// Sums the clearances touching `transaction`.
    #[must_use]
    pub fn from_clearances(transaction: TransactionId, amount: Decimal, clearances: &[Clearance]) -> Self {
        let mut settlement = Self {
            amount,
            cleared: Decimal::ZERO,
            allocated: Decimal::ZERO,
        };
        for clearance in clearances {
            if clearance.cleared_transaction_id == transaction {
                settlement.cleared += clearance.line_item_amount;
            }
            if clearance.clearing_transaction_id == transaction {
                settlement.allocated += clearance.line_item_amount;
            }
        }
        settlement
    }

    /// `amount - cleared`.
    #[must_use]
    pub fn uncleared(&self) -> Decimal {
        self.amount - self.cleared
    }

    /// `amount - allocated`.
    #[must_use]
    pub fn unallocated(&self) -> Decimal {
        self.amount - self.allocated
    }
}

/// Clearance validation and auto-allocation planning.
pub struct ClearanceEngine;

impl ClearanceEngine {
    /// Checks whether `amount` of `clearing` may be allocated to `target`.
    ///
    /// # Errors
    ///
    /// Returns the first rule broken, checked in this order: posted,
    /// capabilities, self, main account, currency, entry side, mixed
    /// assignment, positive amount, over-clearance, over-allocation.
    pub fn validate(
        clearing: &Transaction,
        clearing_position: &Settlement,
        target: &Transaction,
        target_position: &Settlement,
        amount: Decimal,
    ) -> Result<(), ClearanceError> {
        for tx in [clearing, target] {
            if !tx.posted {
                return Err(ClearanceError::UnpostedTransaction(tx.id));
            }
        }
        if !clearing.has(Capability::Assignable) {
            return Err(ClearanceError::UnassignableTransaction(clearing.transaction_type));
        }
        if !target.has(Capability::Clearable) {
            return Err(ClearanceError::UnclearableTransaction(target.transaction_type));
        }
        if clearing.id == target.id {
            return Err(ClearanceError::SelfClearance);
        }
        if clearing.account_id != target.account_id {
            return Err(ClearanceError::MainAccountMismatch);
        }
        if clearing.currency_id != target.currency_id {
            return Err(ClearanceError::CurrencyMismatch);
        }
        if clearing.main_entry_side() == target.main_entry_side() {
            return Err(ClearanceError::IncompatibleEntrySide);
        }
        if clearing_position.cleared > Decimal::ZERO {
            return Err(ClearanceError::MixedAssignment(clearing.id));
        }
        if target_position.allocated > Decimal::ZERO {
            return Err(ClearanceError::MixedAssignment(target.id));
        }
        if amount <= Decimal::ZERO {
            return Err(ClearanceError::NegativeAmount(amount));
        }
        if amount > target_position.uncleared() {
            return Err(ClearanceError::OverClearance {
                requested: amount,
                available: target_position.uncleared(),
            });
        }
        if amount > clearing_position.unallocated() {
            return Err(ClearanceError::OverAllocation {
                requested: amount,
                available: clearing_position.unallocated(),
            });
        }
        Ok(())
    }

    /// Greedy allocation of whatever `clearing` has left, oldest target first.
    ///
    /// Candidates are visited by ascending date, then id. Each valid target
    /// takes the smaller of its outstanding balance and what remains.
    #[must_use]
    pub fn plan(
        clearing: &Transaction,
        clearing_position: &Settlement,
        candidates: &[(&Transaction, Settlement)],
    ) -> Vec<(TransactionId, Decimal)> {
        let mut ordered: Vec<_> = candidates.iter().collect();
        ordered.sort_by_key(|(tx, _)| (tx.date, tx.id));

        let mut position = *clearing_position;
        let mut plan = Vec::new();
        for (target, target_position) in ordered {
            let remaining = position.unallocated();
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = remaining.min(target_position.uncleared());
            if take <= Decimal::ZERO {
                continue;
            }
            if Self::validate(clearing, &position, target, target_position, take).is_ok() {
                position.allocated += take;
                plan.push((target.id, take));
            }
        }
        plan
    }
}
