//! Recycle bin operations.

use chrono::Datelike;
use tracing::{info, warn};
use folio_shared::types::{RecycledObjectId, TransactionId};

use super::Ledger;
use crate::context::{Clock, EntityContext};
use crate::lock::LockKey;
use crate::period::ensure_open;
use crate::recycle::{RecordKind, RecordRef, RecycleBin, RecycleError, RecycledObject};
use crate::store::LedgerStore;

impl<S: LedgerStore, C: Clock> Ledger<S, C> {
    /// Moves a record to the recycle bin.
    ///
    /// Rejected while clearances or other live records reference it, and for
    /// transactions dated in a closed period.
    pub fn soft_delete(
        &self,
        ctx: &EntityContext,
        record: impl Into<RecordRef>,
    ) -> Result<RecycledObject, RecycleError> {
        let record = record.into();
        self.locks.with_locks(record_locks(record), || {
            let lifecycle = self.store.lifecycle(ctx.entity_id, record)?;
            let references = self.store.references(ctx.entity_id, record)?;
            RecycleBin::check_delete(record, lifecycle, references).inspect_err(|err| {
                if matches!(
                    err,
                    RecycleError::HangingClearances { .. } | RecycleError::HangingReferences { .. }
                ) {
                    warn!(entity_id = %ctx.entity_id, %record, error = %err, "Delete rejected");
                }
            })?;
            self.ensure_record_period_open(ctx, record)?;

            let object = RecycledObject {
                id: RecycledObjectId::new(),
                entity_id: ctx.entity_id,
                record,
                deleted_at: self.clock.now(),
            };
            self.store.recycle(object.clone())?;
            info!(entity_id = %ctx.entity_id, %record, "Record moved to recycle bin");
            Ok(object)
        })
    }

    /// Takes a record back out of the recycle bin.
    ///
    /// Rejected while anything the record points at is deleted, and for a
    /// reporting period whose year has gained a new active period.
    pub fn restore(&self, ctx: &EntityContext, record: impl Into<RecordRef>) -> Result<(), RecycleError> {
        let record = record.into();
        self.locks.with_locks(record_locks(record), || {
            let lifecycle = self.store.lifecycle(ctx.entity_id, record)?;
            RecycleBin::check_deleted(record, lifecycle)?;
            self.ensure_record_period_open(ctx, record)?;
            let blockers = self.store.restore_blockers(ctx.entity_id, record)?;
            RecycleBin::check_restore(record, lifecycle, &blockers)
                .inspect_err(|err| warn!(entity_id = %ctx.entity_id, %record, error = %err, "Restore rejected"))?;
            self.store.restore(ctx.entity_id, record)?;
            info!(entity_id = %ctx.entity_id, %record, "Record restored");
            Ok(())
        })
    }

    /// Permanently destroys a soft-deleted record.
    pub fn destroy(&self, ctx: &EntityContext, record: impl Into<RecordRef>) -> Result<(), RecycleError> {
        let record = record.into();
        self.locks.with_locks(record_locks(record), || {
            let lifecycle = self.store.lifecycle(ctx.entity_id, record)?;
            RecycleBin::check_deleted(record, lifecycle)?;
            self.ensure_record_period_open(ctx, record)?;
            self.store.destroy(ctx.entity_id, record, self.clock.now())?;
            info!(entity_id = %ctx.entity_id, %record, "Record destroyed");
            Ok(())
        })
    }

    /// Contents of the recycle bin.
    pub fn recycled_objects(&self, ctx: &EntityContext) -> Result<Vec<RecycledObject>, RecycleError> {
        Ok(self.store.recycled_objects(ctx.entity_id)?)
    }

    fn ensure_record_period_open(&self, ctx: &EntityContext, record: RecordRef) -> Result<(), RecycleError> {
        if record.kind != RecordKind::Transaction {
            return Ok(());
        }
        let id = TransactionId::from_uuid(record.id);
        let Some(transaction) = self.store.transaction(ctx.entity_id, id)? else {
            return Err(RecycleError::NotFound(record));
        };
        let period = self.store.reporting_period(ctx.entity_id, transaction.date.year())?;
        ensure_open(period.as_ref(), transaction.date).map_err(|err| {
            warn!(entity_id = %ctx.entity_id, %record, year = err.year, "Rejected: reporting period is closed");
            RecycleError::from(err)
        })
    }
}

fn record_locks(record: RecordRef) -> Vec<LockKey> {
    match record.kind {
        RecordKind::Transaction => vec![LockKey::Transaction(TransactionId::from_uuid(record.id))],
        _ => Vec::new(),
    }
}
