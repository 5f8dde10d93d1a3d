//! Lifecycle rules for recyclable records.

use super::error::RecycleError;
use super::types::{Lifecycle, RecordRef, References, RestoreBlockers};

/// Pure checks run before the store is asked to change a lifecycle.
pub struct RecycleBin;

impl RecycleBin {
    /// A record may be soft-deleted when it is live and nothing references it.
    ///
    /// # Errors
    ///
    /// `NotFound`, `AlreadyDestroyed`, `AlreadyDeleted`, `HangingClearances`
    /// or `HangingReferences`, checked in that order.
    pub fn check_delete(
        record: RecordRef,
        lifecycle: Option<Lifecycle>,
        references: References,
    ) -> Result<(), RecycleError> {
        let lifecycle = lifecycle.ok_or(RecycleError::NotFound(record))?;
        if lifecycle.destroyed_at.is_some() {
            return Err(RecycleError::AlreadyDestroyed(record));
        }
        if lifecycle.deleted_at.is_some() {
            return Err(RecycleError::AlreadyDeleted(record));
        }
        if references.clearances > 0 {
            return Err(RecycleError::HangingClearances {
                record,
                count: references.clearances,
            });
        }
        if references.records > 0 {
            return Err(RecycleError::HangingReferences {
                record,
                count: references.records,
            });
        }
        Ok(())
    }

    /// Restore and destroy both require a soft-deleted, undestroyed record.
    ///
    /// # Errors
    ///
    /// `NotFound`, `AlreadyDestroyed` or `NotDeleted`.
    pub fn check_deleted(record: RecordRef, lifecycle: Option<Lifecycle>) -> Result<(), RecycleError> {
        let lifecycle = lifecycle.ok_or(RecycleError::NotFound(record))?;
        if lifecycle.destroyed_at.is_some() {
            return Err(RecycleError::AlreadyDestroyed(record));
        }
        if lifecycle.deleted_at.is_none() {
            return Err(RecycleError::NotDeleted(record));
        }
        Ok(())
    }

    /// A deleted record may come back only if everything it points at is
    /// still active and nothing has taken its place.
    ///
    /// # Errors
    ///
    /// The `check_deleted` errors, then `DeletedDependency` or `Replaced`.
    pub fn check_restore(
        record: RecordRef,
        lifecycle: Option<Lifecycle>,
        blockers: &RestoreBlockers,
    ) -> Result<(), RecycleError> {
        Self::check_deleted(record, lifecycle)?;
        if let Some(&dependency) = blockers.deleted_dependencies.first() {
            return Err(RecycleError::DeletedDependency { record, dependency });
        }
        if let Some(&replacement) = blockers.replacements.first() {
            return Err(RecycleError::Replaced { record, replacement });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_shared::types::TransactionId;

    fn record() -> RecordRef {
        TransactionId::new().into()
    }

    fn deleted() -> Lifecycle {
        Lifecycle {
            deleted_at: Some(Utc::now()),
            destroyed_at: None,
        }
    }

    fn destroyed() -> Lifecycle {
        Lifecycle {
            deleted_at: Some(Utc::now()),
            destroyed_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_delete_live_unreferenced() {
        assert!(RecycleBin::check_delete(record(), Some(Lifecycle::default()), References::default()).is_ok());
    }

    #[test]
    fn test_delete_missing() {
        let r = record();
        assert!(matches!(
            RecycleBin::check_delete(r, None, References::default()),
            Err(RecycleError::NotFound(found)) if found == r
        ));
    }

    #[test]
    fn test_delete_with_clearances_reports_clearances_first() {
        let refs = References {
            clearances: 1,
            records: 3,
        };
        assert!(matches!(
            RecycleBin::check_delete(record(), Some(Lifecycle::default()), refs),
            Err(RecycleError::HangingClearances { count: 1, .. })
        ));
    }

    #[test]
    fn test_delete_with_references() {
        let refs = References {
            clearances: 0,
            records: 2,
        };
        assert!(matches!(
            RecycleBin::check_delete(record(), Some(Lifecycle::default()), refs),
            Err(RecycleError::HangingReferences { count: 2, .. })
        ));
    }

    #[test]
    fn test_delete_twice() {
        assert!(matches!(
            RecycleBin::check_delete(record(), Some(deleted()), References::default()),
            Err(RecycleError::AlreadyDeleted(_))
        ));
    }

    #[test]
    fn test_destroyed_is_final() {
        assert!(matches!(
            RecycleBin::check_delete(record(), Some(destroyed()), References::default()),
            Err(RecycleError::AlreadyDestroyed(_))
        ));
        assert!(matches!(
            RecycleBin::check_deleted(record(), Some(destroyed())),
            Err(RecycleError::AlreadyDestroyed(_))
        ));
    }

    #[test]
    fn test_restore_blocked_by_deleted_dependency() {
        let dependency = RecordRef::from(folio_shared::types::AccountId::new());
        let blockers = RestoreBlockers {
            deleted_dependencies: vec![dependency],
            replacements: vec![record()],
        };
        assert!(matches!(
            RecycleBin::check_restore(record(), Some(deleted()), &blockers),
            Err(RecycleError::DeletedDependency { dependency: found, .. }) if found == dependency
        ));

        let replacement = record();
        let blockers = RestoreBlockers {
            deleted_dependencies: Vec::new(),
            replacements: vec![replacement],
        };
        assert!(matches!(
            RecycleBin::check_restore(record(), Some(deleted()), &blockers),
            Err(RecycleError::Replaced { replacement: found, .. }) if found == replacement
        ));
        assert!(RecycleBin::check_restore(record(), Some(deleted()), &RestoreBlockers::default()).is_ok());
    }

    #[test]
    fn test_restore_requires_deleted() {
        assert!(RecycleBin::check_deleted(record(), Some(deleted())).is_ok());
        assert!(matches!(
            RecycleBin::check_deleted(record(), Some(Lifecycle::default())),
            Err(RecycleError::NotDeleted(_))
        ));
    }
}
