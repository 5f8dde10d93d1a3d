//! Per-key mutual exclusion.
//!
//! Locks are keyed, created on first use and never removed. All keys an
//! operation needs are taken in a single [`LockRegistry::with_locks`] call,
//! in sorted order, so two operations can never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use folio_shared::types::{EntityId, ReportingPeriodId, TransactionId};

/// What a lock protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    /// A (period, prefix) number series.
    Sequence {
        /// Owning entity.
        entity: EntityId,
        /// Period of the series.
        period: ReportingPeriodId,
        /// Transaction type prefix.
        prefix: &'static str,
    },
    /// One transaction and its clearances.
    Transaction(TransactionId),
}

/// Registry of keyed mutexes.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<LockKey, Arc<Mutex<()>>>,
}

impl LockRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding every lock in `keys`.
    ///
    /// Keys are sorted and deduplicated first. Must not be nested: calling
    /// `with_locks` from inside `f` can deadlock.
    pub fn with_locks<T>(&self, keys: impl IntoIterator<Item = LockKey>, f: impl FnOnce() -> T) -> T {
        let mut keys: Vec<LockKey> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();

        // Clone the Arcs out first so no DashMap shard guard is held while blocking.
        let mutexes: Vec<Arc<Mutex<()>>> = keys
            .iter()
            .map(|key| Arc::clone(self.locks.entry(*key).or_default().value()))
            .collect();
        let _guards: Vec<_> = mutexes.iter().map(|m| m.lock()).collect();
        f()
    }

    /// Number of keys ever locked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no key has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_duplicate_keys_do_not_deadlock() {
        let registry = LockRegistry::new();
        let tx = TransactionId::new();
        let value = registry.with_locks([LockKey::Transaction(tx), LockKey::Transaction(tx)], || 7);
        assert_eq!(value, 7);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_serializes_same_key() {
        let registry = Arc::new(LockRegistry::new());
        let tx = TransactionId::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    for _ in 0..50 {
                        registry.with_locks([LockKey::Transaction(tx)], || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_seen.fetch_max(now, Ordering::SeqCst);
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_opposite_order_requests_do_not_deadlock() {
        let registry = Arc::new(LockRegistry::new());
        let a = LockKey::Transaction(TransactionId::new());
        let b = LockKey::Transaction(TransactionId::new());

        let handles: Vec<_> = [[a, b], [b, a]]
            .into_iter()
            .map(|keys| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..200 {
                        registry.with_locks(keys, || ());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
