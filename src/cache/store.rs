//! Entity Store Module
//!
//! One keyed table per entity type: an eviction strategy guarded by a single
//! reader/writer lock. Every operation holds the lock for its full duration,
//! eviction side effects included.

use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::eviction::{self, Algorithm, EvictionStrategy};
use crate::cache::{CacheStats, StatsCounters};
use crate::entity::Snowflake;

// == Upsert ==
/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// An existing entry was rewritten in place
    Updated,
    /// A new entry was inserted
    Inserted,
}

// == Entity Store ==
/// A locked, capacity-bounded table for one entity type.
pub struct EntityStore<T> {
    /// Entity kind, for logs
    kind: &'static str,
    /// Storage and eviction policy
    strategy: RwLock<Box<dyn EvictionStrategy<T>>>,
    /// Lookup and reclamation counters
    stats: StatsCounters,
}

impl<T> EntityStore<T>
where
    T: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a store backed by a freshly constructed strategy.
    pub fn new(
        kind: &'static str,
        algorithm: Algorithm,
        capacity: Option<usize>,
        lifetime: Option<Duration>,
    ) -> Self {
        debug!(
            "Creating {} store: algorithm={}, capacity={:?}, lifetime={:?}",
            kind, algorithm, capacity, lifetime
        );
        Self {
            kind,
            strategy: RwLock::new(eviction::construct(algorithm, capacity, lifetime)),
            stats: StatsCounters::new(),
        }
    }

    // == View ==
    /// Runs `f` on a live item under the shared lock.
    ///
    /// Returns `None` if the item is absent or expired.
    pub fn view<R>(&self, id: Snowflake, f: impl FnOnce(&T) -> R) -> Option<R> {
        let strategy = self.strategy.read();
        match strategy.get(id) {
            Some(entry) => {
                self.stats.record_hit();
                Some(f(&entry.item))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Upsert ==
    /// Rewrites an existing item with `update`, or inserts the item built by `create`.
    ///
    /// Rewrites refresh the entry's eviction bookkeeping.
    pub fn upsert(
        &self,
        id: Snowflake,
        update: impl FnOnce(&mut T),
        create: impl FnOnce() -> T,
    ) -> Upsert {
        let mut strategy = self.strategy.write();
        if let Some(entry) = strategy.get_mut(id) {
            update(&mut entry.item);
            strategy.touch(id);
            return Upsert::Updated;
        }
        self.insert_locked(&mut strategy, id, create());
        Upsert::Inserted
    }

    // == Delete ==
    /// Removes an item. Returns true if it was present.
    pub fn delete(&self, id: Snowflake) -> bool {
        self.strategy.write().delete(id)
    }

    // == Purge Expired ==
    /// Physically removes every entry whose lifetime ran out.
    pub fn purge_expired(&self) -> usize {
        let removed = self.strategy.write().purge_expired();
        if removed > 0 {
            self.stats.record_expirations(removed);
            debug!("Purged {} expired {}", removed, self.kind);
        }
        removed
    }

    // == Length ==
    /// Returns the current number of stored entries.
    pub fn len(&self) -> usize {
        self.strategy.read().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    fn insert_locked(&self, strategy: &mut Box<dyn EvictionStrategy<T>>, id: Snowflake, item: T) {
        let outcome = strategy.set(id, item);
        if outcome.expired > 0 {
            self.stats.record_expirations(outcome.expired);
        }
        if !outcome.evicted.is_empty() {
            self.stats.record_evictions(outcome.evicted.len());
            debug!("Evicted {} {}: {:?}", outcome.evicted.len(), self.kind, outcome.evicted);
        }
    }
}

impl<T> std::fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategy = self.strategy.read();
        f.debug_struct("EntityStore")
            .field("kind", &self.kind)
            .field("algorithm", &strategy.algorithm())
            .field("capacity", &strategy.capacity())
            .field("entries", &strategy.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn id(raw: u64) -> Snowflake {
        Snowflake::new(raw)
    }

    fn store(capacity: Option<usize>) -> EntityStore<String> {
        EntityStore::new("tests", Algorithm::Lru, capacity, None)
    }

    fn put<T: Clone + Send + Sync + 'static>(store: &EntityStore<T>, raw: u64, value: T) -> Upsert {
        let replacement = value.clone();
        store.upsert(id(raw), move |item| *item = replacement, move || value)
    }

    #[test]
    fn test_store_new() {
        let store = store(None);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_and_view() {
        let store = store(None);

        put(&store, 1, "value1".to_string());

        assert_eq!(store.view(id(1), |item| item.clone()), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_view_nonexistent() {
        let store = store(None);
        assert!(store.view(id(9), |item| item.clone()).is_none());
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let store = store(None);

        let first = store.upsert(id(1), |item| item.push('!'), || "new".to_string());
        let second = store.upsert(id(1), |item| item.push('!'), || "unused".to_string());

        assert_eq!(first, Upsert::Inserted);
        assert_eq!(second, Upsert::Updated);
        assert_eq!(store.view(id(1), |item| item.clone()), Some("new!".to_string()));
    }

    #[test]
    fn test_upsert_creates_only_when_absent() {
        let store = store(None);
        let mut created = 0;

        store.upsert(id(1), |_| {}, || {
            created += 1;
            "first".to_string()
        });
        store.upsert(id(1), |_| {}, || {
            created += 1;
            "second".to_string()
        });

        assert_eq!(created, 1);
        assert_eq!(store.view(id(1), |item| item.clone()), Some("first".to_string()));
    }

    #[test]
    fn test_delete() {
        let store = store(None);
        put(&store, 1, "value1".to_string());

        assert!(store.delete(id(1)));
        assert!(!store.delete(id(1)));
        assert!(store.view(id(1), |_| ()).is_none());
    }

    #[test]
    fn test_eviction_counted_in_stats() {
        let store = store(Some(2));

        put(&store, 1, "a".to_string());
        put(&store, 2, "b".to_string());
        assert_eq!(put(&store, 3, "c".to_string()), Upsert::Inserted);

        assert_eq!(store.len(), 2);
        assert!(store.view(id(1), |_| ()).is_none());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_rewrite_refreshes_recency() {
        let store = store(Some(2));

        put(&store, 1, "a".to_string());
        put(&store, 2, "b".to_string());
        store.upsert(id(1), |item| item.push('!'), || unreachable!());
        put(&store, 3, "c".to_string());

        assert!(store.view(id(1), |_| ()).is_some());
        assert!(store.view(id(2), |_| ()).is_none());
    }

    #[test]
    fn test_stats_hits_and_misses() {
        let store = store(None);
        put(&store, 1, "a".to_string());

        store.view(id(1), |_| ());
        store.view(id(2), |_| ());

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_purge_expired() {
        let store: EntityStore<u8> =
            EntityStore::new("tests", Algorithm::Ttl, None, Some(Duration::from_millis(50)));
        put(&store, 1, 1);

        thread::sleep(Duration::from_millis(80));
        put(&store, 2, 2);

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_concurrent_writers_serialize_per_key() {
        let store = Arc::new(EntityStore::<u64>::new("tests", Algorithm::Lru, None, None));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.upsert(id(1), |count| *count += 1, || 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.view(id(1), |count| *count), Some(800));
    }
}
