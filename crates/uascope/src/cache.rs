//! Bounded parse cache.
//!
//! A strict-LRU map from raw input to frozen record, shared by all threads
//! using one analyzer. The lock is held only for LRU bookkeeping, never
//! across a parse computation, so two threads racing on the same missing key
//! may both compute it; the final cached value is one of those identical
//! results and nobody ever observes a partially built record.

use crate::result::AgentRecord;
use crate::stats::AnalyzerStats;
use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

/// A bounded map the parse cache can be backed by.
///
/// Implementations must evict strictly least-recently-used entries, where
/// both `get` and `put` count as a use.
pub trait CacheStore: Send {
    /// Look a key up, marking it most recently used.
    fn get(&mut self, key: &str) -> Option<Arc<AgentRecord>>;
    /// Insert a value, evicting the least recently used entry on overflow.
    fn put(&mut self, key: String, value: Arc<AgentRecord>);
    /// Drop all entries.
    fn clear(&mut self);
    /// Number of cached entries.
    fn len(&self) -> usize;
    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Factory for [`CacheStore`] instances, the `cache_instantiator` builder
/// option. The default factory produces an [`lru::LruCache`].
pub trait CacheInstantiator: Send + Sync {
    /// Create a store bounded to `capacity` entries.
    fn instantiate(&self, capacity: NonZeroUsize) -> Box<dyn CacheStore>;
}

/// Default factory: `lru::LruCache` with an Fx hasher.
pub(crate) struct DefaultCacheInstantiator;

impl CacheInstantiator for DefaultCacheInstantiator {
    fn instantiate(&self, capacity: NonZeroUsize) -> Box<dyn CacheStore> {
        Box::new(LruStore(LruCache::with_hasher(
            capacity,
            BuildHasherDefault::<FxHasher>::default(),
        )))
    }
}

struct LruStore(LruCache<String, Arc<AgentRecord>, BuildHasherDefault<FxHasher>>);

impl CacheStore for LruStore {
    fn get(&mut self, key: &str) -> Option<Arc<AgentRecord>> {
        self.0.get(key).cloned()
    }

    fn put(&mut self, key: String, value: Arc<AgentRecord>) {
        self.0.put(key, value);
    }

    fn clear(&mut self) {
        self.0.clear();
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// The analyzer's parse cache: a store behind a mutex.
pub(crate) struct ParseCache {
    store: Mutex<Box<dyn CacheStore>>,
}

impl ParseCache {
    pub fn new(store: Box<dyn CacheStore>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn CacheStore>> {
        // A poisoned lock only means another thread panicked mid-bookkeeping;
        // the LRU state itself is still consistent.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Serve `key` from the cache, or compute, insert and return it.
    pub fn get_or_compute<F>(&self, key: &str, stats: &AnalyzerStats, compute: F) -> Arc<AgentRecord>
    where
        F: FnOnce() -> Arc<AgentRecord>,
    {
        if let Some(hit) = self.lock().get(key) {
            AnalyzerStats::bump(&stats.cache_hits);
            return hit;
        }
        AnalyzerStats::bump(&stats.cache_misses);

        // Not held across the computation: racing duplicates are fine.
        let record = compute();
        self.lock().put(key.to_string(), record.clone());
        record
    }

    /// Atomically drop all entries. Outstanding records stay valid.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::FieldMap;
    use uascope_fields::Field;

    fn record(raw: &str) -> Arc<AgentRecord> {
        Arc::new(AgentRecord::freeze(
            raw.to_string(),
            &FieldMap::default(),
            &Field::ALL,
        ))
    }

    fn cache(capacity: usize) -> ParseCache {
        ParseCache::new(
            DefaultCacheInstantiator.instantiate(NonZeroUsize::new(capacity).unwrap()),
        )
    }

    #[test]
    fn test_get_or_compute_computes_once_per_key() {
        let cache = cache(4);
        let stats = AnalyzerStats::default();
        let mut computes = 0;

        for _ in 0..3 {
            cache.get_or_compute("a", &stats, || {
                computes += 1;
                record("a")
            });
        }
        assert_eq!(computes, 1);
        assert_eq!(stats.snapshot().cache_hits, 2);
        assert_eq!(stats.snapshot().cache_misses, 1);
    }

    #[test]
    fn test_strict_lru_eviction() {
        let cache = cache(2);
        let stats = AnalyzerStats::default();

        cache.get_or_compute("a", &stats, || record("a"));
        cache.get_or_compute("b", &stats, || record("b"));
        // Touch "a" so "b" becomes least recently used.
        cache.get_or_compute("a", &stats, || unreachable!());
        cache.get_or_compute("c", &stats, || record("c"));

        assert_eq!(cache.len(), 2);
        // "a" survived the whole time.
        cache.get_or_compute("a", &stats, || unreachable!());
        let mut recomputed = false;
        cache.get_or_compute("b", &stats, || {
            recomputed = true;
            record("b")
        });
        assert!(recomputed, "b should have been the evicted entry");
    }

    #[test]
    fn test_clear_keeps_outstanding_records_valid() {
        let cache = cache(2);
        let stats = AnalyzerStats::default();
        let held = cache.get_or_compute("a", &stats, || record("a"));
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(held.user_agent(), "a");
    }
}
