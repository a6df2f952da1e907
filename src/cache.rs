//! A bounded LRU cache used by the lookup engine.
//!
//! Backed by a [`LinkedHashMap`] guarded by a [`parking_lot::Mutex`]:
//! reads refresh an entry's recency, inserts evict from the front once the
//! capacity is exceeded. The cache tolerates concurrent access from any
//! number of tasks; correctness only requires that the caller's key
//! changes whenever the cached computation's inputs change (the router
//! keys by tree identity for exactly this reason).

use std::hash::Hash;

use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;

/// A thread-safe, bounded least-recently-used cache.
pub struct LruCache<K: Eq + Hash, V> {
    capacity: usize,
    entries: Mutex<LinkedHashMap<K, V, ahash::RandomState>>,
}

impl<K: Eq + Hash, V: Clone> LruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        LruCache {
            capacity,
            entries: Mutex::new(LinkedHashMap::with_hasher(ahash::RandomState::new())),
        }
    }

    /// Returns a clone of the cached value and marks it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().get_refresh(key).map(|value| value.clone())
    }

    /// Inserts a value, evicting the least recently used entry if the
    /// cache is full.
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        entries.insert(key, value);
        if entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// The number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let cache: LruCache<&str, u32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn get_refreshes_recency() {
        let cache: LruCache<&str, u32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        // touching "a" makes "b" the eviction candidate
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);

        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn reinsert_overwrites() {
        let cache: LruCache<&str, u32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("a", 9);
        assert_eq!(cache.get(&"a"), Some(9));
        assert_eq!(cache.len(), 1);
    }
}
