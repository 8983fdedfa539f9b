//! LRU Cache Module
//!
//! Fixed-capacity cache with Least-Recently-Used eviction. A hash map gives
//! O(1) lookup by key and a doubly-linked recency list gives O(1) promotion
//! and eviction; together they form the standard LRU construction.
//!
//! The list is index-linked rather than pointer-linked: nodes live in a
//! `Vec` arena and `prev`/`next` are slot indices, with two reserved
//! sentinel slots bounding the list. Freed slots are recycled through a
//! free list. This keeps all list surgery O(1) without any aliasing.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::cache::{CacheStats, EvictionCallback, StatsSnapshot};
use crate::error::{CacheError, Result};

// Reserved arena slots for the list sentinels.
const HEAD: usize = 0;
const TAIL: usize = 1;

// == List Node ==
/// An arena slot. Sentinels and freed slots carry no entry.
#[derive(Debug)]
struct Node<T> {
    prev: usize,
    next: usize,
    entry: Option<(String, T)>,
}

// == Node List ==
/// Recency-ordered doubly-linked list over a slot arena.
///
/// Order from `HEAD` to `TAIL` is most-recently-used to least-recently-used.
/// Non-sentinel nodes are never null-adjacent: every live node sits between
/// two valid slots.
#[derive(Debug)]
struct NodeList<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
}

impl<T> NodeList<T> {
    fn new() -> Self {
        Self {
            nodes: vec![
                // HEAD
                Node { prev: HEAD, next: TAIL, entry: None },
                // TAIL
                Node { prev: HEAD, next: TAIL, entry: None },
            ],
            free: Vec::new(),
        }
    }

    fn link_after_head(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Inserts a new node at the most-recently-used position, reusing a
    /// freed slot when one is available.
    fn push_front(&mut self, key: String, value: T) -> usize {
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].entry = Some((key, value));
                idx
            }
            None => {
                self.nodes.push(Node {
                    prev: HEAD,
                    next: TAIL,
                    entry: Some((key, value)),
                });
                self.nodes.len() - 1
            }
        };
        self.link_after_head(idx);
        idx
    }

    /// Moves a node to the most-recently-used position. A node already at
    /// the front needs no structural change, and relinking it anyway would
    /// corrupt the sentinel links, so that case is detected by index and
    /// skipped.
    fn move_to_front(&mut self, idx: usize) {
        if self.nodes[HEAD].next == idx {
            return;
        }
        self.unlink(idx);
        self.link_after_head(idx);
    }

    /// Unlinks a node, recycles its slot, and returns its entry.
    fn remove(&mut self, idx: usize) -> Option<(String, T)> {
        self.unlink(idx);
        self.free.push(idx);
        self.nodes[idx].entry.take()
    }

    /// Index of the least-recently-used node, if any.
    fn back(&self) -> Option<usize> {
        let idx = self.nodes[TAIL].prev;
        (idx != HEAD).then_some(idx)
    }

    fn value(&self, idx: usize) -> Option<&T> {
        self.nodes[idx].entry.as_ref().map(|(_, value)| value)
    }

    fn set_value(&mut self, idx: usize, value: T) {
        if let Some(entry) = self.nodes[idx].entry.as_mut() {
            entry.1 = value;
        }
    }

    /// Drops every node and relinks the sentinels to each other.
    fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
        self.free.clear();
    }
}

// == Inner State ==
/// Map and list guarded together by one mutex: every key in the map points
/// at exactly one live node, and every live node's key is in the map.
struct LruInner<T> {
    map: HashMap<String, usize>,
    list: NodeList<T>,
}

// == LRU Cache ==
/// Thread-safe fixed-capacity cache with LRU eviction.
///
/// Every operation takes the exclusive lock, including `get`: reading an
/// entry promotes it to most-recently-used, which is a mutation.
pub struct LruCache<T> {
    inner: Mutex<LruInner<T>>,
    capacity: usize,
    on_evict: Option<EvictionCallback<T>>,
    stats: CacheStats,
}

impl<T: Clone> LruCache<T> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::ZeroCapacity`] for a zero capacity; a cache
    /// that cannot hold anything is a programmer error, rejected here
    /// rather than at first use.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(Self {
            inner: Mutex::new(LruInner {
                map: HashMap::with_capacity(capacity),
                list: NodeList::new(),
            }),
            capacity,
            on_evict: None,
            stats: CacheStats::new(),
        })
    }

    /// Creates a cache whose capacity evictions fire `on_evict` once per
    /// evicted entry. Explicit `delete` and `clear` never fire it.
    pub fn with_eviction(
        capacity: usize,
        on_evict: impl Fn(String, T) + Send + Sync + 'static,
    ) -> Result<Self> {
        let mut cache = Self::new(capacity)?;
        cache.on_evict = Some(Box::new(on_evict));
        Ok(cache)
    }

    // == Get ==
    /// Retrieves a copy of the value for `key` and promotes the entry to
    /// most-recently-used.
    pub fn get(&self, key: &str) -> Option<T> {
        let value = {
            let inner = &mut *self.inner.lock();
            match inner.map.get(key).copied() {
                Some(idx) => {
                    inner.list.move_to_front(idx);
                    inner.list.value(idx).cloned()
                }
                None => None,
            }
        };
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// An existing key is updated in place and promoted. A new key at
    /// capacity first evicts the least-recently-used entry, so the map
    /// never transiently exceeds capacity; the eviction callback runs
    /// after the lock is released.
    pub fn set(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        let evicted = {
            let inner = &mut *self.inner.lock();
            if let Some(&idx) = inner.map.get(&key) {
                inner.list.set_value(idx, value);
                inner.list.move_to_front(idx);
                None
            } else {
                let mut evicted = None;
                if inner.map.len() >= self.capacity {
                    if let Some(oldest) = inner.list.back() {
                        if let Some((old_key, old_value)) = inner.list.remove(oldest) {
                            inner.map.remove(&old_key);
                            evicted = Some((old_key, old_value));
                        }
                    }
                }
                let idx = inner.list.push_front(key.clone(), value);
                inner.map.insert(key, idx);
                evicted
            }
        };

        if let Some((key, value)) = evicted {
            self.stats.record_evictions(1);
            if let Some(on_evict) = &self.on_evict {
                on_evict(key, value);
            }
        }
    }

    // == Delete ==
    /// Removes the entry for `key` if present, returning whether anything
    /// was removed. Explicit removal never fires the eviction callback.
    pub fn delete(&self, key: &str) -> bool {
        let inner = &mut *self.inner.lock();
        match inner.map.remove(key) {
            Some(idx) => {
                inner.list.remove(idx);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry and resets the recency list. Bulk clearing is
    /// not eviction: no callbacks fire.
    pub fn clear(&self) {
        let inner = &mut *self.inner.lock();
        inner.map.clear();
        inner.list.clear();
    }

    // == Count ==
    /// Returns the exact number of stored entries, always ≤ capacity.
    pub fn count(&self) -> usize {
        self.inner.lock().map.len()
    }

    // == Keys ==
    /// Returns all stored keys, in unspecified order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().map.keys().cloned().collect()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns a point-in-time copy of the hit/miss/eviction counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Keys from most- to least-recently-used, by walking the list.
    fn recency_order<T: Clone>(cache: &LruCache<T>) -> Vec<String> {
        let inner = cache.inner.lock();
        let mut keys = Vec::new();
        let mut idx = inner.list.nodes[HEAD].next;
        while idx != TAIL {
            if let Some((key, _)) = &inner.list.nodes[idx].entry {
                keys.push(key.clone());
            }
            idx = inner.list.nodes[idx].next;
        }
        keys
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(LruCache::<i32>::new(0).err(), Some(CacheError::ZeroCapacity));
    }

    #[test]
    fn test_set_and_get() {
        let cache = LruCache::new(3).unwrap();

        cache.set("key1", 1);
        assert_eq!(cache.get("key1"), Some(1));
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_set_overwrites_and_promotes() {
        let cache = LruCache::new(3).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);
        cache.set("key1", 10);

        assert_eq!(cache.get("key1"), Some(10));
        assert_eq!(cache.count(), 2);
        assert_eq!(recency_order(&cache), vec!["key1", "key2"]);
    }

    #[test]
    fn test_capacity_eviction_removes_least_recent() {
        let cache = LruCache::new(3).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);
        cache.set("key3", 3);
        cache.set("key4", 4);

        assert_eq!(cache.count(), 3);
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.get("key2"), Some(2));
        assert_eq!(cache.get("key3"), Some(3));
        assert_eq!(cache.get("key4"), Some(4));
    }

    #[test]
    fn test_get_promotes_entry() {
        let cache = LruCache::new(3).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);
        cache.set("key3", 3);

        // key1 becomes most recent, key2 becomes the eviction candidate
        cache.get("key1");
        cache.set("key4", 4);

        assert_eq!(cache.get("key2"), None);
        assert_eq!(cache.get("key1"), Some(1));
        assert_eq!(cache.get("key3"), Some(3));
        assert_eq!(cache.get("key4"), Some(4));
    }

    #[test]
    fn test_promote_front_entry_is_noop() {
        let cache = LruCache::new(3).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);

        // key2 is already at the front
        cache.get("key2");
        cache.get("key2");

        assert_eq!(recency_order(&cache), vec!["key2", "key1"]);
    }

    #[test]
    fn test_eviction_callback_fires_once_per_eviction() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&evicted);
        let cache =
            LruCache::with_eviction(2, move |key, value: i32| log.lock().push((key, value)))
                .unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);
        cache.set("key3", 3);
        cache.set("key4", 4);

        assert_eq!(
            evicted.lock().as_slice(),
            &[("key1".to_string(), 1), ("key2".to_string(), 2)]
        );
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_delete_does_not_fire_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&evicted);
        let cache =
            LruCache::with_eviction(2, move |key, _: i32| log.lock().push(key)).unwrap();

        cache.set("key1", 1);
        assert!(cache.delete("key1"));
        assert!(!cache.delete("key1"));

        assert!(evicted.lock().is_empty());
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_delete_frees_capacity() {
        let cache = LruCache::new(2).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);
        cache.delete("key1");
        cache.set("key3", 3);

        // No eviction was needed: delete already made room
        assert_eq!(cache.count(), 2);
        assert_eq!(cache.get("key2"), Some(2));
        assert_eq!(cache.get("key3"), Some(3));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_clear_resets_without_callbacks() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&evicted);
        let cache =
            LruCache::with_eviction(3, move |key, _: i32| log.lock().push(key)).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);
        cache.clear();

        assert_eq!(cache.count(), 0);
        assert_eq!(cache.get("key1"), None);
        assert!(evicted.lock().is_empty());

        // The cache is fully usable after clear
        cache.set("key3", 3);
        assert_eq!(cache.get("key3"), Some(3));
        assert_eq!(recency_order(&cache), vec!["key3"]);
    }

    #[test]
    fn test_slot_reuse_after_eviction() {
        let cache = LruCache::new(2).unwrap();

        // Churn well past capacity; the arena should not grow beyond
        // capacity + sentinels
        for i in 0..100 {
            cache.set(format!("key{i}"), i);
        }

        assert_eq!(cache.count(), 2);
        assert!(cache.inner.lock().list.nodes.len() <= 2 + 2);
        assert_eq!(cache.get("key99"), Some(99));
        assert_eq!(cache.get("key98"), Some(98));
    }

    #[test]
    fn test_keys_unordered_contents() {
        let cache = LruCache::new(3).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);

        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec!["key1", "key2"]);
    }

    #[test]
    fn test_capacity_one() {
        let cache = LruCache::new(1).unwrap();

        cache.set("key1", 1);
        cache.set("key2", 2);

        assert_eq!(cache.count(), 1);
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.get("key2"), Some(2));
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = LruCache::new(2).unwrap();

        cache.set("key1", 1);
        cache.get("key1");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_concurrent_access_holds_capacity_bound() {
        let cache = Arc::new(LruCache::new(8).unwrap());

        let mut handles = Vec::new();
        for worker in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("k{}", (worker * 7 + i) % 20);
                    cache.set(key.clone(), i);
                    cache.get(&key);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.count() <= 8);
        // Map and list agree on membership
        assert_eq!(recency_order(&cache).len(), cache.count());
    }
}
