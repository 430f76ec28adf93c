//! Recency Cache
//!
//! An explicit bounded recency structure: a hash map of entries plus an
//! ordered map of recency stamps. Touching an entry moves it to
//! most-recently-used; when an insertion would exceed capacity, the least
//! recently used entry is evicted first.

use std::collections::{BTreeMap, HashMap};

/// One cached value with its recency stamp
#[derive(Debug)]
struct CacheEntry {
    value: Vec<u8>,
    stamp: u64,
}

/// Bounded key → value cache with strict least-recently-used eviction
#[derive(Debug)]
pub struct RecencyCache {
    /// Hard capacity; the entry count never exceeds it
    capacity: usize,

    /// Key → cached value + stamp
    entries: HashMap<String, CacheEntry>,

    /// Stamp → key, oldest stamp first; drives eviction order
    recency: BTreeMap<u64, String>,

    /// Monotonic stamp source
    clock: u64,
}

impl RecencyCache {
    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            clock: 0,
        }
    }

    /// Look up `key`, marking it most-recently-used on a hit
    pub fn get(&mut self, key: &str) -> Option<&[u8]> {
        if !self.entries.contains_key(key) {
            return None;
        }

        self.touch(key);
        self.entries.get(key).map(|entry| entry.value.as_slice())
    }

    /// Insert or update `key`, marking it most-recently-used.
    ///
    /// Evicts the least recently used entry first when a new key would
    /// exceed capacity.
    pub fn insert(&mut self, key: &str, value: Vec<u8>) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.value = value;
            self.touch(key);
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.clock += 1;
        self.recency.insert(self.clock, key.to_string());
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stamp: self.clock,
            },
        );
    }

    /// Drop `key` from the cache, if present
    pub fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.recency.remove(&entry.stamp);
        }
    }

    /// Re-stamp `key` as most-recently-used
    fn touch(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            self.recency.remove(&entry.stamp);
            self.clock += 1;
            entry.stamp = self.clock;
            self.recency.insert(self.clock, key.to_string());
        }
    }

    /// Evict the least recently used entry
    fn evict_lru(&mut self) {
        if let Some((_, key)) = self.recency.pop_first() {
            self.entries.remove(&key);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cache's capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `key` is currently cached (does not touch recency)
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
