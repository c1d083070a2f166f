//! A generic, size-bounded, time-expiring result cache.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// One cached value plus the bookkeeping needed for expiry and
/// oldest-first eviction.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    seq: u64,
}

/// Size-bounded, TTL-expiring memoization store.
///
/// Entries older than the configured TTL are treated as absent on read
/// and dropped wholesale by [`sweep`]. When an insert would exceed the
/// configured maximum, the single oldest-by-insertion entry is evicted
/// first, so the cache never holds more than `max_entries` values.
///
/// Reads return a clone of the stored value, so a caller mutating the
/// returned collection cannot corrupt the cached entry.
///
/// [`sweep`]: ResultCache::sweep
#[derive(Debug)]
pub struct ResultCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
    max_entries: usize,
    next_seq: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> ResultCache<K, V> {
    /// Create a cache with the given TTL and entry bound.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries,
            next_seq: 0,
        }
    }

    /// Look up `key`. Expired entries are dropped and reported absent.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() > self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| e.value.clone())
    }

    /// Insert `value` under `key`, evicting the oldest entry if the
    /// bound would otherwise be exceeded.
    pub fn put(&mut self, key: K, value: V) {
        if self.max_entries == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                seq,
            },
        );
    }

    /// Drop every entry older than the TTL.
    pub fn sweep(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.inserted_at.elapsed() <= ttl);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live entries (including any not yet swept).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.seq)
            .map(|(k, _)| k.clone());
        if let Some(k) = oldest {
            self.entries.remove(&k);
        }
    }
}
