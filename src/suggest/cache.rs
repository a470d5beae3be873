//! Suggestion cache with LRU eviction and lazy TTL expiry
//!
//! Entries are evicted least-recently-used first once the cache is full, and an
//! entry older than the TTL is treated as absent the next time it is read. There
//! is no background sweep: expired entries that are never read again simply age
//! out through capacity eviction.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Option<Duration>, now: Instant) -> bool {
        ttl.is_some_and(|ttl| now.saturating_duration_since(self.inserted_at) > ttl)
    }
}

/// Occupancy snapshot, keys ordered least to most recently used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus<K> {
    pub size: usize,
    pub keys: Vec<K>,
}

/// Bounded key-value store with LRU eviction and optional TTL.
///
/// Values are handed out as clones; entries are never aliased outside the cache.
/// The `*_at` variants take the current time explicitly so expiry can be tested
/// without sleeping.
#[derive(Debug)]
pub struct TtlLruCache<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    ttl: Option<Duration>,
}

impl<K: Hash + Eq, V: Clone> TtlLruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries (a capacity of 0 is
    /// treated as 1). With `ttl` of `None` entries never expire.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Returns a fresh value and marks it most recently used.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    pub fn get_at<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.entries.peek(key)?.is_expired(self.ttl, now) {
            self.entries.pop(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts or replaces `key` as the most recently used entry.
    ///
    /// Replacing an existing key resets both its recency and its age. Inserting a
    /// new key into a full cache evicts the least recently used entry.
    pub fn set(&mut self, key: K, value: V) {
        self.set_at(key, value, Instant::now());
    }

    pub fn set_at(&mut self, key: K, value: V, now: Instant) {
        let entry = CacheEntry {
            value,
            inserted_at: now,
        };
        self.entries.push(key, entry);
    }

    /// Existence check that does not touch recency.
    ///
    /// `max_age` can only tighten freshness: an entry expired under the cache TTL
    /// is removed, while an entry that merely exceeds `max_age` is reported absent
    /// but left in place.
    pub fn has<Q>(&mut self, key: &Q, max_age: Option<Duration>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.has_at(key, max_age, Instant::now())
    }

    pub fn has_at<Q>(&mut self, key: &Q, max_age: Option<Duration>, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some((expired, too_old)) = self
            .entries
            .peek(key)
            .map(|entry| (entry.is_expired(self.ttl, now), entry.is_expired(max_age, now)))
        else {
            return false;
        };
        if expired {
            self.entries.pop(key);
            return false;
        }
        !too_old
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current size and keys, least recently used first.
    pub fn status(&self) -> CacheStatus<K>
    where
        K: Clone,
    {
        CacheStatus {
            size: self.entries.len(),
            keys: self.entries.iter().rev().map(|(key, _)| key.clone()).collect(),
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;
