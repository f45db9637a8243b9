//! Caller-owned result cache.
//!
//! The engine itself keeps no state between calls; callers that want to
//! reuse a diagnosis for the same campaign inject one of these. The clock is
//! injected too, so expiry is testable and nothing here is process-global.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, SystemTime};

/// Time source for cache expiry.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

struct CacheEntry<V> {
    value: V,
    stored_at: SystemTime,
}

/// A keyed store with TTL invalidation.
pub struct ResultCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl<K: Eq + Hash, V: Clone> ResultCache<K, V> {
    pub fn new(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        ResultCache {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn with_system_clock(ttl: Duration) -> Self {
        Self::new(ttl, Box::new(SystemClock))
    }

    /// Fetch a live entry; expired entries read as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if self.is_live(entry) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        let stored_at = self.clock.now();
        self.entries.insert(key, CacheEntry { value, stored_at });
    }

    pub fn invalidate(&mut self, key: &K) {
        self.entries.remove(key);
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        let now = self.clock.now();
        self.entries.retain(|_, entry| {
            now.duration_since(entry.stored_at)
                .map(|age| age <= ttl)
                .unwrap_or(true)
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("purged {removed} expired cache entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_live(&self, entry: &CacheEntry<V>) -> bool {
        self.clock
            .now()
            .duration_since(entry.stored_at)
            // clock went backwards: keep the entry
            .map(|age| age <= self.ttl)
            .unwrap_or(true)
    }
}
