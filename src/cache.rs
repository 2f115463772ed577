// Time-boxed memoization for aggregation results

use crate::data::RestaurantTable;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::time::{Duration, Instant};

/// Cache key: operation, table identity, row count, then call parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(operation: &str, table: &RestaurantTable) -> Self {
        Self(format!("{}:{}:{}", operation, table.id(), table.len()))
    }

    pub fn param(mut self, name: &str, value: impl Display) -> Self {
        self.0.push_str(&format!(":{}={}", name, value));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) <= self.ttl
    }
}

/// Unbounded TTL cache. Entries leave only when read after expiry or when
/// overwritten. Not synchronized; share it behind a mutex.
#[derive(Debug)]
pub struct ResultCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> Default for ResultCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> ResultCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as of `now`. A stale entry is evicted and reported as a miss.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<V> {
        let fresh = self.entries.get(key)?.is_fresh(now);
        if fresh {
            self.entries.get(key).map(|entry| entry.value.clone())
        } else {
            self.entries.remove(key);
            None
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    pub fn set_at(&mut self, key: impl Into<String>, value: V, ttl: Duration, now: Instant) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
