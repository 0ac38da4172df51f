// Keyed entry storage for memoized upstream responses
// Author: kelexine (https://github.com/kelexine)

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// One memoized response. Never mutated after insertion.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: Instant,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: Instant, ttl: Duration) -> Self {
        Self {
            data,
            timestamp,
            ttl,
        }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.timestamp)
    }

    /// An entry is stale once its age strictly exceeds its TTL.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.age(now) > self.ttl
    }
}

/// Opaque string key -> at most one entry. Not synchronized on its own.
#[derive(Debug)]
pub struct EntryStore<T> {
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> EntryStore<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    /// Insert or fully replace the entry for `key`, returning the old one.
    pub fn insert(&mut self, key: String, entry: CacheEntry<T>) -> Option<CacheEntry<T>> {
        self.entries.insert(key, entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<T>> {
        self.entries.remove(key)
    }

    /// Drop every entry that is stale at `now`; returns how many went.
    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for EntryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_expiry_boundary() {
        let start = Instant::now();
        let entry = CacheEntry::new("x", start, Duration::from_secs(120));

        assert!(!entry.is_expired(start));
        assert!(!entry.is_expired(start + Duration::from_secs(120)));
        assert!(entry.is_expired(start + Duration::from_secs(121)));
    }

    #[test]
    fn test_insert_replaces() {
        let now = Instant::now();
        let mut store = EntryStore::new();
        store.insert("k".to_string(), CacheEntry::new(1, now, Duration::from_secs(60)));
        let old = store.insert("k".to_string(), CacheEntry::new(2, now, Duration::from_secs(5)));

        assert_eq!(old.map(|e| e.data), Some(1));
        assert_eq!(store.len(), 1);
        let current = store.get("k").unwrap();
        assert_eq!(current.data, 2);
        assert_eq!(current.ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_remove_expired_only_touches_stale() {
        let now = Instant::now();
        let mut store = EntryStore::new();
        store.insert("short".to_string(), CacheEntry::new(1, now, Duration::from_secs(10)));
        store.insert("long".to_string(), CacheEntry::new(2, now, Duration::from_secs(600)));

        let removed = store.remove_expired(now + Duration::from_secs(60));
        assert_eq!(removed, 1);
        assert!(store.get("short").is_none());
        assert!(store.get("long").is_some());
    }
}
