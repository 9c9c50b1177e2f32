//! Page Cache Module
//!
//! Rendered page bodies keyed by URL-derived strings, expiring on a fixed
//! timer. Writes to the blog never touch this cache; an entry is only dropped
//! when its TTL elapses, when room is needed, or on [`PageCache::clear`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};
use crate::clock::Clock;

// == Page Cache ==
#[derive(Debug)]
pub struct PageCache {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    clock: Arc<dyn Clock>,
    /// Maximum number of pages held at once
    max_entries: usize,
    /// TTL in seconds for pages stored without an explicit one
    default_ttl: u64,
}

impl PageCache {
    pub fn new(clock: Arc<dyn Clock>, max_entries: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    // == Get ==
    /// Returns the cached body for `key` if it is still live.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                debug!(key, ttl_ms = entry.ttl_remaining_ms(now), "page cache hit");
                self.stats.record_lookup(true);
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expirations(1);
                self.stats.record_lookup(false);
                debug!(key, "page cache entry expired");
                None
            }
            None => {
                self.stats.record_lookup(false);
                None
            }
        }
    }

    // == Set ==
    /// Stores a rendered body, replacing any previous one for the same key.
    ///
    /// When full, expired entries are purged first; if that frees nothing, the
    /// entry closest to expiry is evicted.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) {
        let now = self.clock.now_ms();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.purge_expired_at(now);
            if self.entries.len() >= self.max_entries {
                self.evict_soonest_expiring();
            }
        }

        let entry = CacheEntry::new(value, now, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key, entry);
    }

    // == Delete ==
    /// Drops one entry; returns whether it existed.
    #[cfg(test)]
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    #[cfg(test)]
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.purge_expired_at(now)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            ..self.stats.clone()
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired_at(&mut self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - self.entries.len();
        self.stats.record_expirations(purged);
        purged
    }

    fn evict_soonest_expiring(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.expires_at, entry.created_at))
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(key, "page cache entry evicted");
        }
    }
}
