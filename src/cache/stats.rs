//! Cache Statistics Module
//!
//! Counters reported by the page cache on `/health`.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Index requests answered from a live entry
    pub hits: u64,
    /// Index requests that rendered the page again
    pub misses: u64,
    /// Live entries dropped to make room
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Pages held right now
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of lookups served from cache; 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub(crate) fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_before_any_lookup() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_lookups() {
        let mut stats = CacheStats::new();
        for hit in [true, true, true, false] {
            stats.record_lookup(hit);
        }
        assert_eq!((stats.hits, stats.misses), (3, 1));
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_expirations_accumulate() {
        let mut stats = CacheStats::new();
        stats.record_expirations(2);
        stats.record_expirations(0);
        stats.record_expirations(1);
        assert_eq!(stats.expirations, 3);
        assert_eq!(stats.evictions, 0);
    }
}
