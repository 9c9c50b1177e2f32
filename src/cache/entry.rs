//! Cache Entry Module
//!
//! A rendered page body together with the instant it stops being served.

// == Cache Entry ==
/// Represents a single cached page.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Rendered response body
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl_seconds` after `now_ms`.
    pub fn new(value: String, now_ms: i64, ttl_seconds: u64) -> Self {
        let ttl_ms = i64::try_from(ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now_ms` reaches its expiration time.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now_ms: i64) -> i64 {
        (self.expires_at - now_ms).max(0)
    }
}
