//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Number of posts on one feed page
    pub page_size: usize,
    /// Lifetime in seconds of a cached index page
    pub index_cache_ttl: u64,
    /// Maximum number of rendered pages held by the page cache
    pub cache_max_entries: usize,
    /// Session lifetime in seconds
    pub session_ttl: u64,
    /// Upper bound on a request body carrying an uploaded image
    pub max_upload_bytes: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PAGE_SIZE` - Posts per feed page (default: 10)
    /// - `INDEX_CACHE_TTL` - Index page cache lifetime in seconds (default: 20)
    /// - `CACHE_MAX_ENTRIES` - Cached pages kept at once (default: 100)
    /// - `SESSION_TTL` - Session lifetime in seconds (default: two weeks)
    /// - `MAX_UPLOAD_BYTES` - Request body limit for uploads (default: 5 MiB)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            page_size: env_or("PAGE_SIZE", defaults.page_size).max(1),
            index_cache_ttl: env_or("INDEX_CACHE_TTL", defaults.index_cache_ttl),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries).max(1),
            session_ttl: env_or("SESSION_TTL", defaults.session_ttl),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            page_size: 10,
            index_cache_ttl: 20,
            cache_max_entries: 100,
            session_ttl: 14 * 24 * 60 * 60,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}
