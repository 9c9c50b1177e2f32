//! Cache Module
//!
//! Time-expiring cache for rendered pages.

mod entry;
mod page_cache;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use page_cache::PageCache;
pub use stats::CacheStats;

/// Key of the cached main listing for the requested page.
///
/// The raw `page` query value is used as written so every distinct index URL
/// gets its own slot; absence means page 1.
pub fn index_cache_key(page: Option<&str>) -> String {
    format!("index_page:{}", page.map(str::trim).unwrap_or("1"))
}
