//! Feed Module
//!
//! Paginated post listings for the index, group, profile and follow views.

mod builder;
mod paginator;


pub use builder::{newest_first, FeedBuilder, FeedFilter};
pub use paginator::{Page, Paginator};
