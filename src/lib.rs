//! Yatube - a small blogging service
//!
//! Posts, groups, comments and author subscriptions over HTTP, with a
//! time-limited cache in front of the index page.

pub mod api;
pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod follow;
pub mod models;
pub mod store;

pub use api::{create_router, AppState};
pub use config::Config;
