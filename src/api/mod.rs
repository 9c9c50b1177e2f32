//! API Module
//!
//! HTTP handlers and routing for the blog.
//!
//! Listing pages and forms are JSON documents; every successful write ends
//! in a 303 redirect.

pub mod accounts;
pub mod feeds;
pub mod follows;
pub mod posts;
pub mod routes;
pub mod service;
mod state;

pub use routes::create_router;
pub use state::AppState;
