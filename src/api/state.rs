//! Application state shared across all handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::SessionStore;
use crate::cache::PageCache;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::feed::FeedBuilder;
use crate::store::models::UserId;
use crate::store::BlogStore;

/// Every piece of shared state sits behind its own lock; handlers never hold
/// two of them at once.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<BlogStore>>,
    pub sessions: Arc<RwLock<SessionStore>>,
    pub page_cache: Arc<RwLock<PageCache>>,
    pub feed: FeedBuilder,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState whose components all read time from `clock`.
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let store = BlogStore::new(clock.clone());
        let sessions = SessionStore::new(clock.clone(), config.session_ttl);
        let page_cache = PageCache::new(
            clock.clone(),
            config.cache_max_entries,
            config.index_cache_ttl,
        );

        Self {
            store: Arc::new(RwLock::new(store)),
            sessions: Arc::new(RwLock::new(sessions)),
            page_cache: Arc::new(RwLock::new(page_cache)),
            feed: FeedBuilder::new(config.page_size),
            clock,
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration, on the wall clock.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.clone(), Arc::new(SystemClock))
    }

    /// Opens a session for `user_id`, returning the cookie value.
    pub async fn open_session(&self, user_id: UserId) -> String {
        self.sessions.write().await.create(user_id)
    }
}
