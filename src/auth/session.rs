//! Session Store
//!
//! Maps opaque cookie tokens to user ids for a fixed lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::store::models::UserId;

#[derive(Debug, Clone)]
struct Session {
    user_id: UserId,
    expires_at: i64,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    clock: Arc<dyn Clock>,
    /// Session lifetime in seconds
    ttl: u64,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            clock,
            ttl,
        }
    }

    /// Opens a session for `user_id` and returns its token.
    pub fn create(&mut self, user_id: UserId) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let ttl_ms = i64::try_from(self.ttl.saturating_mul(1000)).unwrap_or(i64::MAX);
        let expires_at = self.clock.now_ms().saturating_add(ttl_ms);
        self.sessions.insert(token.clone(), Session { user_id, expires_at });
        debug!(user_id, "session created");
        token
    }

    /// The user behind `token`, if the session exists and is still live.
    /// Expired sessions are dropped on sight.
    pub fn resolve(&mut self, token: &str) -> Option<UserId> {
        let now = self.clock.now_ms();
        let Session { user_id, expires_at } = self.sessions.get(token)?.clone();
        if now >= expires_at {
            self.sessions.remove(token);
            debug!(user_id, "session expired");
            return None;
        }
        Some(user_id)
    }

    /// Ends a session; returns whether it existed.
    pub fn destroy(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_create_and_resolve() {
        let mut sessions = SessionStore::new(Arc::new(ManualClock::default()), 60);
        let token = sessions.create(7);

        assert_eq!(sessions.resolve(&token), Some(7));
        assert_eq!(sessions.resolve("unknown"), None);
    }

    #[test]
    fn test_tokens_are_distinct() {
        let mut sessions = SessionStore::new(Arc::new(ManualClock::default()), 60);
        assert_ne!(sessions.create(1), sessions.create(1));
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_session_expires() {
        let clock = Arc::new(ManualClock::default());
        let mut sessions = SessionStore::new(clock.clone(), 60);
        let token = sessions.create(7);

        clock.advance_secs(59);
        assert_eq!(sessions.resolve(&token), Some(7));

        clock.advance_secs(1);
        assert_eq!(sessions.resolve(&token), None);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_destroy() {
        let mut sessions = SessionStore::new(Arc::new(ManualClock::default()), 60);
        let token = sessions.create(7);

        assert!(sessions.destroy(&token));
        assert!(!sessions.destroy(&token));
        assert_eq!(sessions.resolve(&token), None);
    }
}
