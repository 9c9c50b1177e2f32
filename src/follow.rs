//! Follow Manager
//!
//! Creates and removes follow edges. Both operations are idempotent: repeating
//! them, or following yourself, changes nothing and is not an error.

use tracing::{debug, info};

use crate::error::Result;
use crate::store::models::UserId;
use crate::store::{BlogStore, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Created,
    AlreadyFollowing,
    SelfFollow,
}

/// Makes `requester` follow `target_username`. Unknown targets are `NotFound`.
pub fn follow(store: &mut BlogStore, requester: &User, target_username: &str) -> Result<FollowOutcome> {
    let target_id = store.require_user(target_username)?.id;

    if requester.username == target_username {
        debug!(user = %requester.username, "ignoring self-follow");
        return Ok(FollowOutcome::SelfFollow);
    }
    if store.follow_exists(requester.id, target_id) {
        return Ok(FollowOutcome::AlreadyFollowing);
    }

    store.insert_follow(requester.id, target_id)?;
    info!(user = %requester.username, author = target_username, "follow created");
    Ok(FollowOutcome::Created)
}

/// Drops any edge from `requester` to `target_username`; returns whether one existed.
pub fn unfollow(store: &mut BlogStore, requester: &User, target_username: &str) -> bool {
    let Some(target_id) = store.user_by_username(target_username).map(|u| u.id) else {
        return false;
    };

    let removed = store.remove_follow(requester.id, target_id) > 0;
    if removed {
        info!(user = %requester.username, author = target_username, "follow removed");
    }
    removed
}

pub fn is_following(store: &BlogStore, user_id: UserId, target_username: &str) -> bool {
    store
        .user_by_username(target_username)
        .is_some_and(|target| store.follow_exists(user_id, target.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::BlogError;
    use std::sync::Arc;

    fn setup() -> (BlogStore, User, User) {
        let mut store = BlogStore::new(Arc::new(ManualClock::default()));
        let user = store.create_user("user", String::new()).unwrap();
        let author = store.create_user("author", String::new()).unwrap();
        (store, user, author)
    }

    #[test]
    fn test_follow_then_unfollow() {
        let (mut store, user, _) = setup();

        assert_eq!(follow(&mut store, &user, "author").unwrap(), FollowOutcome::Created);
        assert!(is_following(&store, user.id, "author"));

        assert!(unfollow(&mut store, &user, "author"));
        assert!(!is_following(&store, user.id, "author"));
    }

    #[test]
    fn test_follow_twice_leaves_one_edge() {
        let (mut store, user, _) = setup();

        follow(&mut store, &user, "author").unwrap();
        let second = follow(&mut store, &user, "author").unwrap();

        assert_eq!(second, FollowOutcome::AlreadyFollowing);
        assert_eq!(store.follow_count(user.id), 1);
    }

    #[test]
    fn test_self_follow_is_ignored() {
        let (mut store, user, _) = setup();

        assert_eq!(follow(&mut store, &user, "user").unwrap(), FollowOutcome::SelfFollow);
        assert_eq!(store.follow_count(user.id), 0);
    }

    #[test]
    fn test_follow_unknown_user() {
        let (mut store, user, _) = setup();
        assert!(matches!(
            follow(&mut store, &user, "ghost"),
            Err(BlogError::NotFound(_))
        ));
    }

    #[test]
    fn test_unfollow_without_edge_is_noop() {
        let (mut store, user, _) = setup();
        assert!(!unfollow(&mut store, &user, "author"));
        assert!(!unfollow(&mut store, &user, "ghost"));
    }

    #[test]
    fn test_following_is_directed() {
        let (mut store, user, author) = setup();
        follow(&mut store, &user, "author").unwrap();

        assert!(is_following(&store, user.id, "author"));
        assert!(!is_following(&store, author.id, "user"));
    }
}
