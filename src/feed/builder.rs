//! Feed Builder Module
//!
//! Selects the posts a feed shows, orders them newest first and cuts out the
//! requested page.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::feed::{Page, Paginator};
use crate::store::models::{GroupId, UserId};
use crate::store::{BlogStore, Post};

/// Which posts a feed is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFilter {
    All,
    Group(GroupId),
    Author(UserId),
    /// Posts by every author this user follows
    FollowedBy(UserId),
}

/// Newest first; equal timestamps fall back to primary key ascending.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.pub_date.cmp(&a.pub_date).then(a.id.cmp(&b.id))
}

// == Feed Builder ==
#[derive(Debug, Clone, Copy)]
pub struct FeedBuilder {
    paginator: Paginator,
}

impl FeedBuilder {
    pub fn new(page_size: usize) -> Self {
        Self {
            paginator: Paginator::new(page_size),
        }
    }

    /// Every post matching `filter`, in feed order.
    pub fn posts<'a>(&self, store: &'a BlogStore, filter: FeedFilter) -> Vec<&'a Post> {
        let mut posts: Vec<&Post> = match filter {
            FeedFilter::All => store.posts().collect(),
            FeedFilter::Group(group_id) => store.posts_in_group(group_id).collect(),
            FeedFilter::Author(author_id) => store.posts_by_author(author_id).collect(),
            FeedFilter::FollowedBy(user_id) => {
                let authors: HashSet<UserId> = store.followed_authors(user_id);
                store
                    .posts()
                    .filter(|p| authors.contains(&p.author_id))
                    .collect()
            }
        };
        posts.sort_by(|a, b| newest_first(a, b));
        posts
    }

    /// One page of the feed; `page` is the raw `?page=` value.
    pub fn build<'a>(
        &self,
        store: &'a BlogStore,
        filter: FeedFilter,
        page: Option<&str>,
    ) -> Page<&'a Post> {
        self.paginator.get_page(self.posts(store, filter), page)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::NewPost;
    use std::sync::Arc;

    fn setup() -> (BlogStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (BlogStore::new(clock.clone()), clock)
    }

    fn post(store: &mut BlogStore, author_id: UserId, group_id: Option<GroupId>, text: &str) -> Post {
        store
            .create_post(NewPost {
                author_id,
                text: text.to_string(),
                group_id,
                image: None,
            })
            .unwrap()
    }

    #[test]
    fn test_newest_first() {
        let (mut store, clock) = setup();
        let user = store.create_user("auth", String::new()).unwrap();
        post(&mut store, user.id, None, "old");
        clock.advance_secs(1);
        post(&mut store, user.id, None, "new");

        let feed = FeedBuilder::new(10).posts(&store, FeedFilter::All);
        let texts: Vec<&str> = feed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "old"]);
    }

    #[test]
    fn test_equal_timestamps_ordered_by_id() {
        let (mut store, _) = setup();
        let user = store.create_user("auth", String::new()).unwrap();
        let first = post(&mut store, user.id, None, "a");
        let second = post(&mut store, user.id, None, "b");

        let feed = FeedBuilder::new(10).posts(&store, FeedFilter::All);
        assert_eq!(feed[0].id, first.id);
        assert_eq!(feed[1].id, second.id);
    }

    #[test]
    fn test_group_and_author_filters() {
        let (mut store, _) = setup();
        let alice = store.create_user("alice", String::new()).unwrap();
        let bob = store.create_user("bob", String::new()).unwrap();
        let cats = store.create_group("Cats", "cats", "").unwrap();
        post(&mut store, alice.id, Some(cats.id), "alice cats");
        post(&mut store, alice.id, None, "alice plain");
        post(&mut store, bob.id, Some(cats.id), "bob cats");

        let builder = FeedBuilder::new(10);
        assert_eq!(builder.posts(&store, FeedFilter::Group(cats.id)).len(), 2);
        assert_eq!(builder.posts(&store, FeedFilter::Author(alice.id)).len(), 2);
        assert_eq!(builder.posts(&store, FeedFilter::Author(bob.id)).len(), 1);
    }

    #[test]
    fn test_follow_filter_tracks_edges() {
        let (mut store, _) = setup();
        let user = store.create_user("user", String::new()).unwrap();
        let author = store.create_user("author", String::new()).unwrap();
        let stranger = store.create_user("stranger", String::new()).unwrap();
        post(&mut store, author.id, None, "followed");
        post(&mut store, stranger.id, None, "not followed");

        let builder = FeedBuilder::new(10);
        assert!(builder.posts(&store, FeedFilter::FollowedBy(user.id)).is_empty());

        store.insert_follow(user.id, author.id).unwrap();
        let feed = builder.posts(&store, FeedFilter::FollowedBy(user.id));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].text, "followed");
    }

    #[test]
    fn test_build_pages() {
        let (mut store, clock) = setup();
        let user = store.create_user("auth", String::new()).unwrap();
        for i in 0..13 {
            post(&mut store, user.id, None, &format!("post {}", i));
            clock.advance_secs(1);
        }

        let builder = FeedBuilder::new(10);
        let first = builder.build(&store, FeedFilter::All, None);
        let second = builder.build(&store, FeedFilter::All, Some("2"));

        assert_eq!(first.len(), 10);
        assert_eq!(first.items[0].text, "post 12");
        assert_eq!(second.len(), 3);
        assert_eq!(second.items[2].text, "post 0");
        assert_eq!(second.count, 13);
    }
}
