//! Blog Store Module
//!
//! In-process relational storage for users, groups, posts, comments, follows
//! and uploaded images. Tables are ordered maps keyed by their primary key so
//! iteration follows insertion order. Relationships are reached through
//! explicit query methods taking foreign keys.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use slug::slugify;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{BlogError, FormErrors, Result};
use crate::models::requests::UploadedImage;
use crate::store::models::{
    Comment, CommentId, Follow, FollowId, Group, GroupId, NewComment, NewPost, Post, PostChanges,
    PostId, StoredImage, User, UserId,
};

// == Blog Store ==
#[derive(Debug)]
pub struct BlogStore {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, Group>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    follows: BTreeMap<FollowId, Follow>,
    media: HashMap<String, StoredImage>,
    next_id: u64,
    clock: Arc<dyn Clock>,
}

impl BlogStore {
    // == Constructor ==
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: BTreeMap::new(),
            groups: BTreeMap::new(),
            posts: BTreeMap::new(),
            comments: BTreeMap::new(),
            follows: BTreeMap::new(),
            media: HashMap::new(),
            next_id: 1,
            clock,
        }
    }

    /// Ids are unique across all tables and strictly increasing.
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // == Users ==

    /// Inserts a user; the username must not be taken.
    pub fn create_user(&mut self, username: &str, password_hash: String) -> Result<User> {
        if self.user_by_username(username).is_some() {
            return Err(BlogError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let user = User {
            id: self.allocate_id(),
            username: username.to_string(),
            password_hash,
            date_joined: self.clock.now(),
        };
        self.users.insert(user.id, user.clone());
        info!(user_id = user.id, username, "user created");
        Ok(user)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    /// Like [`Self::user_by_username`] but unknown names are a `NotFound`.
    pub fn require_user(&self, username: &str) -> Result<&User> {
        self.user_by_username(username)
            .ok_or_else(|| BlogError::NotFound(format!("user '{}'", username)))
    }

    // == Groups ==

    /// Inserts a group. An empty slug is derived from the title.
    pub fn create_group(&mut self, title: &str, slug: &str, description: &str) -> Result<Group> {
        let slug = if slug.trim().is_empty() {
            slugify(title)
        } else {
            slug.trim().to_string()
        };
        if slug.is_empty() {
            return Err(BlogError::Validation(FormErrors::single(
                "slug",
                "Enter a valid slug.",
            )));
        }
        if self.group_by_slug(&slug).is_some() {
            return Err(BlogError::Conflict(format!("group slug '{}' exists", slug)));
        }

        let group = Group {
            id: self.allocate_id(),
            title: title.to_string(),
            slug,
            description: description.to_string(),
        };
        self.groups.insert(group.id, group.clone());
        info!(group_id = group.id, slug = %group.slug, "group created");
        Ok(group)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn group_by_slug(&self, slug: &str) -> Option<&Group> {
        self.groups.values().find(|g| g.slug == slug)
    }

    pub fn require_group(&self, slug: &str) -> Result<&Group> {
        self.group_by_slug(slug)
            .ok_or_else(|| BlogError::NotFound(format!("group '{}'", slug)))
    }

    /// All groups, ordered by title.
    pub fn groups(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        groups
    }

    // == Posts ==

    pub fn create_post(&mut self, new_post: NewPost) -> Result<Post> {
        if !self.users.contains_key(&new_post.author_id) {
            return Err(BlogError::NotFound(format!("user {}", new_post.author_id)));
        }
        self.check_group(new_post.group_id)?;

        let image = new_post.image.map(|upload| self.store_image(upload));
        let post = Post {
            id: self.allocate_id(),
            text: new_post.text,
            pub_date: self.clock.now(),
            author_id: new_post.author_id,
            group_id: new_post.group_id,
            image,
        };
        self.posts.insert(post.id, post.clone());
        info!(post_id = post.id, author_id = post.author_id, "post created");
        Ok(post)
    }

    /// Applies `changes` to a post. Author and publication date are kept.
    pub fn update_post(&mut self, id: PostId, changes: PostChanges) -> Result<Post> {
        if !self.posts.contains_key(&id) {
            return Err(BlogError::NotFound(format!("post {}", id)));
        }
        self.check_group(changes.group_id)?;

        let new_image = changes.image.map(|upload| self.store_image(upload));
        let post = self
            .posts
            .get_mut(&id)
            .ok_or_else(|| BlogError::NotFound(format!("post {}", id)))?;

        post.text = changes.text;
        post.group_id = changes.group_id;
        let replaced = match new_image {
            Some(name) => post.image.replace(name),
            None => None,
        };
        let updated = post.clone();

        if let Some(old) = replaced {
            self.media.remove(&old);
        }
        info!(post_id = id, "post updated");
        Ok(updated)
    }

    /// Removes a post with its comments and image.
    pub fn delete_post(&mut self, id: PostId) -> Result<Post> {
        let post = self
            .posts
            .remove(&id)
            .ok_or_else(|| BlogError::NotFound(format!("post {}", id)))?;
        self.comments.retain(|_, c| c.post_id != id);
        if let Some(image) = &post.image {
            self.media.remove(image);
        }
        info!(post_id = id, "post deleted");
        Ok(post)
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id)
    }

    pub fn require_post(&self, id: PostId) -> Result<&Post> {
        self.post(id)
            .ok_or_else(|| BlogError::NotFound(format!("post {}", id)))
    }

    /// Every post, in primary key order.
    pub fn posts(&self) -> impl Iterator<Item = &Post> + '_ {
        self.posts.values()
    }

    pub fn posts_by_author(&self, author_id: UserId) -> impl Iterator<Item = &Post> + '_ {
        self.posts.values().filter(move |p| p.author_id == author_id)
    }

    pub fn posts_in_group(&self, group_id: GroupId) -> impl Iterator<Item = &Post> + '_ {
        self.posts
            .values()
            .filter(move |p| p.group_id == Some(group_id))
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn post_count_by_author(&self, author_id: UserId) -> usize {
        self.posts_by_author(author_id).count()
    }

    fn check_group(&self, group_id: Option<GroupId>) -> Result<()> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => {
                Err(BlogError::NotFound(format!("group {}", id)))
            }
            _ => Ok(()),
        }
    }

    // == Media ==

    fn store_image(&mut self, upload: UploadedImage) -> String {
        let name = format!("posts/{}.{}", Uuid::new_v4(), upload.extension);
        debug!(name, size = upload.bytes.len(), "image stored");
        self.media.insert(
            name.clone(),
            StoredImage {
                name: name.clone(),
                content_type: upload.content_type,
                bytes: upload.bytes,
            },
        );
        name
    }

    pub fn media(&self, name: &str) -> Option<&StoredImage> {
        self.media.get(name)
    }

    // == Comments ==

    pub fn add_comment(&mut self, new_comment: NewComment) -> Result<Comment> {
        if !self.posts.contains_key(&new_comment.post_id) {
            return Err(BlogError::NotFound(format!("post {}", new_comment.post_id)));
        }

        let comment = Comment {
            id: self.allocate_id(),
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            text: new_comment.text,
            created: self.clock.now(),
        };
        self.comments.insert(comment.id, comment.clone());
        debug!(comment_id = comment.id, post_id = comment.post_id, "comment added");
        Ok(comment)
    }

    /// Comments on a post, oldest first.
    pub fn comments_for_post(&self, post_id: PostId) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        comments
    }

    // == Follows ==

    pub fn follow_exists(&self, user_id: UserId, author_id: UserId) -> bool {
        self.follows
            .values()
            .any(|f| f.user_id == user_id && f.author_id == author_id)
    }

    /// Inserts a follow edge, enforcing pair uniqueness and no self-follow.
    pub fn insert_follow(&mut self, user_id: UserId, author_id: UserId) -> Result<Follow> {
        if user_id == author_id {
            return Err(BlogError::Conflict("users cannot follow themselves".to_string()));
        }
        if self.follow_exists(user_id, author_id) {
            return Err(BlogError::Conflict(format!(
                "user {} already follows {}",
                user_id, author_id
            )));
        }

        let follow = Follow {
            id: self.allocate_id(),
            user_id,
            author_id,
            created: self.clock.now(),
        };
        self.follows.insert(follow.id, follow.clone());
        Ok(follow)
    }

    /// Deletes the edge if present; returns how many rows went away.
    pub fn remove_follow(&mut self, user_id: UserId, author_id: UserId) -> usize {
        let before = self.follows.len();
        self.follows
            .retain(|_, f| !(f.user_id == user_id && f.author_id == author_id));
        before - self.follows.len()
    }

    /// Authors that `user_id` follows.
    pub fn followed_authors(&self, user_id: UserId) -> HashSet<UserId> {
        self.follows
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.author_id)
            .collect()
    }

    pub fn follow_count(&self, user_id: UserId) -> usize {
        self.follows.values().filter(|f| f.user_id == user_id).count()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn store() -> BlogStore {
        BlogStore::new(Arc::new(ManualClock::default()))
    }

    fn new_post(author_id: UserId, text: &str) -> NewPost {
        NewPost {
            author_id,
            text: text.to_string(),
            group_id: None,
            image: None,
        }
    }

    #[test]
    fn test_usernames_are_unique() {
        let mut store = store();
        store.create_user("auth", String::new()).unwrap();

        let result = store.create_user("auth", String::new());
        assert!(matches!(result, Err(BlogError::Conflict(_))));
    }

    #[test]
    fn test_require_user_unknown_is_not_found() {
        let store = store();
        assert!(matches!(store.require_user("ghost"), Err(BlogError::NotFound(_))));
    }

    #[test]
    fn test_group_slug_derived_from_title() {
        let mut store = store();
        let group = store.create_group("Cats and Dogs", "", "").unwrap();
        assert_eq!(group.slug, "cats-and-dogs");
        assert_eq!(store.require_group("cats-and-dogs").unwrap().id, group.id);
    }

    #[test]
    fn test_group_slugs_are_unique() {
        let mut store = store();
        store.create_group("One", "slug", "").unwrap();
        assert!(matches!(
            store.create_group("Two", "slug", ""),
            Err(BlogError::Conflict(_))
        ));
    }

    #[test]
    fn test_create_post_requires_known_group() {
        let mut store = store();
        let user = store.create_user("auth", String::new()).unwrap();
        let mut post = new_post(user.id, "text");
        post.group_id = Some(999);

        assert!(matches!(store.create_post(post), Err(BlogError::NotFound(_))));
        assert_eq!(store.post_count(), 0);
    }

    #[test]
    fn test_update_post_keeps_author_and_count() {
        let mut store = store();
        let user = store.create_user("auth", String::new()).unwrap();
        let post = store.create_post(new_post(user.id, "before")).unwrap();

        let updated = store
            .update_post(
                post.id,
                PostChanges {
                    text: "after".to_string(),
                    group_id: None,
                    image: None,
                },
            )
            .unwrap();

        assert_eq!(updated.text, "after");
        assert_eq!(updated.author_id, user.id);
        assert_eq!(updated.pub_date, post.pub_date);
        assert_eq!(store.post_count(), 1);
    }

    #[test]
    fn test_delete_post_removes_comments() {
        let mut store = store();
        let user = store.create_user("auth", String::new()).unwrap();
        let post = store.create_post(new_post(user.id, "text")).unwrap();
        store
            .add_comment(NewComment::new(post.id, user.id, "nice"))
            .unwrap();

        store.delete_post(post.id).unwrap();

        assert!(store.comments_for_post(post.id).is_empty());
        assert!(store.post(post.id).is_none());
    }

    #[test]
    fn test_comment_on_unknown_post() {
        let mut store = store();
        let user = store.create_user("auth", String::new()).unwrap();
        let result = store.add_comment(NewComment::new(42, user.id, "hi"));
        assert!(matches!(result, Err(BlogError::NotFound(_))));
    }

    #[test]
    fn test_follow_edge_constraints() {
        let mut store = store();
        let user = store.create_user("user", String::new()).unwrap();
        let author = store.create_user("author", String::new()).unwrap();

        store.insert_follow(user.id, author.id).unwrap();

        assert!(store.insert_follow(user.id, author.id).is_err());
        assert!(store.insert_follow(user.id, user.id).is_err());
        assert_eq!(store.follow_count(user.id), 1);
        assert!(store.followed_authors(user.id).contains(&author.id));

        assert_eq!(store.remove_follow(user.id, author.id), 1);
        assert_eq!(store.remove_follow(user.id, author.id), 0);
    }
}
