//! Entities held by the blog store, plus the values used to create and
//! change them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::requests::{UploadedImage, ValidPostForm};

pub type UserId = u64;
pub type GroupId = u64;
pub type PostId = u64;
pub type CommentId = u64;
pub type FollowId = u64;

/// Number of characters a post shows when displayed on its own.
pub const POST_DISPLAY_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: UserId,
    pub group_id: Option<GroupId>,
    /// Media name of the attached image, e.g. `posts/<uuid>.gif`
    pub image: Option<String>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.text.chars().take(POST_DISPLAY_CHARS).collect();
        f.write_str(&head)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Directed edge: `user_id` follows `author_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Follow {
    pub id: FollowId,
    pub user_id: UserId,
    pub author_id: UserId,
    pub created: DateTime<Utc>,
}

/// Uploaded image bytes as kept by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

// == Entity builders ==

/// Everything needed to insert a post; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub text: String,
    pub group_id: Option<GroupId>,
    pub image: Option<UploadedImage>,
}

impl NewPost {
    pub fn from_form(form: ValidPostForm, author_id: UserId) -> Self {
        Self {
            author_id,
            text: form.text,
            group_id: form.group_id,
            image: form.image,
        }
    }
}

/// Replacement values for an existing post. The author never changes.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<GroupId>,
    /// `None` keeps the current image
    pub image: Option<UploadedImage>,
}

impl PostChanges {
    pub fn from_form(form: ValidPostForm) -> Self {
        Self {
            text: form.text,
            group_id: form.group_id,
            image: form.image,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub text: String,
}

impl NewComment {
    pub fn new(post_id: PostId, author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            post_id,
            author_id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_display_is_first_fifteen_chars() {
        let post = Post {
            id: 1,
            text: "Этот текст для проверки тестового поста 1".to_string(),
            pub_date: Utc::now(),
            author_id: 1,
            group_id: None,
            image: None,
        };
        assert_eq!(post.to_string(), "Этот текст для ");
        assert_eq!(post.to_string().chars().count(), POST_DISPLAY_CHARS);
    }

    #[test]
    fn test_short_post_display_is_whole_text() {
        let post = Post {
            id: 1,
            text: "short".to_string(),
            pub_date: Utc::now(),
            author_id: 1,
            group_id: None,
            image: None,
        };
        assert_eq!(post.to_string(), "short");
    }

    #[test]
    fn test_group_display_is_title() {
        let group = Group {
            id: 1,
            title: "Тестовая группа 1".to_string(),
            slug: "test".to_string(),
            description: String::new(),
        };
        assert_eq!(group.to_string(), "Тестовая группа 1");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            username: "auth".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            date_joined: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}
