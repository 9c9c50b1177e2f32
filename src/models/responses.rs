//! Response DTOs for the blog API
//!
//! Every page is rendered as one of these documents.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::feed::Page;
use crate::store::{BlogStore, Comment, Group, Post, User};

/// URL prefix under which uploaded images are served.
pub const MEDIA_URL: &str = "/media/";

pub fn media_url(name: &str) -> String {
    format!("{}{}", MEDIA_URL, name)
}

// == Entity views ==

#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: u64,
    pub username: String,
}

impl From<&User> for AuthorView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<&Group> for GroupView {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: u64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: Option<AuthorView>,
    pub group: Option<GroupView>,
    /// URL of the attached image
    pub image: Option<String>,
}

impl PostView {
    /// Resolves author and group through the store.
    pub fn render(store: &BlogStore, post: &Post) -> Self {
        Self {
            id: post.id,
            text: post.text.clone(),
            pub_date: post.pub_date,
            author: store.user(post.author_id).map(AuthorView::from),
            group: post
                .group_id
                .and_then(|id| store.group(id))
                .map(GroupView::from),
            image: post.image.as_deref().map(media_url),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: u64,
    pub author: Option<AuthorView>,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl CommentView {
    pub fn render(store: &BlogStore, comment: &Comment) -> Self {
        Self {
            id: comment.id,
            author: store.user(comment.author_id).map(AuthorView::from),
            text: comment.text.clone(),
            created: comment.created,
        }
    }
}

/// One page of a feed plus its navigation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub object_list: Vec<PostView>,
}

impl PageView {
    pub fn render(store: &BlogStore, page: &Page<&Post>) -> Self {
        Self {
            number: page.number,
            num_pages: page.num_pages,
            count: page.count,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            object_list: page
                .items
                .iter()
                .map(|post| PostView::render(store, post))
                .collect(),
        }
    }
}

// == Pages ==

#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub page_obj: PageView,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPage {
    pub group: GroupView,
    pub page_obj: PageView,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub author: AuthorView,
    pub post_quantity: usize,
    pub following: bool,
    pub page_obj: PageView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailPage {
    pub post: PostView,
    pub post_quantity: usize,
    pub comments: Vec<CommentView>,
    pub comment_form: FormSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowPage {
    pub page_obj: PageView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostFormPage {
    pub is_edit: bool,
    pub post: Option<PostView>,
    pub groups: Vec<GroupView>,
    pub form: FormSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountFormPage {
    pub next: Option<String>,
    pub form: FormSpec,
}

// == Form descriptions ==

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

/// Fields a client has to submit, and how.
#[derive(Debug, Clone, Serialize)]
pub struct FormSpec {
    pub method: &'static str,
    pub enctype: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSpec {
    pub fn post() -> Self {
        Self {
            method: "POST",
            enctype: "multipart/form-data",
            fields: &[
                FieldSpec { name: "text", kind: "textarea", required: true },
                FieldSpec { name: "group", kind: "select", required: false },
                FieldSpec { name: "image", kind: "file", required: false },
            ],
        }
    }

    pub fn comment() -> Self {
        Self {
            method: "POST",
            enctype: "application/x-www-form-urlencoded",
            fields: &[FieldSpec { name: "text", kind: "textarea", required: true }],
        }
    }

    pub fn credentials() -> Self {
        Self {
            method: "POST",
            enctype: "application/x-www-form-urlencoded",
            fields: &[
                FieldSpec { name: "username", kind: "text", required: true },
                FieldSpec { name: "password", kind: "password", required: true },
            ],
        }
    }
}

// == Service ==

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Index page cache counters
    pub cache: CacheStats,
    pub cache_hit_rate: f64,
}

impl HealthResponse {
    pub fn healthy(now: DateTime<Utc>, cache: CacheStats) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: now.to_rfc3339(),
            cache_hit_rate: cache.hit_rate(),
            cache,
        }
    }
}
