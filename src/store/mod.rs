//! Data Store Module
//!
//! Users, groups, posts, comments and follow edges.

mod blog;
pub mod models;

pub use blog::BlogStore;
pub use models::{
    Comment, Follow, Group, NewComment, NewPost, Post, PostChanges, StoredImage, User,
};
