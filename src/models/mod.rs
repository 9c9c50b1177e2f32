//! Request and Response models for the blog API
//!
//! Forms coming in, page documents going out.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CommentForm, LoginForm, NextQuery, PageQuery, PostForm, SignupForm, UploadedImage,
    ValidPostForm,
};
pub use responses::{
    AccountFormPage, AuthorView, CommentView, FollowPage, FormSpec, GroupPage, GroupView,
    HealthResponse, IndexPage, PageView, PostDetailPage, PostFormPage, PostView, ProfilePage,
};
