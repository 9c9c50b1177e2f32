//! API Routes
//!
//! Configures the Axum router with every blog endpoint.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::accounts::{
    login_form_handler, login_handler, logout_handler, signup_form_handler, signup_handler,
};
use super::feeds::{follow_index_handler, group_posts_handler, index_handler, profile_handler};
use super::follows::{profile_follow_handler, profile_unfollow_handler};
use super::posts::{
    add_comment_handler, post_create_form_handler, post_create_handler, post_detail_handler,
    post_edit_form_handler, post_edit_handler,
};
use super::service::{health_handler, media_handler, not_found_handler};
use super::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Cached index feed
/// - `GET /group/:slug/` - Posts in a group
/// - `GET /profile/:username/` - Posts by an author
/// - `GET /posts/:post_id/` - Post detail with comments
/// - `GET|POST /create/` - New post
/// - `GET|POST /posts/:post_id/edit/` - Edit post (author only)
/// - `POST /posts/:post_id/comment` - Add comment
/// - `GET /follow/` - Feed of followed authors
/// - `GET /profile/:username/follow` and `/unfollow`
/// - `/auth/signup/`, `/auth/login/`, `/auth/logout/`
/// - `GET /media/*name` - Uploaded images
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit from `max_upload_bytes`
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/group/:slug/", get(group_posts_handler))
        .route("/profile/:username/", get(profile_handler))
        .route("/posts/:post_id/", get(post_detail_handler))
        .route(
            "/create/",
            get(post_create_form_handler).post(post_create_handler),
        )
        .route(
            "/posts/:post_id/edit/",
            get(post_edit_form_handler).post(post_edit_handler),
        )
        .route("/posts/:post_id/comment", post(add_comment_handler))
        .route("/follow/", get(follow_index_handler))
        .route("/profile/:username/follow", get(profile_follow_handler))
        .route("/profile/:username/unfollow", get(profile_unfollow_handler))
        .route("/auth/signup/", get(signup_form_handler).post(signup_handler))
        .route("/auth/login/", get(login_form_handler).post(login_handler))
        .route("/auth/logout/", get(logout_handler).post(logout_handler))
        .route("/media/*name", get(media_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
