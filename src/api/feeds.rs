//! Feed handlers
//!
//! The index, group, profile and follow listings.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::api::AppState;
use crate::auth::{CurrentUser, RequireUser};
use crate::cache::index_cache_key;
use crate::error::Result;
use crate::feed::FeedFilter;
use crate::follow::is_following;
use crate::models::{
    AuthorView, FollowPage, GroupPage, GroupView, IndexPage, PageQuery, PageView, ProfilePage,
};

/// Handler for GET /
///
/// Served from the page cache while the cached copy is live; writes to the
/// blog do not invalidate it.
pub async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let key = index_cache_key(query.page.as_deref());

    if let Some(body) = state.page_cache.write().await.get(&key) {
        debug!(key, "index served from cache");
        return Ok(json_body(body));
    }

    let body = {
        let store = state.store.read().await;
        let page = state
            .feed
            .build(&store, FeedFilter::All, query.page.as_deref());
        serde_json::to_string(&IndexPage {
            page_obj: PageView::render(&store, &page),
        })?
    };

    state
        .page_cache
        .write()
        .await
        .set(key, body.clone(), None);

    Ok(json_body(body))
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Handler for GET /group/:slug/
pub async fn group_posts_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<GroupPage>> {
    let store = state.store.read().await;
    let group = store.require_group(&slug)?;
    let page = state
        .feed
        .build(&store, FeedFilter::Group(group.id), query.page.as_deref());

    Ok(Json(GroupPage {
        group: GroupView::from(group),
        page_obj: PageView::render(&store, &page),
    }))
}

/// Handler for GET /profile/:username/
///
/// `following` is only ever true for a logged-in caller.
pub async fn profile_handler(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProfilePage>> {
    let store = state.store.read().await;
    let author = store.require_user(&username)?;
    let page = state
        .feed
        .build(&store, FeedFilter::Author(author.id), query.page.as_deref());
    let following = viewer.is_some_and(|viewer| is_following(&store, viewer.id, &username));

    Ok(Json(ProfilePage {
        author: AuthorView::from(author),
        post_quantity: page.count,
        following,
        page_obj: PageView::render(&store, &page),
    }))
}

/// Handler for GET /follow/
pub async fn follow_index_handler(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<FollowPage>> {
    let store = state.store.read().await;
    let page = state
        .feed
        .build(&store, FeedFilter::FollowedBy(user.id), query.page.as_deref());

    Ok(Json(FollowPage {
        page_obj: PageView::render(&store, &page),
    }))
}
