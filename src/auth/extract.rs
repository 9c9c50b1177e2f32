//! Identity extractors
//!
//! Handlers take [`CurrentUser`] when anonymous callers are welcome and
//! [`RequireUser`] when they must be sent to the login page.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::api::AppState;
use crate::auth::SESSION_COOKIE;
use crate::error::BlogError;
use crate::store::User;

/// The logged-in user, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

/// A logged-in user; anonymous requests are redirected to login.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

async fn session_user(parts: &Parts, state: &AppState) -> Option<User> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(SESSION_COOKIE)?.value().to_string();

    let user_id = state.sessions.write().await.resolve(&token)?;
    let store = state.store.read().await;
    store.user(user_id).cloned()
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(session_user(parts, state).await))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = BlogError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_user(parts, state).await {
            Some(user) => Ok(RequireUser(user)),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string());
                Err(BlogError::Unauthenticated { next })
            }
        }
    }
}
