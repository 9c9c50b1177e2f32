//! Follow handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::api::AppState;
use crate::auth::RequireUser;
use crate::error::Result;
use crate::follow::{follow, unfollow};

/// Handler for GET /profile/:username/follow
pub async fn profile_follow_handler(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> Result<Redirect> {
    follow(&mut *state.store.write().await, &user, &username)?;
    Ok(Redirect::to(&format!("/profile/{}/", username)))
}

/// Handler for GET /profile/:username/unfollow
pub async fn profile_unfollow_handler(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> Redirect {
    unfollow(&mut *state.store.write().await, &user, &username);
    Redirect::to(&format!("/profile/{}/", username))
}
