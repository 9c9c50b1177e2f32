//! Account handlers
//!
//! Signup, login and logout. Passwords are hashed off the async runtime.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};

use crate::api::AppState;
use crate::auth::{hash_password, verify_password, SESSION_COOKIE};
use crate::error::{BlogError, FormErrors, Result};
use crate::models::requests::BAD_CREDENTIALS_MESSAGE;
use crate::models::{AccountFormPage, FormSpec, LoginForm, NextQuery, SignupForm};

const USERNAME_TAKEN_MESSAGE: &str = "A user with that username already exists.";

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BlogError::Internal(format!("blocking task failed: {}", e)))
}

/// Handler for GET /auth/signup/
pub async fn signup_form_handler() -> Json<AccountFormPage> {
    Json(AccountFormPage {
        next: None,
        form: FormSpec::credentials(),
    })
}

/// Handler for POST /auth/signup/
///
/// Creates the account and logs it in.
pub async fn signup_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<(CookieJar, Redirect)> {
    form.validate()?;
    if state.store.read().await.user_by_username(&form.username).is_some() {
        return Err(BlogError::Validation(FormErrors::single(
            "username",
            USERNAME_TAKEN_MESSAGE,
        )));
    }

    let password = form.password;
    let password_hash = run_blocking(move || hash_password(&password)).await??;

    let user = state
        .store
        .write()
        .await
        .create_user(&form.username, password_hash)
        .map_err(|err| match err {
            BlogError::Conflict(_) => {
                BlogError::Validation(FormErrors::single("username", USERNAME_TAKEN_MESSAGE))
            }
            other => other,
        })?;

    let token = state.open_session(user.id).await;
    Ok((jar.add(session_cookie(token)), Redirect::to("/")))
}

/// Handler for GET /auth/login/
pub async fn login_form_handler(Query(query): Query<NextQuery>) -> Json<AccountFormPage> {
    Json(AccountFormPage {
        next: query.next,
        form: FormSpec::credentials(),
    })
}

/// Handler for POST /auth/login/
///
/// Redirects to `next` when it is a local path, `/` otherwise.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect)> {
    form.validate()?;
    let bad_credentials =
        || BlogError::Validation(FormErrors::single("__all__", BAD_CREDENTIALS_MESSAGE));

    let user = state
        .store
        .read()
        .await
        .user_by_username(&form.username)
        .cloned();
    let Some(user) = user else {
        warn!(username = %form.username, "login for unknown user");
        return Err(bad_credentials());
    };

    let password = form.password.clone();
    let hash = user.password_hash.clone();
    if !run_blocking(move || verify_password(&password, &hash)).await? {
        warn!(username = %form.username, "login with wrong password");
        return Err(bad_credentials());
    }

    let token = state.open_session(user.id).await;
    info!(user_id = user.id, "logged in");
    Ok((jar.add(session_cookie(token)), Redirect::to(&form.redirect_target())))
}

/// Handler for GET|POST /auth/logout/
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.write().await.destroy(cookie.value());
    }
    let removal = Cookie::build(SESSION_COOKIE).path("/").build();
    (jar.remove(removal), Redirect::to("/"))
}
