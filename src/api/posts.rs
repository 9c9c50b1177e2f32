//! Post handlers
//!
//! Detail view, creation, editing and comments.

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::FormRejection, Multipart, Path, State,
    },
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::warn;

use crate::api::AppState;
use crate::auth::RequireUser;
use crate::error::{BlogError, FormErrors, Result};
use crate::models::{
    CommentForm, CommentView, FormSpec, GroupView, PostDetailPage, PostForm, PostFormPage,
    PostView,
};
use crate::store::models::PostId;
use crate::store::{NewComment, NewPost, PostChanges};

/// Post ids in URLs are plain integers; anything else names no post.
fn parse_post_id(raw: &str) -> Result<PostId> {
    raw.parse()
        .map_err(|_| BlogError::NotFound(format!("post '{}'", raw)))
}

fn detail_url(post_id: PostId) -> String {
    format!("/posts/{}/", post_id)
}

fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}

/// Collects the `text`, `group` and `image` parts of a multipart body.
async fn read_post_form(mut multipart: Multipart) -> Result<PostForm> {
    let malformed = |err: axum::extract::multipart::MultipartError| {
        BlogError::Validation(FormErrors::single("__all__", err.body_text()))
    };

    let mut form = PostForm::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => form.text = Some(field.text().await.map_err(malformed)?),
            "group" => form.group = Some(field.text().await.map_err(malformed)?),
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                form.image = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Handler for GET /posts/:post_id/
pub async fn post_detail_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostDetailPage>> {
    let post_id = parse_post_id(&post_id)?;
    let store = state.store.read().await;
    let post = store.require_post(post_id)?;

    Ok(Json(PostDetailPage {
        post: PostView::render(&store, post),
        post_quantity: store.post_count_by_author(post.author_id),
        comments: store
            .comments_for_post(post.id)
            .into_iter()
            .map(|comment| CommentView::render(&store, comment))
            .collect(),
        comment_form: FormSpec::comment(),
    }))
}

/// Handler for GET /create/
pub async fn post_create_form_handler(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
) -> Json<PostFormPage> {
    let store = state.store.read().await;
    Json(PostFormPage {
        is_edit: false,
        post: None,
        groups: store.groups().into_iter().map(GroupView::from).collect(),
        form: FormSpec::post(),
    })
}

/// Handler for POST /create/
///
/// On success the author lands on their own profile.
pub async fn post_create_handler(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    multipart: Multipart,
) -> Result<Redirect> {
    let form = read_post_form(multipart).await?;

    let mut store = state.store.write().await;
    let valid = form.validate(|id| store.group(id).is_some())?;
    store.create_post(NewPost::from_form(valid, user.id))?;

    Ok(Redirect::to(&profile_url(&user.username)))
}

/// Handler for GET /posts/:post_id/edit/
///
/// Anyone but the author is sent back to the detail view.
pub async fn post_edit_form_handler(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(post_id): Path<String>,
) -> Result<Response> {
    let post_id = parse_post_id(&post_id)?;
    let store = state.store.read().await;
    let post = store.require_post(post_id)?;

    if post.author_id != user.id {
        return Ok(Redirect::to(&detail_url(post_id)).into_response());
    }

    Ok(Json(PostFormPage {
        is_edit: true,
        post: Some(PostView::render(&store, post)),
        groups: store.groups().into_iter().map(GroupView::from).collect(),
        form: FormSpec::post(),
    })
    .into_response())
}

/// Handler for POST /posts/:post_id/edit/
///
/// The body is only looked at once the caller is known to be the author.
pub async fn post_edit_handler(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(post_id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Redirect> {
    let post_id = parse_post_id(&post_id)?;
    let author_id = state.store.read().await.require_post(post_id)?.author_id;
    if author_id != user.id {
        warn!(post_id, user = %user.username, "edit attempt by non-author");
        return Ok(Redirect::to(&detail_url(post_id)));
    }

    let multipart = multipart.map_err(|rejection| {
        BlogError::Validation(FormErrors::single("__all__", rejection.body_text()))
    })?;
    let form = read_post_form(multipart).await?;

    let mut store = state.store.write().await;
    let valid = form.validate(|id| store.group(id).is_some())?;
    store.update_post(post_id, PostChanges::from_form(valid))?;

    Ok(Redirect::to(&detail_url(post_id)))
}

/// Handler for POST /posts/:post_id/comment
///
/// Always ends on the detail view. An invalid comment, or a body that is not
/// an urlencoded form, is dropped and only shows up in the log.
pub async fn add_comment_handler(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(post_id): Path<String>,
    form: std::result::Result<Form<CommentForm>, FormRejection>,
) -> Result<Redirect> {
    let post_id = parse_post_id(&post_id)?;
    let mut store = state.store.write().await;
    store.require_post(post_id)?;

    let checked = form
        .map_err(|rejection| rejection.body_text())
        .and_then(|Form(form)| match form.validate() {
            None => Ok(form),
            Some(error_msg) => Err(error_msg),
        });
    match checked {
        Ok(form) => {
            store.add_comment(NewComment::new(post_id, user.id, form.text))?;
        }
        Err(error_msg) => {
            warn!(post_id, user = %user.username, error = %error_msg, "comment rejected");
        }
    }

    Ok(Redirect::to(&detail_url(post_id)))
}
