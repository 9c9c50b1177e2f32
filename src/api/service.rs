//! Service handlers: health, uploaded media and the 404 fallback.

use axum::{
    extract::{Path, State},
    http::{header, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::AppState;
use crate::error::{BlogError, Result};
use crate::models::HealthResponse;

/// Handler for GET /health
///
/// Returns health status and the page cache counters.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.page_cache.read().await.stats();
    Json(HealthResponse::healthy(state.clock.now(), stats))
}

/// Handler for GET /media/*name
pub async fn media_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response> {
    let store = state.store.read().await;
    let image = store
        .media(&name)
        .ok_or_else(|| BlogError::NotFound(format!("media '{}'", name)))?;

    Ok((
        [(header::CONTENT_TYPE, image.content_type)],
        image.bytes.clone(),
    )
        .into_response())
}

/// Fallback for every unmatched path.
pub async fn not_found_handler(uri: Uri) -> BlogError {
    BlogError::NotFound(format!("page '{}'", uri.path()))
}
