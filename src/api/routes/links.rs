//! Link Routes
//!
//! - POST /api/dashboards/:slug/links - Add a link (acquires a favicon when no thumbnail)
//! - PUT /api/dashboards/:slug/links/:link_id - Partial update
//! - DELETE /api/dashboards/:slug/links/:link_id - Remove a link

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::MessageResponse;
use crate::api::error::ApiResult;
use crate::api::routes::dashboards::find_dashboard;
use crate::api::state::AppState;
use crate::store::{Link, LinkPatch, NewLink, StoreError};

/// POST /api/dashboards/:slug/links
///
/// A failed favicon lookup never fails the request.
pub async fn add_link(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(mut input): Json<NewLink>,
) -> ApiResult<(StatusCode, Json<Link>)> {
    // 404 before spending time on the network
    find_dashboard(&state, &slug).await?;

    if !input.has_thumbnail() {
        if let Some(path) = state.favicons.acquire(&input.url).await {
            input.favicon = Some(path);
        }
    }

    let link = state.store.add_link(&slug, input).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// PUT /api/dashboards/:slug/links/:link_id
///
/// Clearing the thumbnail (`"thumbnail": ""`) on a link that has no favicon
/// triggers a favicon lookup.
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    Path((slug, link_id)): Path<(String, String)>,
    Json(patch): Json<LinkPatch>,
) -> ApiResult<Json<Link>> {
    let link_id = parse_link_id(&link_id)?;
    let clears_thumbnail = patch.clears_thumbnail();

    let link = state.store.update_link(&slug, link_id, patch).await?;
    if !clears_thumbnail || link.favicon.is_some() {
        return Ok(Json(link));
    }

    let Some(path) = state.favicons.acquire(&link.url).await else {
        return Ok(Json(link));
    };

    let dashboard = state.store.apply_favicons(&slug, &[(link_id, path)]).await?;
    let link = dashboard
        .link(link_id)
        .cloned()
        .ok_or_else(|| StoreError::LinkNotFound(link_id.to_string()))?;

    Ok(Json(link))
}

/// DELETE /api/dashboards/:slug/links/:link_id
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path((slug, link_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let link_id = parse_link_id(&link_id)?;
    state.store.delete_link(&slug, link_id).await?;
    Ok(Json(MessageResponse::new("Link deleted successfully")))
}

/// Link ids are UUIDs; anything else cannot name an existing link
fn parse_link_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| StoreError::LinkNotFound(raw.to_string()).into())
}
