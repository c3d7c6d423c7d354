//! Dashboard Routes
//!
//! - GET /api/dashboards - All dashboards in index order
//! - POST /api/dashboards - Create a dashboard
//! - POST /api/dashboards/import - Import a dashboard with fresh ids
//! - POST /api/dashboards/reorder - Rewrite the index order
//! - POST /api/dashboards/repair - Repair a stale default slug
//! - GET /api/dashboards/:slug - Get one dashboard
//! - PUT /api/dashboards/:slug - Partial update
//! - DELETE /api/dashboards/:slug - Delete a dashboard
//! - POST /api/dashboards/:slug/refresh - Re-acquire favicons

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{MessageResponse, RefreshResponse, ReorderRequest, ReorderResponse, RepairResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::store::{Dashboard, DashboardPatch, NewDashboard, StoreError};

/// GET /api/dashboards
pub async fn list_dashboards(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Dashboard>>> {
    let dashboards = state.store.get_all_dashboards().await?;
    Ok(Json(dashboards))
}

/// POST /api/dashboards
pub async fn create_dashboard(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewDashboard>,
) -> ApiResult<(StatusCode, Json<Dashboard>)> {
    let dashboard = state.store.create_dashboard(input).await?;
    Ok((StatusCode::CREATED, Json(dashboard)))
}

/// POST /api/dashboards/import
///
/// Incoming ids are ignored; the slug gets a numeric suffix if taken.
pub async fn import_dashboard(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewDashboard>,
) -> ApiResult<(StatusCode, Json<Dashboard>)> {
    let dashboard = state.store.import_dashboard(input).await?;
    Ok((StatusCode::CREATED, Json(dashboard)))
}

/// POST /api/dashboards/reorder
pub async fn reorder_dashboards(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<Json<ReorderResponse>> {
    let dashboards = state.store.reorder_dashboards(&req.dashboard_ids).await?;
    Ok(Json(ReorderResponse {
        message: "Dashboards reordered successfully".to_string(),
        dashboards,
    }))
}

/// POST /api/dashboards/repair
pub async fn repair_default(State(state): State<Arc<AppState>>) -> ApiResult<Json<RepairResponse>> {
    let outcome = state.store.repair_default_slug().await?;
    let message = if outcome.repaired {
        "Default dashboard slug repaired"
    } else {
        "Default dashboard slug is already valid"
    };

    Ok(Json(RepairResponse {
        message: message.to_string(),
        repaired: outcome.repaired,
        old_slug: outcome.old_slug,
        new_slug: outcome.new_slug,
    }))
}

/// GET /api/dashboards/:slug
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Dashboard>> {
    let dashboard = find_dashboard(&state, &slug).await?;
    Ok(Json(dashboard))
}

/// PUT /api/dashboards/:slug
pub async fn update_dashboard(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(patch): Json<DashboardPatch>,
) -> ApiResult<Json<Dashboard>> {
    let dashboard = state.store.update_dashboard(&slug, patch).await?;
    Ok(Json(dashboard))
}

/// DELETE /api/dashboards/:slug
pub async fn delete_dashboard(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_dashboard_by_slug(&slug).await?;
    Ok(Json(MessageResponse::new("Dashboard deleted successfully")))
}

/// POST /api/dashboards/:slug/refresh
///
/// Re-acquires favicons for every link without a thumbnail. Downloads run
/// outside the store lock; results are applied in one write at the end.
pub async fn refresh_dashboard(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<RefreshResponse>> {
    let dashboard = find_dashboard(&state, &slug).await?;

    let mut downloaded = Vec::new();
    for link in dashboard.links.iter().filter(|l| !l.has_thumbnail()) {
        if let Some(path) = state.favicons.acquire(&link.url).await {
            downloaded.push((link.id, path));
        }
    }

    let dashboard = state.store.apply_favicons(&slug, &downloaded).await?;

    tracing::info!(slug = %slug, favicons = downloaded.len(), "Refreshed dashboard favicons");

    Ok(Json(RefreshResponse {
        message: "Dashboard refreshed successfully".to_string(),
        favicons_downloaded: downloaded.len(),
        dashboard,
    }))
}

/// Look up a dashboard by slug, mapping absence to 404
pub(crate) async fn find_dashboard(state: &AppState, slug: &str) -> ApiResult<Dashboard> {
    state
        .store
        .get_dashboard_by_slug(slug)
        .await?
        .ok_or_else(|| StoreError::DashboardNotFound(slug.to_string()).into())
}
