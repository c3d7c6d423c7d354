//! Settings Routes
//!
//! - GET /api/settings - Global settings
//! - PUT /api/settings - Partial settings update
//! - GET /api/settings/export - Zip of settings and every dashboard
//! - POST /api/settings/import - Import an export zip

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::SettingsImportResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::store::{Settings, SettingsPatch};

pub const EXPORT_FILENAME: &str = "warpdeck-export.zip";

/// GET /api/settings
pub async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<Settings>> {
    let settings = state.store.load_settings().await?;
    Ok(Json(settings))
}

/// PUT /api/settings
///
/// Only the fields present in the body are changed.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> ApiResult<Json<Settings>> {
    let settings = state.store.update_settings(patch).await?;
    Ok(Json(settings))
}

/// GET /api/settings/export
pub async fn export_settings(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let archive = state.store.export_archive().await?;

    tracing::info!(bytes = archive.len(), "Exported settings archive");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        Body::from(archive),
    )
        .into_response())
}

/// POST /api/settings/import
///
/// Expects a multipart field `file` holding an export zip.
pub async fn import_settings(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<SettingsImportResponse>> {
    let mut archive = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            archive = Some(field.bytes().await?);
            break;
        }
    }

    let archive = archive.ok_or_else(|| ApiError::Validation("No file uploaded".to_string()))?;
    let report = state.store.import_archive(&archive).await?;

    Ok(Json(SettingsImportResponse {
        message: format!("Imported {} dashboard(s)", report.imported),
        imported: report.imported,
        failed: report.failed,
        slugs: report.slugs,
    }))
}
