//! Upload Routes
//!
//! - POST /api/upload/thumbnail - Link thumbnail (field `thumbnail`, stored in `uploads/`)
//! - POST /api/upload/background - Background image (field `image`, stored in `images/`)
//!
//! Files are stored under a generated name that keeps the original extension.

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{BackgroundUploadResponse, ThumbnailUploadResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /api/upload/thumbnail
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<ThumbnailUploadResponse>> {
    let dir = state.store.config().uploads_dir();
    let filename = save_image_field(multipart, "thumbnail", &dir).await?;

    Ok(Json(ThumbnailUploadResponse {
        message: "Thumbnail uploaded successfully".to_string(),
        thumbnail_url: format!("/api/uploads/{}", filename),
        filename,
    }))
}

/// POST /api/upload/background
pub async fn upload_background(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<BackgroundUploadResponse>> {
    let dir = state.store.config().images_dir();
    let filename = save_image_field(multipart, "image", &dir).await?;

    Ok(Json(BackgroundUploadResponse {
        message: "Background image uploaded successfully".to_string(),
        image_url: format!("/api/images/{}", filename),
        filename,
    }))
}

/// Store the first image in `field_name` under `dir`, returning its file name
async fn save_image_field(mut multipart: Multipart, field_name: &str, dir: &Path) -> ApiResult<String> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("image/"));
        if !is_image {
            return Err(ApiError::Validation("Only image files are allowed".to_string()));
        }

        let filename = match field.file_name().and_then(safe_extension) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(ApiError::Validation("Uploaded file is empty".to_string()));
        }

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(dir.join(&filename), &data).await?;

        tracing::info!(file = %filename, bytes = data.len(), "Stored upload");
        return Ok(filename);
    }

    Err(ApiError::Validation("No file uploaded".to_string()))
}

/// Extension of an uploaded file name, if it is short and alphanumeric
fn safe_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    (!ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| ext.to_ascii_lowercase())
}
