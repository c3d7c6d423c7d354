//! Utility Routes
//!
//! - GET /api/favicon?url=... - Redirect to `<origin>/favicon.ico`

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::Url;

use crate::api::dto::FaviconParams;
use crate::api::error::{ApiError, ApiResult};

/// GET /api/favicon?url=...
///
/// Independent of favicon acquisition: nothing is fetched or stored.
pub async fn favicon_redirect(Query(params): Query<FaviconParams>) -> ApiResult<Response> {
    let raw = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("URL parameter is required".to_string()))?;

    let location = favicon_location(&raw)?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

fn favicon_location(raw: &str) -> ApiResult<String> {
    if raw.trim_start().to_ascii_lowercase().starts_with("javascript:") {
        return Err(ApiError::Validation("Invalid URL scheme".to_string()));
    }

    let url = Url::parse(raw).map_err(|_| ApiError::Validation("Invalid URL format".to_string()))?;

    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(ApiError::Validation("URL has no origin".to_string()));
    }

    Ok(format!("{}/favicon.ico", origin.ascii_serialization()))
}
