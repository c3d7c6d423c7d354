//! HTTP API Client
//!
//! Functions for communicating with the WarpDeck REST API. The client is
//! served by the same process, so every path is relative to the page origin.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::state::models::{Dashboard, DashboardSummary, Link, LinkInput, Settings};

/// API base path
pub const API_BASE: &str = "/api";

// ============ Response Types ============

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
    pub message: String,
    pub repaired: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub favicons_downloaded: usize,
    pub dashboard: Dashboard,
}

#[derive(Debug, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
    pub failed: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailUpload {
    pub thumbnail_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundUpload {
    pub image_url: String,
}

// ============ Helpers ============

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let status = response.status();
        return Err(match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("Request failed ({})", status),
        });
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = Request::get(&format!("{}{}", API_BASE, path))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

async fn send_json<B: Serialize, T: DeserializeOwned>(method: &str, path: &str, body: &B) -> Result<T, String> {
    let url = format!("{}{}", API_BASE, path);
    let builder = match method {
        "PUT" => Request::put(&url),
        _ => Request::post(&url),
    };

    let response = builder
        .json(body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

async fn delete(path: &str) -> Result<MessageResponse, String> {
    let response = Request::delete(&format!("{}{}", API_BASE, path))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

async fn post_file<T: DeserializeOwned>(path: &str, field: &str, file: &web_sys::File) -> Result<T, String> {
    let form = web_sys::FormData::new().map_err(|_| "Could not create form".to_string())?;
    form.append_with_blob_and_filename(field, file, &file.name())
        .map_err(|_| "Could not attach file".to_string())?;

    let response = Request::post(&format!("{}{}", API_BASE, path))
        .body(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

// ============ Settings ============

pub async fn fetch_settings() -> Result<Settings, String> {
    get("/settings").await
}

/// Partial update; only the keys present in `patch` change
pub async fn update_settings(patch: &serde_json::Value) -> Result<Settings, String> {
    send_json("PUT", "/settings", patch).await
}

/// URL of the zip export, used as a download link
pub fn export_url() -> String {
    format!("{}/settings/export", API_BASE)
}

pub async fn import_settings(file: &web_sys::File) -> Result<ImportResult, String> {
    post_file("/settings/import", "file", file).await
}

// ============ Dashboards ============

pub async fn fetch_dashboard(slug: &str) -> Result<Dashboard, String> {
    get(&format!("/dashboards/{}", slug)).await
}

pub async fn create_dashboard(title: &str, slug: &str) -> Result<Dashboard, String> {
    send_json("POST", "/dashboards", &serde_json::json!({ "title": title, "slug": slug })).await
}

/// Import a dashboard document; the server assigns new ids and a free slug
pub async fn import_dashboard(document: &serde_json::Value) -> Result<Dashboard, String> {
    send_json("POST", "/dashboards/import", document).await
}

pub async fn update_dashboard(slug: &str, patch: &serde_json::Value) -> Result<Dashboard, String> {
    send_json("PUT", &format!("/dashboards/{}", slug), patch).await
}

pub async fn delete_dashboard(slug: &str) -> Result<(), String> {
    delete(&format!("/dashboards/{}", slug)).await.map(|_| ())
}

pub async fn reorder_dashboards(ids: &[String]) -> Result<(), String> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ReorderRequest<'a> {
        dashboard_ids: &'a [String],
    }

    let _: serde_json::Value = send_json("POST", "/dashboards/reorder", &ReorderRequest { dashboard_ids: ids }).await?;
    Ok(())
}

pub async fn repair_default() -> Result<RepairResponse, String> {
    send_json("POST", "/dashboards/repair", &serde_json::json!({})).await
}

pub async fn refresh_dashboard(slug: &str) -> Result<RefreshResponse, String> {
    send_json("POST", &format!("/dashboards/{}/refresh", slug), &serde_json::json!({})).await
}

// ============ Links ============

pub async fn add_link(slug: &str, input: &LinkInput) -> Result<Link, String> {
    send_json("POST", &format!("/dashboards/{}/links", slug), input).await
}

pub async fn update_link(slug: &str, link_id: &str, input: &LinkInput) -> Result<Link, String> {
    send_json("PUT", &format!("/dashboards/{}/links/{}", slug, link_id), input).await
}

pub async fn delete_link(slug: &str, link_id: &str) -> Result<(), String> {
    delete(&format!("/dashboards/{}/links/{}", slug, link_id)).await.map(|_| ())
}

// ============ Uploads ============

pub async fn upload_thumbnail(file: &web_sys::File) -> Result<String, String> {
    post_file::<ThumbnailUpload>("/upload/thumbnail", "thumbnail", file)
        .await
        .map(|r| r.thumbnail_url)
}

pub async fn upload_background(file: &web_sys::File) -> Result<String, String> {
    post_file::<BackgroundUpload>("/upload/background", "image", file)
        .await
        .map(|r| r.image_url)
}

/// Summaries in index order, for views that only need names
pub fn summaries(settings: &Option<Settings>) -> Vec<DashboardSummary> {
    settings.as_ref().map(|s| s.dashboards.clone()).unwrap_or_default()
}
