//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not store
//! documents themselves. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Dashboard, DashboardSummary};

// ============================================
// GENERIC DTOs
// ============================================

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================
// DASHBOARD DTOs
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub dashboard_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub message: String,
    pub dashboards: Vec<DashboardSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
    pub message: String,
    pub repaired: bool,
    pub old_slug: String,
    pub new_slug: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub message: String,
    pub favicons_downloaded: usize,
    pub dashboard: Dashboard,
}

// ============================================
// SETTINGS DTOs
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsImportResponse {
    pub message: String,
    pub imported: usize,
    pub failed: usize,
    pub slugs: Vec<String>,
}

// ============================================
// UPLOAD DTOs
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailUploadResponse {
    pub message: String,
    pub thumbnail_url: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundUploadResponse {
    pub message: String,
    pub image_url: String,
    pub filename: String,
}

// ============================================
// UTILITY DTOs
// ============================================

/// Query parameters for the favicon redirect
#[derive(Debug, Deserialize)]
pub struct FaviconParams {
    #[serde(default)]
    pub url: Option<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Store status
    pub storage: String,
    /// Number of indexed dashboards
    pub dashboards: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
