//! WarpDeck File Store
//!
//! Durable CRUD for the settings document and per-dashboard documents:
//! - Read path: `settings.json` index → `dashboards/<id>.json`
//! - Write path: serialize → temp file → atomic rename
//!
//! Operations that touch both documents (create, rename, delete, reorder,
//! import, repair) run under a single write lock so the summary index and
//! the dashboard files cannot drift apart inside one process. Readers never
//! lock; atomic renames guarantee they only ever see whole documents.

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{
    is_valid_slug, slug_eq, Dashboard, DashboardPatch, DashboardSummary, Link, LinkPatch,
    NewDashboard, NewLink, RepairOutcome, Settings, SettingsPatch,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Keys back-filled into dashboards written before they existed
const MIGRATED_KEYS: [(&str, bool); 2] = [("showSearchBar", true), ("showCustomBackground", false)];

/// Configuration for the file store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for all data
    pub data_dir: PathBuf,
    /// Override for the dashboards directory (default: `<data_dir>/dashboards`)
    pub dashboards_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dashboards_dir: None,
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_dashboards_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dashboards_dir = Some(dir.into());
        self
    }

    /// Get path to the settings document
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    /// Get path to the dashboards directory
    pub fn dashboards_dir(&self) -> PathBuf {
        self.dashboards_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("dashboards"))
    }

    /// Get path to a single dashboard document
    pub fn dashboard_path(&self, id: Uuid) -> PathBuf {
        self.dashboards_dir().join(format!("{}.json", id))
    }

    /// Directory for user-uploaded thumbnails
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Directory for downloaded favicons and background images
    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }
}

/// The WarpDeck document store
pub struct FileStore {
    config: StoreConfig,
    /// Serializes read-modify-write cycles across both aggregates
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store, creating the directory layout and default settings
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.data_dir).await?;
        fs::create_dir_all(config.dashboards_dir()).await?;
        fs::create_dir_all(config.uploads_dir()).await?;
        fs::create_dir_all(config.images_dir()).await?;

        let store = Self {
            config,
            write_lock: Mutex::new(()),
        };

        if !fs::try_exists(store.config.settings_path()).await? {
            tracing::info!("No settings found, writing defaults");
            store.save_settings(&Settings::default()).await?;
        }

        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ============================================
    // Document primitives
    // ============================================

    /// Read the settings document. Missing or malformed files are errors.
    pub async fn load_settings(&self) -> StoreResult<Settings> {
        let content = fs::read_to_string(self.config.settings_path()).await?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub async fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        write_json_atomic(&self.config.settings_path(), settings).await
    }

    /// Load a dashboard by id; `None` when the file does not exist.
    ///
    /// Documents missing newer optional fields are back-filled and persisted.
    pub async fn load_dashboard(&self, id: Uuid) -> StoreResult<Option<Dashboard>> {
        match self.read_dashboard(id).await? {
            Some((_, true)) => {
                let _guard = self.write_lock.lock().await;
                self.load_dashboard_locked(id).await
            }
            Some((dashboard, false)) => Ok(Some(dashboard)),
            None => Ok(None),
        }
    }

    pub async fn save_dashboard(&self, dashboard: &Dashboard) -> StoreResult<()> {
        write_json_atomic(&self.config.dashboard_path(dashboard.id), dashboard).await
    }

    /// Remove a dashboard file; a missing file is not an error
    pub async fn delete_dashboard(&self, id: Uuid) -> StoreResult<()> {
        match fs::remove_file(self.config.dashboard_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive lookup through the settings index
    pub async fn get_dashboard_by_slug(&self, slug: &str) -> StoreResult<Option<Dashboard>> {
        let settings = self.load_settings().await?;
        match settings.find_by_slug(slug) {
            Some(summary) => self.load_dashboard(summary.id).await,
            None => Ok(None),
        }
    }

    /// Load every indexed dashboard in index order, skipping unreadable ones
    pub async fn get_all_dashboards(&self) -> StoreResult<Vec<Dashboard>> {
        let settings = self.load_settings().await?;
        let mut dashboards = Vec::with_capacity(settings.dashboards.len());

        for summary in &settings.dashboards {
            match self.load_dashboard(summary.id).await {
                Ok(Some(dashboard)) => dashboards.push(dashboard),
                Ok(None) => {
                    tracing::warn!(dashboard_id = %summary.id, slug = %summary.slug, "Indexed dashboard has no backing file");
                }
                Err(e) => {
                    tracing::warn!(dashboard_id = %summary.id, slug = %summary.slug, error = %e, "Failed to load dashboard");
                }
            }
        }

        Ok(dashboards)
    }

    /// Whether no indexed dashboard other than `exclude` uses `slug`
    pub async fn is_slug_unique(&self, slug: &str, exclude: Option<Uuid>) -> StoreResult<bool> {
        let settings = self.load_settings().await?;
        Ok(slug_is_free(&settings, slug, exclude))
    }

    // ============================================
    // Dashboard operations (settings + dashboard)
    // ============================================

    /// Create a dashboard; the slug must not be in use
    pub async fn create_dashboard(&self, input: NewDashboard) -> StoreResult<Dashboard> {
        validate_new_dashboard(&input)?;

        let _guard = self.write_lock.lock().await;
        let mut settings = self.load_settings().await?;

        if !slug_is_free(&settings, &input.slug, None) {
            return Err(StoreError::DuplicateSlug(input.slug));
        }

        let slug = input.slug.clone();
        let dashboard = input.into_dashboard(slug);
        self.save_dashboard(&dashboard).await?;

        settings.dashboards.push(DashboardSummary::of(&dashboard));
        self.save_settings(&settings).await?;

        tracing::info!(dashboard_id = %dashboard.id, slug = %dashboard.slug, "Created dashboard");
        Ok(dashboard)
    }

    /// Import a dashboard with fresh ids, suffixing the slug until it is unique
    pub async fn import_dashboard(&self, input: NewDashboard) -> StoreResult<Dashboard> {
        validate_new_dashboard(&input)?;

        let _guard = self.write_lock.lock().await;
        let mut settings = self.load_settings().await?;

        let slug = dedupe_slug(&settings, &input.slug);
        let dashboard = input.into_dashboard(slug);
        self.save_dashboard(&dashboard).await?;

        settings.dashboards.push(DashboardSummary::of(&dashboard));
        self.save_settings(&settings).await?;

        tracing::info!(dashboard_id = %dashboard.id, slug = %dashboard.slug, "Imported dashboard");
        Ok(dashboard)
    }

    /// Apply a partial update, keeping the settings summary in sync
    pub async fn update_dashboard(&self, slug: &str, patch: DashboardPatch) -> StoreResult<Dashboard> {
        validate_dashboard_patch(&patch)?;

        let _guard = self.write_lock.lock().await;
        let mut settings = self.load_settings().await?;
        let id = settings
            .find_by_slug(slug)
            .map(|s| s.id)
            .ok_or_else(|| StoreError::DashboardNotFound(slug.to_string()))?;

        let mut dashboard = self
            .load_dashboard_locked(id)
            .await?
            .ok_or_else(|| StoreError::DashboardNotFound(slug.to_string()))?;

        if let Some(new_slug) = &patch.slug {
            if !slug_is_free(&settings, new_slug, Some(id)) {
                return Err(StoreError::DuplicateSlug(new_slug.clone()));
            }
        }

        let old_slug = dashboard.slug.clone();
        let touches_index = patch.title.is_some() || patch.slug.is_some();

        patch.apply(&mut dashboard);
        self.save_dashboard(&dashboard).await?;

        if touches_index {
            if let Some(summary) = settings.find_by_id_mut(id) {
                summary.title = dashboard.title.clone();
                summary.slug = dashboard.slug.clone();
            }
            if slug_eq(&settings.default_dashboard_slug, &old_slug) {
                settings.default_dashboard_slug = dashboard.slug.clone();
            }
            if settings.repair_default() {
                tracing::info!(slug = %settings.default_dashboard_slug, "Re-pointed stale default dashboard");
            }
            self.save_settings(&settings).await?;
        }

        tracing::info!(dashboard_id = %id, slug = %dashboard.slug, "Updated dashboard");
        Ok(dashboard)
    }

    /// Delete a dashboard file and its summary, re-pointing the default if needed
    pub async fn delete_dashboard_by_slug(&self, slug: &str) -> StoreResult<DashboardSummary> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load_settings().await?;

        let summary = settings
            .find_by_slug(slug)
            .cloned()
            .ok_or_else(|| StoreError::DashboardNotFound(slug.to_string()))?;

        self.delete_dashboard(summary.id).await?;

        settings.dashboards.retain(|d| d.id != summary.id);
        if slug_eq(&settings.default_dashboard_slug, &summary.slug) {
            settings.default_dashboard_slug = settings
                .dashboards
                .first()
                .map(|d| d.slug.clone())
                .unwrap_or_default();
        }
        self.save_settings(&settings).await?;

        tracing::info!(dashboard_id = %summary.id, slug = %summary.slug, "Deleted dashboard");
        Ok(summary)
    }

    /// Rewrite the index order. Unknown and repeated ids are ignored;
    /// indexed ids missing from `ids` are dropped from the index.
    pub async fn reorder_dashboards(&self, ids: &[Uuid]) -> StoreResult<Vec<DashboardSummary>> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load_settings().await?;

        let mut reordered: Vec<DashboardSummary> = Vec::with_capacity(ids.len());
        for id in ids {
            if reordered.iter().any(|d| d.id == *id) {
                continue;
            }
            if let Some(summary) = settings.dashboards.iter().find(|d| d.id == *id) {
                reordered.push(summary.clone());
            }
        }

        let dropped = settings.dashboards.len() - reordered.len();
        if dropped > 0 {
            tracing::warn!(dropped, "Reorder omitted indexed dashboards; they are no longer listed");
        }

        settings.dashboards = reordered.clone();
        self.save_settings(&settings).await?;

        Ok(reordered)
    }

    /// Point a stale default slug at the first dashboard. Idempotent.
    pub async fn repair_default_slug(&self) -> StoreResult<RepairOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load_settings().await?;

        let old_slug = settings.default_dashboard_slug.clone();
        let repaired = settings.repair_default();
        if repaired {
            self.save_settings(&settings).await?;
            tracing::info!(old_slug = %old_slug, new_slug = %settings.default_dashboard_slug, "Repaired default dashboard slug");
        }

        Ok(RepairOutcome {
            repaired,
            old_slug,
            new_slug: settings.default_dashboard_slug,
        })
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> StoreResult<Settings> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load_settings().await?;

        if let Some(theme) = patch.default_theme {
            settings.default_theme = theme;
        }
        if let Some(slug) = patch.default_dashboard_slug {
            settings.default_dashboard_slug = slug;
        }
        if let Some(dashboards) = patch.dashboards {
            settings.dashboards = dashboards;
        }

        self.save_settings(&settings).await?;
        Ok(settings)
    }

    // ============================================
    // Link operations (dashboard document only)
    // ============================================

    /// Append a link; the caller resolves the favicon beforehand
    pub async fn add_link(&self, slug: &str, input: NewLink) -> StoreResult<Link> {
        validate_new_link(&input)?;

        let _guard = self.write_lock.lock().await;
        let mut dashboard = self.dashboard_for_update(slug).await?;

        let link = input.into_link();
        dashboard.links.push(link.clone());
        self.save_dashboard(&dashboard).await?;

        tracing::debug!(slug = %slug, link_id = %link.id, "Added link");
        Ok(link)
    }

    pub async fn update_link(&self, slug: &str, link_id: Uuid, patch: LinkPatch) -> StoreResult<Link> {
        validate_link_patch(&patch)?;

        let _guard = self.write_lock.lock().await;
        let mut dashboard = self.dashboard_for_update(slug).await?;

        let link = dashboard
            .link_mut(link_id)
            .ok_or_else(|| StoreError::LinkNotFound(link_id.to_string()))?;
        patch.apply(link);
        let updated = link.clone();

        self.save_dashboard(&dashboard).await?;
        Ok(updated)
    }

    pub async fn delete_link(&self, slug: &str, link_id: Uuid) -> StoreResult<Link> {
        let _guard = self.write_lock.lock().await;
        let mut dashboard = self.dashboard_for_update(slug).await?;

        let index = dashboard
            .links
            .iter()
            .position(|l| l.id == link_id)
            .ok_or_else(|| StoreError::LinkNotFound(link_id.to_string()))?;
        let removed = dashboard.links.remove(index);

        self.save_dashboard(&dashboard).await?;
        Ok(removed)
    }

    /// Record downloaded favicons on links that still exist and still lack
    /// a thumbnail. Links edited away in the meantime are skipped.
    pub async fn apply_favicons(&self, slug: &str, favicons: &[(Uuid, String)]) -> StoreResult<Dashboard> {
        let _guard = self.write_lock.lock().await;
        let mut dashboard = self.dashboard_for_update(slug).await?;

        let mut applied = 0usize;
        for (link_id, path) in favicons {
            if let Some(link) = dashboard.link_mut(*link_id) {
                if !link.has_thumbnail() {
                    link.favicon = Some(path.clone());
                    applied += 1;
                }
            }
        }

        if applied > 0 {
            self.save_dashboard(&dashboard).await?;
        }

        Ok(dashboard)
    }

    // ============================================
    // Internals
    // ============================================

    async fn dashboard_for_update(&self, slug: &str) -> StoreResult<Dashboard> {
        let settings = self.load_settings().await?;
        let id = settings
            .find_by_slug(slug)
            .map(|s| s.id)
            .ok_or_else(|| StoreError::DashboardNotFound(slug.to_string()))?;

        self.load_dashboard_locked(id)
            .await?
            .ok_or_else(|| StoreError::DashboardNotFound(slug.to_string()))
    }

    /// Load and persist any migration. Caller must hold the write lock.
    async fn load_dashboard_locked(&self, id: Uuid) -> StoreResult<Option<Dashboard>> {
        match self.read_dashboard(id).await? {
            Some((dashboard, migrated)) => {
                if migrated {
                    tracing::info!(dashboard_id = %id, "Migrated dashboard document");
                    self.save_dashboard(&dashboard).await?;
                }
                Ok(Some(dashboard))
            }
            None => Ok(None),
        }
    }

    /// Read a dashboard file without writing. The flag reports whether
    /// defaults had to be back-filled.
    async fn read_dashboard(&self, id: Uuid) -> StoreResult<Option<(Dashboard, bool)>> {
        let content = match fs::read_to_string(self.config.dashboard_path(id)).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut value: serde_json::Value = serde_json::from_str(&content)?;
        let migrated = backfill_defaults(&mut value);
        let dashboard = serde_json::from_value(value)?;

        Ok(Some((dashboard, migrated)))
    }
}

/// Insert defaults for keys older documents lack. Returns true if any were added.
fn backfill_defaults(value: &mut serde_json::Value) -> bool {
    let Some(object) = value.as_object_mut() else {
        return false;
    };

    let mut migrated = false;
    for (key, default) in MIGRATED_KEYS {
        if !object.contains_key(key) {
            object.insert(key.to_string(), serde_json::Value::Bool(default));
            migrated = true;
        }
    }
    migrated
}

fn slug_is_free(settings: &Settings, slug: &str, exclude: Option<Uuid>) -> bool {
    !settings
        .dashboards
        .iter()
        .any(|d| slug_eq(&d.slug, slug) && Some(d.id) != exclude)
}

/// `base`, then `base-1`, `base-2`, ... until unused
fn dedupe_slug(settings: &Settings, base: &str) -> String {
    if slug_is_free(settings, base, None) {
        return base.to_string();
    }

    (1u32..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| slug_is_free(settings, candidate, None))
        .unwrap_or_else(|| format!("{}-{}", base, Uuid::new_v4().simple()))
}

fn validate_slug(slug: &str) -> StoreResult<()> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "Invalid slug '{}': use letters, digits, '-', '_' or '.'",
            slug
        )))
    }
}

fn validate_new_dashboard(input: &NewDashboard) -> StoreResult<()> {
    if input.title.trim().is_empty() || input.slug.trim().is_empty() {
        return Err(StoreError::Validation("Title and slug are required".to_string()));
    }
    validate_slug(&input.slug)?;
    input.links.iter().try_for_each(validate_grid_columns_new)
}

fn validate_dashboard_patch(patch: &DashboardPatch) -> StoreResult<()> {
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return Err(StoreError::Validation("Title cannot be empty".to_string()));
        }
    }
    if let Some(slug) = &patch.slug {
        validate_slug(slug)?;
    }
    if let Some(links) = &patch.links {
        if links.iter().any(|l| l.grid_columns == 0) {
            return Err(grid_columns_error());
        }
    }
    Ok(())
}

fn validate_new_link(input: &NewLink) -> StoreResult<()> {
    if input.label.trim().is_empty() || input.url.trim().is_empty() {
        return Err(StoreError::Validation("Label and URL are required".to_string()));
    }
    validate_grid_columns_new(input)
}

fn validate_grid_columns_new(input: &NewLink) -> StoreResult<()> {
    if input.grid_columns == Some(0) {
        return Err(grid_columns_error());
    }
    Ok(())
}

fn validate_link_patch(patch: &LinkPatch) -> StoreResult<()> {
    if patch.label.as_deref().is_some_and(|l| l.trim().is_empty())
        || patch.url.as_deref().is_some_and(|u| u.trim().is_empty())
    {
        return Err(StoreError::Validation("Label and URL cannot be empty".to_string()));
    }
    if patch.grid_columns == Some(0) {
        return Err(grid_columns_error());
    }
    Ok(())
}

fn grid_columns_error() -> StoreError {
    StoreError::Validation("gridColumns must be at least 1".to_string())
}

/// Write JSON to a sibling temp file, then rename it over `path`
async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let content = serde_json::to_vec_pretty(value)?;
    let tmp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

    if let Err(e) = fs::write(&tmp_path, &content).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{CardSize, DashboardLayout, Theme};
    use tempfile::tempdir;

    async fn create_test_store() -> (FileStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = FileStore::open(StoreConfig::new(dir.path())).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_open_creates_layout_and_default_settings() {
        let (store, dir) = create_test_store().await;

        assert!(dir.path().join("dashboards").is_dir());
        assert!(dir.path().join("uploads").is_dir());
        assert!(dir.path().join("images").is_dir());

        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_open_keeps_existing_settings() {
        let dir = tempdir().unwrap();
        {
            let store = FileStore::open(StoreConfig::new(dir.path())).await.unwrap();
            store
                .update_settings(SettingsPatch {
                    default_theme: Some(Theme::Light),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let store = FileStore::open(StoreConfig::new(dir.path())).await.unwrap();
        assert_eq!(store.load_settings().await.unwrap().default_theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_malformed_settings_is_an_error() {
        let (store, dir) = create_test_store().await;
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();

        let err = store.load_settings().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_custom_dashboards_dir() {
        let dir = tempdir().unwrap();
        let boards = dir.path().join("elsewhere");
        let config = StoreConfig::new(dir.path().join("data")).with_dashboards_dir(&boards);
        let store = FileStore::open(config).await.unwrap();

        let dashboard = store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();
        assert!(boards.join(format!("{}.json", dashboard.id)).exists());
    }

    #[tokio::test]
    async fn test_create_and_lookup_by_slug() {
        let (store, _dir) = create_test_store().await;

        let created = store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();
        assert_eq!(created.layout, Some(DashboardLayout::default()));
        assert!(created.show_search_bar);

        let found = store.get_dashboard_by_slug("HOME").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings.dashboards, vec![DashboardSummary::of(&created)]);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug_case_insensitively() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        let err = store
            .create_dashboard(NewDashboard::new("Other", "HoMe"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(_)));
        assert_eq!(store.load_settings().await.unwrap().dashboards.len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_title_and_valid_slug() {
        let (store, _dir) = create_test_store().await;

        let err = store.create_dashboard(NewDashboard::new("", "x")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store
            .create_dashboard(NewDashboard::new("Bad", "a/b"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let (store, _dir) = create_test_store().await;
        let created = store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        assert!(store.load_dashboard(Uuid::new_v4()).await.unwrap().is_none());

        store.delete_dashboard(created.id).await.unwrap();
        assert!(store.get_dashboard_by_slug("home").await.unwrap().is_none());
        assert!(store.get_dashboard_by_slug("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_skips_unreadable_dashboards() {
        let (store, _dir) = create_test_store().await;
        let a = store.create_dashboard(NewDashboard::new("A", "a")).await.unwrap();
        let b = store.create_dashboard(NewDashboard::new("B", "b")).await.unwrap();
        let c = store.create_dashboard(NewDashboard::new("C", "c")).await.unwrap();

        std::fs::write(store.config().dashboard_path(b.id), "garbage").unwrap();
        store.delete_dashboard(c.id).await.unwrap();

        let all = store.get_all_dashboards().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, a.id);
    }

    #[tokio::test]
    async fn test_lazy_migration_backfills_and_persists() {
        let (store, _dir) = create_test_store().await;
        let id = Uuid::new_v4();
        let legacy = serde_json::json!({
            "id": id,
            "slug": "old",
            "title": "Old",
            "links": []
        });
        std::fs::write(store.config().dashboard_path(id), legacy.to_string()).unwrap();

        let loaded = store.load_dashboard(id).await.unwrap().unwrap();
        assert!(loaded.show_search_bar);
        assert!(!loaded.show_custom_background);

        let on_disk: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(store.config().dashboard_path(id)).unwrap(),
        )
        .unwrap();
        assert_eq!(on_disk["showSearchBar"], true);
        assert_eq!(on_disk["showCustomBackground"], false);
    }

    #[tokio::test]
    async fn test_is_slug_unique_with_exclusion() {
        let (store, _dir) = create_test_store().await;
        let home = store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        assert!(!store.is_slug_unique("Home", None).await.unwrap());
        assert!(store.is_slug_unique("Home", Some(home.id)).await.unwrap());
        assert!(store.is_slug_unique("work", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_updates_index_and_default() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();
        store
            .update_settings(SettingsPatch {
                default_dashboard_slug: Some("home".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = store
            .update_dashboard(
                "home",
                DashboardPatch {
                    title: Some("Start".to_string()),
                    slug: Some("start".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "start");

        assert!(store.get_dashboard_by_slug("home").await.unwrap().is_none());
        assert_eq!(
            store.get_dashboard_by_slug("start").await.unwrap().unwrap().title,
            "Start"
        );

        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings.dashboards[0].slug, "start");
        assert_eq!(settings.dashboards[0].title, "Start");
        assert_eq!(settings.default_dashboard_slug, "start");
    }

    #[tokio::test]
    async fn test_rename_to_taken_slug_fails() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();
        store.create_dashboard(NewDashboard::new("Work", "work")).await.unwrap();

        let err = store
            .update_dashboard(
                "work",
                DashboardPatch {
                    slug: Some("HOME".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(_)));

        // Renaming to a different case of its own slug is allowed
        let updated = store
            .update_dashboard(
                "work",
                DashboardPatch {
                    slug: Some("Work".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "Work");
    }

    #[tokio::test]
    async fn test_update_layout_only_leaves_index_untouched() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        let updated = store
            .update_dashboard(
                "home",
                DashboardPatch {
                    layout: Some(DashboardLayout {
                        columns: 6,
                        card_size: CardSize::Lg,
                        gutter: 8,
                    }),
                    show_search_bar: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.layout.unwrap().columns, 6);
        assert!(!updated.show_search_bar);
        assert_eq!(store.load_settings().await.unwrap().dashboards[0].title, "Home");
    }

    #[tokio::test]
    async fn test_delete_default_reassigns_to_remaining() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();
        store.create_dashboard(NewDashboard::new("Work", "work")).await.unwrap();
        store
            .update_settings(SettingsPatch {
                default_dashboard_slug: Some("home".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        store.delete_dashboard_by_slug("home").await.unwrap();
        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings.default_dashboard_slug, "work");
        assert_eq!(settings.dashboards.len(), 1);

        store.delete_dashboard_by_slug("work").await.unwrap();
        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings.default_dashboard_slug, "");
        assert!(settings.dashboards.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let (store, _dir) = create_test_store().await;
        let home = store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        store.delete_dashboard_by_slug("home").await.unwrap();
        assert!(!store.config().dashboard_path(home.id).exists());

        let err = store.delete_dashboard_by_slug("home").await.unwrap_err();
        assert!(matches!(err, StoreError::DashboardNotFound(_)));
    }

    #[tokio::test]
    async fn test_reorder_and_drop_omitted() {
        let (store, _dir) = create_test_store().await;
        let a = store.create_dashboard(NewDashboard::new("A", "a")).await.unwrap();
        let b = store.create_dashboard(NewDashboard::new("B", "b")).await.unwrap();
        let c = store.create_dashboard(NewDashboard::new("C", "c")).await.unwrap();

        store.reorder_dashboards(&[c.id, a.id, b.id]).await.unwrap();
        let order: Vec<_> = store
            .get_all_dashboards()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.slug)
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        let kept = store
            .reorder_dashboards(&[b.id, Uuid::new_v4(), b.id, a.id])
            .await
            .unwrap();
        assert_eq!(kept.iter().map(|d| d.id).collect::<Vec<_>>(), vec![b.id, a.id]);
        assert_eq!(store.get_all_dashboards().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_repair_is_idempotent() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("A", "a")).await.unwrap();
        store
            .update_settings(SettingsPatch {
                default_dashboard_slug: Some("stale".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let first = store.repair_default_slug().await.unwrap();
        assert!(first.repaired);
        assert_eq!(first.old_slug, "stale");
        assert_eq!(first.new_slug, "a");

        let second = store.repair_default_slug().await.unwrap();
        assert!(!second.repaired);
        assert_eq!(second.new_slug, "a");
    }

    #[tokio::test]
    async fn test_import_dedupes_slug_and_assigns_new_ids() {
        let (store, _dir) = create_test_store().await;
        let original = store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        let mut input = NewDashboard::new("Home", "home");
        input.links.push(NewLink::new("Rust", "https://rust-lang.org"));

        let first = store.import_dashboard(input.clone()).await.unwrap();
        let second = store.import_dashboard(input).await.unwrap();

        assert_eq!(first.slug, "home-1");
        assert_eq!(second.slug, "home-2");
        assert_ne!(first.id, original.id);
        assert_ne!(first.links[0].id, second.links[0].id);
        assert_eq!(first.links[0].label, "Rust");
    }

    #[tokio::test]
    async fn test_link_lifecycle() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        let link = store
            .add_link("home", NewLink::new("Rust", "https://rust-lang.org"))
            .await
            .unwrap();
        assert_eq!(link.grid_columns, 1);

        let updated = store
            .update_link(
                "home",
                link.id,
                LinkPatch {
                    label: Some("Rust Lang".to_string()),
                    open_in_new_tab: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.label, "Rust Lang");
        assert!(updated.open_in_new_tab);

        let dashboard = store.get_dashboard_by_slug("home").await.unwrap().unwrap();
        assert_eq!(dashboard.links, vec![updated.clone()]);

        store.delete_link("home", link.id).await.unwrap();
        let err = store.delete_link("home", link.id).await.unwrap_err();
        assert!(matches!(err, StoreError::LinkNotFound(_)));
    }

    #[tokio::test]
    async fn test_link_validation() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        let err = store.add_link("home", NewLink::new("", "https://x.example")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let mut wide = NewLink::new("Zero", "https://x.example");
        wide.grid_columns = Some(0);
        let err = store.add_link("home", wide).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store
            .add_link("nope", NewLink::new("a", "https://x.example"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DashboardNotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_favicons_skips_thumbnailed_and_removed_links() {
        let (store, _dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        let plain = store
            .add_link("home", NewLink::new("Plain", "https://a.example"))
            .await
            .unwrap();
        let mut with_thumb = NewLink::new("Thumb", "https://b.example");
        with_thumb.thumbnail = Some("/api/uploads/t.png".to_string());
        let thumbed = store.add_link("home", with_thumb).await.unwrap();

        let dashboard = store
            .apply_favicons(
                "home",
                &[
                    (plain.id, "images/a.ico".to_string()),
                    (thumbed.id, "images/b.ico".to_string()),
                    (Uuid::new_v4(), "images/c.ico".to_string()),
                ],
            )
            .await
            .unwrap();

        assert_eq!(dashboard.link(plain.id).unwrap().favicon.as_deref(), Some("images/a.ico"));
        assert!(dashboard.link(thumbed.id).unwrap().favicon.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_index_consistent() {
        let (store, _dir) = create_test_store().await;
        let store = std::sync::Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create_dashboard(NewDashboard::new(format!("D{}", i), format!("d{}", i)))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings.dashboards.len(), 16);
        assert_eq!(store.get_all_dashboards().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_temp_files() {
        let (store, dir) = create_test_store().await;
        store.create_dashboard(NewDashboard::new("Home", "home")).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .chain(std::fs::read_dir(dir.path().join("dashboards")).unwrap())
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
