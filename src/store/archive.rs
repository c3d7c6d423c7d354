//! Export archives
//!
//! An export is a zip holding `settings.json` plus `dashboards/<id>.json`
//! for every readable dashboard. Importing an archive re-creates each
//! dashboard with import semantics (fresh ids, de-duplicated slugs).

use crate::store::engine::FileStore;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{Dashboard, NewDashboard, Settings, SettingsPatch};
use serde::Serialize;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const SETTINGS_ENTRY: &str = "settings.json";
const DASHBOARDS_PREFIX: &str = "dashboards/";

/// Contents recovered from an export archive
#[derive(Debug, Default)]
pub struct ExportBundle {
    pub settings: Option<Settings>,
    pub dashboards: Vec<NewDashboard>,
    /// Dashboard entries that could not be parsed
    pub skipped: Vec<String>,
}

/// Outcome of importing an archive into the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    pub slugs: Vec<String>,
}

/// Serialize settings and dashboards into an in-memory zip
pub fn build_export(settings: &Settings, dashboards: &[Dashboard]) -> StoreResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file(SETTINGS_ENTRY, options)?;
    writer.write_all(&serde_json::to_vec_pretty(settings)?)?;

    for dashboard in dashboards {
        writer.start_file(format!("{}{}.json", DASHBOARDS_PREFIX, dashboard.id), options)?;
        writer.write_all(&serde_json::to_vec_pretty(dashboard)?)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Largest entry accepted when reading an archive
pub const MAX_ENTRY_BYTES: u64 = 10 * 1024 * 1024;

/// Largest total of decompressed entries accepted from one archive
pub const MAX_ARCHIVE_BYTES: u64 = 64 * 1024 * 1024;

/// Parse an export zip. Unreadable dashboard entries are skipped, not fatal;
/// entries other than settings and dashboards are ignored unread.
pub fn read_export(data: &[u8]) -> StoreResult<ExportBundle> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut bundle = ExportBundle::default();
    let mut total: u64 = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let is_settings = name == SETTINGS_ENTRY;
        let is_dashboard = name.starts_with(DASHBOARDS_PREFIX) && name.ends_with(".json");
        if !is_settings && !is_dashboard {
            continue;
        }

        let content = read_entry(&mut file, &name, &mut total)?;

        if is_settings {
            let settings: Settings = std::str::from_utf8(&content)
                .map_err(|e| e.to_string())
                .and_then(|text| serde_json::from_str(text).map_err(|e| e.to_string()))
                .map_err(|e| StoreError::Archive(format!("Invalid {}: {}", SETTINGS_ENTRY, e)))?;
            bundle.settings = Some(settings);
            continue;
        }

        let parsed = std::str::from_utf8(&content)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<NewDashboard>(text).map_err(|e| e.to_string()));
        match parsed {
            Ok(dashboard) => bundle.dashboards.push(dashboard),
            Err(e) => {
                tracing::warn!(entry = %name, error = %e, "Skipping unreadable dashboard entry");
                bundle.skipped.push(name);
            }
        }
    }

    if bundle.settings.is_none() && bundle.dashboards.is_empty() && bundle.skipped.is_empty() {
        return Err(StoreError::Archive(
            "Archive contains no settings or dashboards".to_string(),
        ));
    }

    Ok(bundle)
}

/// Read one entry, bounded by the per-entry and whole-archive limits
fn read_entry(file: &mut impl Read, name: &str, total: &mut u64) -> StoreResult<Vec<u8>> {
    let mut content = Vec::new();
    Read::take(&mut *file, MAX_ENTRY_BYTES + 1)
        .read_to_end(&mut content)
        .map_err(|e| StoreError::Archive(format!("Cannot read {}: {}", name, e)))?;

    let len = content.len() as u64;
    if len > MAX_ENTRY_BYTES {
        return Err(StoreError::Archive(format!("Entry {} is too large", name)));
    }

    *total += len;
    if *total > MAX_ARCHIVE_BYTES {
        return Err(StoreError::Archive("Archive is too large".to_string()));
    }

    Ok(content)
}

impl FileStore {
    /// Export the current settings and every readable dashboard
    pub async fn export_archive(&self) -> StoreResult<Vec<u8>> {
        let settings = self.load_settings().await?;
        let dashboards = self.get_all_dashboards().await?;
        build_export(&settings, &dashboards)
    }

    /// Import every dashboard in an export archive and adopt its theme.
    ///
    /// The archive's dashboard index and default slug are not applied;
    /// imported dashboards get new ids and possibly new slugs.
    pub async fn import_archive(&self, data: &[u8]) -> StoreResult<ImportReport> {
        let bundle = read_export(data)?;
        let mut report = ImportReport {
            failed: bundle.skipped.len(),
            ..Default::default()
        };

        for dashboard in bundle.dashboards {
            let title = dashboard.title.clone();
            match self.import_dashboard(dashboard).await {
                Ok(imported) => {
                    report.imported += 1;
                    report.slugs.push(imported.slug);
                }
                Err(e) => {
                    tracing::warn!(title = %title, error = %e, "Failed to import dashboard from archive");
                    report.failed += 1;
                }
            }
        }

        if let Some(settings) = bundle.settings {
            self.update_settings(SettingsPatch {
                default_theme: Some(settings.default_theme),
                ..Default::default()
            })
            .await?;
        }

        tracing::info!(imported = report.imported, failed = report.failed, "Imported archive");
        Ok(report)
    }
}
