//! Core document types for WarpDeck
//!
//! Two aggregates live on disk:
//! - [`Settings`]: the singleton global document, including the ordered
//!   index of dashboard summaries
//! - [`Dashboard`]: one document per dashboard, embedding its [`Link`]s
//!
//! Field names are camelCase both on disk and on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Color theme applied to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Entry of the dashboard index kept in [`Settings`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

impl DashboardSummary {
    pub fn of(dashboard: &Dashboard) -> Self {
        Self {
            id: dashboard.id,
            slug: dashboard.slug.clone(),
            title: dashboard.title.clone(),
        }
    }
}

/// Global settings document (`settings.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub default_theme: Theme,
    /// May be stale; see [`Settings::default_is_valid`]
    #[serde(default)]
    pub default_dashboard_slug: String,
    /// Ordered index of dashboards
    #[serde(default)]
    pub dashboards: Vec<DashboardSummary>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_theme: Theme::Dark,
            default_dashboard_slug: String::new(),
            dashboards: Vec::new(),
        }
    }
}

impl Settings {
    /// Case-insensitive lookup of a summary by slug
    pub fn find_by_slug(&self, slug: &str) -> Option<&DashboardSummary> {
        self.dashboards.iter().find(|d| slug_eq(&d.slug, slug))
    }

    pub fn find_by_id_mut(&mut self, id: Uuid) -> Option<&mut DashboardSummary> {
        self.dashboards.iter_mut().find(|d| d.id == id)
    }

    /// Whether the default slug points at an indexed dashboard
    pub fn default_is_valid(&self) -> bool {
        self.find_by_slug(&self.default_dashboard_slug).is_some()
    }

    /// Re-point a stale default slug at the first dashboard, or clear it
    /// when the index is empty. Returns true if the default changed.
    pub fn repair_default(&mut self) -> bool {
        if self.default_is_valid() {
            return false;
        }

        let replacement = self
            .dashboards
            .first()
            .map(|d| d.slug.clone())
            .unwrap_or_default();

        if replacement == self.default_dashboard_slug {
            return false;
        }

        self.default_dashboard_slug = replacement;
        true
    }
}

/// Card size used by the grid layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Sm,
    #[default]
    Md,
    Lg,
}

/// Grid layout preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub columns: u32,
    pub card_size: CardSize,
    pub gutter: u32,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            card_size: CardSize::Md,
            gutter: 12,
        }
    }
}

/// Search engine used by the dashboard search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Duckduckgo,
    Bing,
}

impl SearchEngine {
    /// Query URL prefix; the encoded search terms are appended
    pub fn query_prefix(&self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Duckduckgo => "https://duckduckgo.com/?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub open_in_new_tab: bool,
    pub search_engine: SearchEngine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Color,
    Image,
}

/// Custom dashboard background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    #[serde(rename = "type")]
    pub kind: BackgroundType,
    /// Hex color or image URL, depending on `kind`
    pub value: String,
    /// Header text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// A dashboard document (`dashboards/<id>.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<DashboardLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_config: Option<SearchConfig>,
    #[serde(default = "default_true")]
    pub show_search_bar: bool,
    #[serde(default)]
    pub show_custom_background: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_config: Option<BackgroundConfig>,
}

fn default_true() -> bool {
    true
}

impl Dashboard {
    /// A fresh, empty dashboard with the default layout
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            title: title.into(),
            links: Vec::new(),
            layout: Some(DashboardLayout::default()),
            search_config: None,
            show_search_bar: true,
            show_custom_background: false,
            background_config: None,
        }
    }

    pub fn link(&self, id: Uuid) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn link_mut(&mut self, id: Uuid) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.id == id)
    }
}

/// A single bookmark on a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: Uuid,
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Legacy icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Legacy accent color, used as the border color when `color_bar` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Uploaded image URL; wins over `favicon`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Downloaded icon, relative to the data directory (`images/<file>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_bar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default)]
    pub open_in_new_tab: bool,
    #[serde(default = "default_grid_columns")]
    pub grid_columns: u32,
}

fn default_grid_columns() -> u32 {
    1
}

impl Link {
    /// Image to render for this link: thumbnail first, then favicon
    pub fn image(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.favicon.as_deref().filter(|f| !f.is_empty()))
    }

    /// Left border color, falling back to the legacy `color`
    pub fn border_color(&self) -> Option<&str> {
        self.color_bar.as_deref().or(self.color.as_deref())
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Link fields supplied by a caller; ids are always assigned by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub color_bar: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub open_in_new_tab: Option<bool>,
    #[serde(default)]
    pub grid_columns: Option<u32>,
}

impl NewLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Assign a fresh id, normalizing empty optional strings to `None`
    pub fn into_link(self) -> Link {
        Link {
            id: Uuid::new_v4(),
            label: self.label,
            url: self.url,
            description: non_empty(self.description),
            icon: non_empty(self.icon),
            color: non_empty(self.color),
            thumbnail: non_empty(self.thumbnail),
            favicon: non_empty(self.favicon),
            color_bar: non_empty(self.color_bar),
            background_color: non_empty(self.background_color),
            text_color: non_empty(self.text_color),
            open_in_new_tab: self.open_in_new_tab.unwrap_or(false),
            grid_columns: self.grid_columns.unwrap_or(1),
        }
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Partial link update. `Some("")` clears an optional string field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    pub label: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub thumbnail: Option<String>,
    pub color_bar: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub open_in_new_tab: Option<bool>,
    pub grid_columns: Option<u32>,
}

impl LinkPatch {
    /// True when the patch explicitly removes the thumbnail
    pub fn clears_thumbnail(&self) -> bool {
        self.thumbnail.as_deref() == Some("")
    }

    pub fn apply(self, link: &mut Link) {
        if let Some(label) = self.label {
            link.label = label;
        }
        if let Some(url) = self.url {
            link.url = url;
        }
        merge_optional(&mut link.description, self.description);
        merge_optional(&mut link.icon, self.icon);
        merge_optional(&mut link.color, self.color);
        merge_optional(&mut link.thumbnail, self.thumbnail);
        merge_optional(&mut link.color_bar, self.color_bar);
        merge_optional(&mut link.background_color, self.background_color);
        merge_optional(&mut link.text_color, self.text_color);
        if let Some(open) = self.open_in_new_tab {
            link.open_in_new_tab = open;
        }
        if let Some(columns) = self.grid_columns {
            link.grid_columns = columns;
        }
    }
}

/// Partial dashboard update; `links` replaces the whole list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub links: Option<Vec<Link>>,
    pub layout: Option<DashboardLayout>,
    pub search_config: Option<SearchConfig>,
    pub show_search_bar: Option<bool>,
    pub show_custom_background: Option<bool>,
    pub background_config: Option<BackgroundConfig>,
}

impl DashboardPatch {
    pub fn apply(self, dashboard: &mut Dashboard) {
        if let Some(title) = self.title {
            dashboard.title = title;
        }
        if let Some(slug) = self.slug {
            dashboard.slug = slug;
        }
        if let Some(links) = self.links {
            dashboard.links = links;
        }
        if let Some(layout) = self.layout {
            dashboard.layout = Some(layout);
        }
        if let Some(search_config) = self.search_config {
            dashboard.search_config = Some(search_config);
        }
        if let Some(show) = self.show_search_bar {
            dashboard.show_search_bar = show;
        }
        if let Some(show) = self.show_custom_background {
            dashboard.show_custom_background = show;
        }
        if let Some(background) = self.background_config {
            dashboard.background_config = Some(background);
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub default_theme: Option<Theme>,
    pub default_dashboard_slug: Option<String>,
    pub dashboards: Option<Vec<DashboardSummary>>,
}

/// A dashboard as submitted for creation or import; incoming ids are discarded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDashboard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub links: Vec<NewLink>,
    #[serde(default)]
    pub layout: Option<DashboardLayout>,
    #[serde(default)]
    pub search_config: Option<SearchConfig>,
    #[serde(default)]
    pub show_search_bar: Option<bool>,
    #[serde(default)]
    pub show_custom_background: Option<bool>,
    #[serde(default)]
    pub background_config: Option<BackgroundConfig>,
}

impl NewDashboard {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            ..Default::default()
        }
    }

    /// Build the stored document under `slug`, assigning fresh ids
    pub fn into_dashboard(self, slug: String) -> Dashboard {
        Dashboard {
            id: Uuid::new_v4(),
            slug,
            title: self.title,
            links: self.links.into_iter().map(NewLink::into_link).collect(),
            layout: Some(self.layout.unwrap_or_default()),
            search_config: self.search_config,
            show_search_bar: self.show_search_bar.unwrap_or(true),
            show_custom_background: self.show_custom_background.unwrap_or(false),
            background_config: self.background_config,
        }
    }
}

impl From<Dashboard> for NewDashboard {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            title: dashboard.title,
            slug: dashboard.slug,
            links: dashboard.links.into_iter().map(NewLink::from).collect(),
            layout: dashboard.layout,
            search_config: dashboard.search_config,
            show_search_bar: Some(dashboard.show_search_bar),
            show_custom_background: Some(dashboard.show_custom_background),
            background_config: dashboard.background_config,
        }
    }
}

impl From<Link> for NewLink {
    fn from(link: Link) -> Self {
        Self {
            label: link.label,
            url: link.url,
            description: link.description,
            icon: link.icon,
            color: link.color,
            thumbnail: link.thumbnail,
            favicon: link.favicon,
            color_bar: link.color_bar,
            background_color: link.background_color,
            text_color: link.text_color,
            open_in_new_tab: Some(link.open_in_new_tab),
            grid_columns: Some(link.grid_columns),
        }
    }
}

/// Result of a default-slug repair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairOutcome {
    pub repaired: bool,
    pub old_slug: String,
    pub new_slug: String,
}

/// Case-insensitive slug comparison
pub fn slug_eq(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Names taken by fixed routes next to `/dashboards/:slug` and `/:slug`
pub const RESERVED_SLUGS: [&str; 4] = ["import", "reorder", "repair", "settings"];

/// Slugs are URL path segments: alphanumerics plus `-`, `_` and `.`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !RESERVED_SLUGS.iter().any(|r| slug_eq(r, slug))
        && slug
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn merge_optional(target: &mut Option<String>, update: Option<String>) {
    match update {
        None => {}
        Some(v) if v.is_empty() => *target = None,
        Some(v) => *target = Some(v),
    }
}
