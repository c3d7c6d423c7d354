//! Client-side copies of the API documents

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub default_theme: Theme,
    #[serde(default)]
    pub default_dashboard_slug: String,
    #[serde(default)]
    pub dashboards: Vec<DashboardSummary>,
}

impl Settings {
    /// Slug to open at `/`: the default if it still exists, else the first dashboard
    pub fn landing_slug(&self) -> Option<String> {
        self.dashboards
            .iter()
            .find(|d| d.slug.eq_ignore_ascii_case(&self.default_dashboard_slug))
            .or_else(|| self.dashboards.first())
            .map(|d| d.slug.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl CardSize {
    /// Minimum card width in pixels
    pub fn min_width(self) -> u32 {
        match self {
            CardSize::Sm => 200,
            CardSize::Md => 250,
            CardSize::Lg => 300,
        }
    }

    /// Icon box size in pixels
    pub fn icon_size(self) -> u32 {
        match self {
            CardSize::Sm => 32,
            CardSize::Md => 40,
            CardSize::Lg => 48,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
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

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Duckduckgo,
    Bing,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 3] = [SearchEngine::Google, SearchEngine::Duckduckgo, SearchEngine::Bing];

    pub fn query_url(self, terms: &str) -> String {
        let prefix = match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Duckduckgo => "https://duckduckgo.com/?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
        };
        format!("{}{}", prefix, urlencoding::encode(terms))
    }

    pub fn name(self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::Duckduckgo => "DuckDuckGo",
            SearchEngine::Bing => "Bing",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Duckduckgo => "duckduckgo",
            SearchEngine::Bing => "bing",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub open_in_new_tab: bool,
    pub search_engine: SearchEngine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Color,
    Image,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    #[serde(rename = "type")]
    pub kind: BackgroundType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl BackgroundConfig {
    /// Inline CSS for the page background
    pub fn style(&self) -> String {
        match self.kind {
            BackgroundType::Color => format!("background-color: {};", self.value),
            BackgroundType::Image => format!(
                "background-image: url('{}'); background-size: cover; background-position: center; background-attachment: fixed;",
                self.value
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
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
    pub fn layout(&self) -> DashboardLayout {
        self.layout.clone().unwrap_or_default()
    }

    /// Background to render, if enabled and configured
    pub fn background(&self) -> Option<&BackgroundConfig> {
        self.background_config
            .as_ref()
            .filter(|b| self.show_custom_background && !b.value.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
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
    #[serde(default = "default_columns")]
    pub grid_columns: u32,
}

fn default_columns() -> u32 {
    1
}

impl Link {
    /// Image URL for the card: the thumbnail wins over the favicon
    pub fn image_url(&self) -> Option<String> {
        match (non_empty(&self.thumbnail), non_empty(&self.favicon)) {
            (Some(thumbnail), _) => Some(thumbnail.to_string()),
            (None, Some(favicon)) => Some(format!("/api/{}", favicon)),
            (None, None) => None,
        }
    }

    pub fn border_color(&self) -> Option<&str> {
        non_empty(&self.color_bar).or_else(|| non_empty(&self.color))
    }

    /// First letter of the label, shown when there is no image
    pub fn initial(&self) -> String {
        self.label
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Link fields submitted by the editor
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInput {
    pub label: String,
    pub url: String,
    pub description: String,
    pub thumbnail: String,
    pub color_bar: String,
    pub background_color: String,
    pub text_color: String,
    pub open_in_new_tab: bool,
    pub grid_columns: u32,
}

impl From<&Link> for LinkInput {
    fn from(link: &Link) -> Self {
        Self {
            label: link.label.clone(),
            url: link.url.clone(),
            description: link.description.clone().unwrap_or_default(),
            thumbnail: link.thumbnail.clone().unwrap_or_default(),
            color_bar: link.color_bar.clone().unwrap_or_default(),
            background_color: link.background_color.clone().unwrap_or_default(),
            text_color: link.text_color.clone().unwrap_or_default(),
            open_in_new_tab: link.open_in_new_tab,
            grid_columns: link.grid_columns.max(1),
        }
    }
}
