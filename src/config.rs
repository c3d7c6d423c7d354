//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::favicon::{FetcherConfig, IconStrategy, DEFAULT_PROXY_TEMPLATE};
use crate::store::StoreConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub favicon: FaviconConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data directory layout
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Defaults to `<data_dir>/dashboards`
    #[serde(default)]
    pub dashboards_dir: Option<String>,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            dashboards_dir: None,
        }
    }
}

impl StorageConfig {
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(&self.data_dir);
        match &self.dashboards_dir {
            Some(dir) => config.with_dashboards_dir(dir),
            None => config,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built client bundle served for non-API paths
    #[serde(default = "default_client_dir")]
    pub client_dir: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8089
}

fn default_client_dir() -> String {
    "./warpdeck-ui/dist".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_dir: default_client_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Favicon acquisition configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FaviconConfig {
    #[serde(default = "default_favicon_enabled")]
    pub enabled: bool,

    /// Tried in order until one yields an icon
    #[serde(default = "IconStrategy::default_order")]
    pub strategies: Vec<IconStrategy>,

    #[serde(default = "default_proxy_template")]
    pub proxy_template: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
}

fn default_favicon_enabled() -> bool {
    true
}

fn default_proxy_template() -> String {
    DEFAULT_PROXY_TEMPLATE.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_page_timeout() -> u64 {
    5
}

fn default_max_redirects() -> u32 {
    3
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            enabled: default_favicon_enabled(),
            strategies: IconStrategy::default_order(),
            proxy_template: default_proxy_template(),
            request_timeout_secs: default_request_timeout(),
            page_timeout_secs: default_page_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl FaviconConfig {
    pub fn fetcher_config(&self, images_dir: PathBuf) -> FetcherConfig {
        FetcherConfig {
            enabled: self.enabled,
            images_dir,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            max_redirects: self.max_redirects,
            strategies: self.strategies.clone(),
            proxy_template: self.proxy_template.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("warpdeck").join("config.toml")),
            Some(PathBuf::from("/etc/warpdeck/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. For each setting the first variable
    /// present wins; unprefixed names are accepted for older deployments.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k));

        // Storage overrides
        if let Some(data_dir) = first(&["WARPDECK_DATA_DIR", "DATA_DIR"]) {
            self.storage.data_dir = data_dir;
        }
        if let Some(dir) = first(&["WARPDECK_DASHBOARDS_DIR", "DASHBOARDS_DIR"]) {
            self.storage.dashboards_dir = Some(dir);
        }

        // API overrides
        if let Some(host) = first(&["WARPDECK_HOST"]) {
            self.api.host = host;
        }
        if let Some(port) = first(&["WARPDECK_PORT", "PORT"]) {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid port override"),
            }
        }
        if let Some(dir) = first(&["WARPDECK_CLIENT_DIR"]) {
            self.api.client_dir = dir;
        }

        // Favicon overrides
        if let Some(enabled) = first(&["WARPDECK_FAVICON_ENABLED"]) {
            self.favicon.enabled = matches!(enabled.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(list) = first(&["WARPDECK_FAVICON_STRATEGIES"]) {
            match list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse)
                .collect::<Result<Vec<IconStrategy>, _>>()
            {
                Ok(strategies) => self.favicon.strategies = strategies,
                Err(e) => tracing::warn!(value = %list, error = %e, "Ignoring invalid favicon strategies"),
            }
        }

        // Logging overrides
        if let Some(level) = first(&["WARPDECK_LOG_LEVEL"]) {
            self.logging.level = level;
        }
        if let Some(format) = first(&["WARPDECK_LOG_FORMAT"]) {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# WarpDeck Configuration
#
# Environment variables override these settings:
# - WARPDECK_DATA_DIR (or DATA_DIR)
# - WARPDECK_DASHBOARDS_DIR (or DASHBOARDS_DIR)
# - WARPDECK_HOST
# - WARPDECK_PORT (or PORT)
# - WARPDECK_CLIENT_DIR
# - WARPDECK_FAVICON_ENABLED
# - WARPDECK_FAVICON_STRATEGIES (comma separated)
# - WARPDECK_LOG_LEVEL
# - WARPDECK_LOG_FORMAT

[storage]
# Root directory for settings, dashboards, uploads and images
data_dir = "./data"

# Dashboard documents (defaults to <data_dir>/dashboards)
# dashboards_dir = "./data/dashboards"

[api]
# Server host
host = "0.0.0.0"

# Server port
port = 8089

# Built browser client
client_dir = "./warpdeck-ui/dist"

# Maximum upload size in bytes
max_upload_bytes = 10485760

[favicon]
# Download icons for new links
enabled = true

# Lookup order: html, proxy, conventional
strategies = ["html", "proxy", "conventional"]

# Icon proxy, {host} is replaced with the link's hostname
proxy_template = "https://icons.duckduckgo.com/ip3/{host}.ico"

# Timeout per icon download (seconds)
request_timeout_secs = 10

# Timeout when reading a page for <link rel="icon"> (seconds)
page_timeout_secs = 5

# Redirect hops followed per candidate
max_redirects = 3

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.data_dir, "./data");
        assert_eq!(config.api.port, 8089);
        assert_eq!(config.api.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.favicon.strategies, IconStrategy::default_order());
        assert_eq!(config.favicon.max_redirects, 3);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.storage.data_dir, defaults.storage.data_dir);
        assert_eq!(config.api.port, defaults.api.port);
        assert_eq!(config.api.client_dir, defaults.api.client_dir);
        assert_eq!(config.favicon.strategies, defaults.favicon.strategies);
        assert_eq!(config.favicon.proxy_template, defaults.favicon.proxy_template);
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [api]
            port = 9000

            [favicon]
            strategies = ["proxy", "conventional"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(
            config.favicon.strategies,
            vec![IconStrategy::Proxy, IconStrategy::Conventional]
        );
        assert!(config.favicon.enabled);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides_prefer_prefixed_names() {
        let env: HashMap<&str, &str> = [
            ("WARPDECK_DATA_DIR", "/srv/warpdeck"),
            ("DATA_DIR", "/ignored"),
            ("DASHBOARDS_DIR", "/srv/boards"),
            ("PORT", "3001"),
            ("WARPDECK_FAVICON_ENABLED", "false"),
            ("WARPDECK_FAVICON_STRATEGIES", "conventional, html"),
            ("WARPDECK_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/srv/warpdeck");
        assert_eq!(config.storage.dashboards_dir.as_deref(), Some("/srv/boards"));
        assert_eq!(config.api.port, 3001);
        assert!(!config.favicon.enabled);
        assert_eq!(
            config.favicon.strategies,
            vec![IconStrategy::Conventional, IconStrategy::Html]
        );
        assert_eq!(config.logging.format, "json");

        let store = config.storage.store_config();
        assert_eq!(store.dashboards_dir(), PathBuf::from("/srv/boards"));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "WARPDECK_PORT" => Some("not-a-port".to_string()),
            "WARPDECK_FAVICON_STRATEGIES" => Some("html,bogus".to_string()),
            _ => None,
        });

        assert_eq!(config.api.port, 8089);
        assert_eq!(config.favicon.strategies, IconStrategy::default_order());
    }
}
