//! Favicon Acquisition
//!
//! Best-effort lookup of a small icon for a link destination:
//!
//! - **sources**: Candidate producers (HTML `<link>`, icon proxy, conventional paths)
//! - **html**: `<link rel="icon">` extraction
//! - **download**: Single-candidate download with bounded redirects
//!
//! ```text
//! target URL → [source 1] → candidates → download → first success wins
//!            → [source 2] → ...
//!            → None ("no favicon", never an error for the caller)
//! ```

mod download;
mod html;
mod sources;

pub use download::{extension_for, FaviconError, IconDownloader, USER_AGENT};
pub use html::{extract_icon_href, resolve_icon_url};
pub use sources::{
    ConventionalPathSource, HtmlLinkSource, IconSource, IconStrategy, ProxySource,
    CONVENTIONAL_PATHS, DEFAULT_PROXY_TEMPLATE, MAX_PAGE_BYTES,
};

use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for [`FaviconFetcher`]
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub enabled: bool,
    /// Directory icons are written to (`<data_dir>/images`)
    pub images_dir: PathBuf,
    /// Per-request timeout for icon downloads
    pub request_timeout: Duration,
    /// Timeout for fetching the destination page
    pub page_timeout: Duration,
    /// Redirect hops followed per candidate
    pub max_redirects: u32,
    pub strategies: Vec<IconStrategy>,
    pub proxy_template: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            images_dir: PathBuf::from("data/images"),
            request_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(5),
            max_redirects: 3,
            strategies: IconStrategy::default_order(),
            proxy_template: DEFAULT_PROXY_TEMPLATE.to_string(),
        }
    }
}

/// Ordered chain of icon sources backed by one downloader
pub struct FaviconFetcher {
    enabled: bool,
    sources: Vec<Box<dyn IconSource>>,
    downloader: IconDownloader,
}

impl FaviconFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, FaviconError> {
        let mut sources: Vec<Box<dyn IconSource>> = Vec::with_capacity(config.strategies.len());
        for strategy in &config.strategies {
            let source: Box<dyn IconSource> = match strategy {
                IconStrategy::Html => Box::new(HtmlLinkSource::new(config.page_timeout, USER_AGENT)?),
                IconStrategy::Proxy => Box::new(ProxySource::new(config.proxy_template.clone())),
                IconStrategy::Conventional => Box::new(ConventionalPathSource),
            };
            sources.push(source);
        }

        let downloader =
            IconDownloader::new(config.images_dir, config.request_timeout, config.max_redirects)?;

        Ok(Self {
            enabled: config.enabled,
            sources,
            downloader,
        })
    }

    /// Build a fetcher from explicit sources
    pub fn with_sources(sources: Vec<Box<dyn IconSource>>, downloader: IconDownloader) -> Self {
        Self {
            enabled: true,
            sources,
            downloader,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Try every source in order; returns `images/<file>` on the first success.
    ///
    /// Failures are logged at debug level and never propagated.
    pub async fn acquire(&self, url: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let target = match Url::parse(url) {
            Ok(target) if matches!(target.scheme(), "http" | "https") && target.host_str().is_some() => target,
            _ => {
                tracing::debug!(url = %url, "Skipping favicon lookup for unsupported URL");
                return None;
            }
        };

        for source in &self.sources {
            for candidate in source.candidates(&target).await {
                match self.downloader.download(candidate.clone()).await {
                    Ok(path) => {
                        tracing::info!(url = %url, source = source.name(), candidate = %candidate, path = %path, "Downloaded favicon");
                        return Some(path);
                    }
                    Err(e) => {
                        tracing::debug!(url = %url, source = source.name(), candidate = %candidate, error = %e, "Favicon candidate failed");
                    }
                }
            }
        }

        tracing::debug!(url = %url, "No favicon found");
        None
    }
}
