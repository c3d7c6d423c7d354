//! Icon sources
//!
//! Each source turns a destination URL into an ordered list of candidate
//! icon URLs. The fetcher walks sources in priority order and downloads
//! candidates until one succeeds.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::download::FaviconError;
use super::html::{extract_icon_href, resolve_icon_url};

/// Default third-party proxy; `{host}` is replaced with the target hostname
pub const DEFAULT_PROXY_TEMPLATE: &str = "https://icons.duckduckgo.com/ip3/{host}.ico";

/// Same-origin paths probed by [`ConventionalPathSource`], in order
pub const CONVENTIONAL_PATHS: [&str; 7] = [
    "/favicon.ico",
    "/favicon.png",
    "/apple-touch-icon.png",
    "/apple-touch-icon-precomposed.png",
    "/static/favicon.ico",
    "/assets/favicon.ico",
    "/images/favicon.ico",
];

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Icon links live in `<head>`; the rest of a page is not read
pub const MAX_PAGE_BYTES: usize = 512 * 1024;

/// Named strategies, as used in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStrategy {
    Html,
    Proxy,
    Conventional,
}

impl IconStrategy {
    pub fn default_order() -> Vec<IconStrategy> {
        vec![IconStrategy::Html, IconStrategy::Proxy, IconStrategy::Conventional]
    }
}

impl std::str::FromStr for IconStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(IconStrategy::Html),
            "proxy" => Ok(IconStrategy::Proxy),
            "conventional" => Ok(IconStrategy::Conventional),
            other => Err(format!("unknown favicon strategy '{}'", other)),
        }
    }
}

impl std::fmt::Display for IconStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconStrategy::Html => write!(f, "html"),
            IconStrategy::Proxy => write!(f, "proxy"),
            IconStrategy::Conventional => write!(f, "conventional"),
        }
    }
}

/// A producer of candidate icon URLs for a destination
#[async_trait]
pub trait IconSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Candidate icon URLs, best first. An empty list means "nothing to try".
    async fn candidates(&self, target: &Url) -> Vec<Url>;
}

/// Reads the target page and looks for a `<link rel="icon">`
pub struct HtmlLinkSource {
    client: Client,
}

impl HtmlLinkSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FaviconError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_page(&self, target: &Url) -> Result<(Url, String), FaviconError> {
        let response = self
            .client
            .get(target.clone())
            .header(header::ACCEPT, PAGE_ACCEPT)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(FaviconError::Status(response.status().as_u16()));
        }

        let is_html = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| {
                let ct = ct.to_ascii_lowercase();
                ct.starts_with("text/html") || ct.starts_with("application/xhtml+xml")
            });
        if !is_html {
            return Err(FaviconError::NotHtml);
        }

        // Relative hrefs resolve against the page we ended up on
        let final_url = response.url().clone();

        let mut response = response;
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = MAX_PAGE_BYTES - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= MAX_PAGE_BYTES {
                break;
            }
        }

        Ok((final_url, String::from_utf8_lossy(&body).into_owned()))
    }
}

#[async_trait]
impl IconSource for HtmlLinkSource {
    fn name(&self) -> &'static str {
        "html"
    }

    async fn candidates(&self, target: &Url) -> Vec<Url> {
        match self.fetch_page(target).await {
            Ok((page, body)) => extract_icon_href(&body)
                .and_then(|href| resolve_icon_url(&page, &href))
                .into_iter()
                .collect(),
            Err(e) => {
                tracing::debug!(url = %target, error = %e, "Could not read page for icon links");
                Vec::new()
            }
        }
    }
}

/// Asks a third-party icon service keyed by hostname
pub struct ProxySource {
    template: String,
}

impl ProxySource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Default for ProxySource {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_TEMPLATE)
    }
}

#[async_trait]
impl IconSource for ProxySource {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn candidates(&self, target: &Url) -> Vec<Url> {
        let Some(host) = target.host_str() else {
            return Vec::new();
        };

        match Url::parse(&self.template.replace("{host}", host)) {
            Ok(url) => vec![url],
            Err(e) => {
                tracing::warn!(template = %self.template, error = %e, "Invalid favicon proxy template");
                Vec::new()
            }
        }
    }
}

/// Probes well-known icon paths on the target's origin, https before http
pub struct ConventionalPathSource;

#[async_trait]
impl IconSource for ConventionalPathSource {
    fn name(&self) -> &'static str {
        "conventional"
    }

    async fn candidates(&self, target: &Url) -> Vec<Url> {
        let Some(host) = target.host_str() else {
            return Vec::new();
        };
        let authority = match target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        ["https", "http"]
            .iter()
            .flat_map(|scheme| {
                let authority = authority.clone();
                CONVENTIONAL_PATHS
                    .iter()
                    .filter_map(move |path| Url::parse(&format!("{}://{}{}", scheme, authority, path)).ok())
            })
            .collect()
    }
}
