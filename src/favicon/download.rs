//! Icon downloader
//!
//! Fetches a single candidate URL into the images directory. Redirects are
//! followed by hand so each hop can be bounded and resolved against the URL
//! that produced it.

use reqwest::{header, Client, StatusCode, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; WarpDeck/1.0)";
const ICON_ACCEPT: &str = "image/webp,image/apng,image/*,*/*;q=0.8";

/// Why a single candidate failed. Never surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Redirect without a usable Location header")]
    BadRedirect,

    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(u32),

    #[error("Empty response body")]
    EmptyBody,

    #[error("Response is not an HTML page")]
    NotHtml,

    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads icons with redirects disabled at the client level
pub struct IconDownloader {
    client: Client,
    images_dir: PathBuf,
    max_redirects: u32,
}

impl IconDownloader {
    pub fn new(
        images_dir: impl Into<PathBuf>,
        timeout: Duration,
        max_redirects: u32,
    ) -> Result<Self, FaviconError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            images_dir: images_dir.into(),
            max_redirects,
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Download `url`, following 301/302 up to the configured limit.
    ///
    /// Returns the stored path relative to the data directory (`images/<file>`).
    pub async fn download(&self, url: Url) -> Result<String, FaviconError> {
        let mut current = url;
        let mut hops = 0u32;

        loop {
            if !matches!(current.scheme(), "http" | "https") {
                return Err(FaviconError::UnsupportedUrl(current.to_string()));
            }

            let response = self
                .client
                .get(current.clone())
                .header(header::ACCEPT, ICON_ACCEPT)
                .header(header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => return self.save(&current, response).await,
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                    if hops >= self.max_redirects {
                        return Err(FaviconError::TooManyRedirects(self.max_redirects));
                    }
                    let next = response
                        .headers()
                        .get(header::LOCATION)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|location| current.join(location).ok())
                        .ok_or(FaviconError::BadRedirect)?;

                    tracing::debug!(from = %current, to = %next, "Following icon redirect");
                    current = next;
                    hops += 1;
                }
                status => return Err(FaviconError::Status(status.as_u16())),
            }
        }
    }

    /// Stream the body to a fresh file, removing it on any failure
    async fn save(&self, url: &Url, mut response: reqwest::Response) -> Result<String, FaviconError> {
        let filename = format!("{}.{}", Uuid::new_v4(), extension_for(url.as_str()));
        let path = self.images_dir.join(&filename);

        let mut file = File::create(&path).await?;
        let mut written = 0usize;

        let result: Result<(), FaviconError> = async {
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
                written += chunk.len();
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        let result = result.and_then(|()| {
            if written == 0 {
                Err(FaviconError::EmptyBody)
            } else {
                Ok(())
            }
        });

        if let Err(e) = result {
            drop(file);
            if let Err(remove_err) = fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %remove_err, "Failed to remove partial icon");
            }
            return Err(e);
        }

        Ok(format!("images/{}", filename))
    }
}

/// `.png` when the URL mentions png anywhere, otherwise `.ico`
pub fn extension_for(url: &str) -> &'static str {
    if url.contains("png") {
        "png"
    } else {
        "ico"
    }
}
