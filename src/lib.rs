//! # WarpDeck
//!
//! A self-hosted start page: named dashboards of link cards, stored as plain
//! JSON files and served over a small HTTP API with a browser client.
//!
//! ## Features
//!
//! - **File-backed storage**: One JSON document per dashboard plus a settings index
//! - **Safe writes**: Atomic replace and a single writer lock keep both documents in step
//! - **Favicons**: Icons are found and downloaded when a link is added
//! - **Portable**: Zip export and import of every dashboard
//!
//! ## Modules
//!
//! - [`store`]: Settings and dashboard documents on disk
//! - [`favicon`]: Icon discovery and download
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warpdeck::store::{FileStore, NewDashboard, NewLink, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::open(StoreConfig::new("./data")).await?;
//!
//!     store
//!         .create_dashboard(NewDashboard::new("Home", "home"))
//!         .await?;
//!     store
//!         .add_link("home", NewLink::new("Rust docs", "https://doc.rust-lang.org"))
//!         .await?;
//!
//!     let settings = store.load_settings().await?;
//!     println!("{} dashboard(s), default {:?}", settings.dashboards.len(), settings.default_dashboard_slug);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod favicon;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    Dashboard, DashboardSummary, FileStore, Link, NewDashboard, NewLink, Settings, StoreConfig,
    StoreError, StoreResult, Theme,
};

pub use favicon::{FaviconFetcher, FetcherConfig, IconStrategy};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::Config;
