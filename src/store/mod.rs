//! WarpDeck Store
//!
//! File-backed persistence for settings and dashboards:
//!
//! - **types**: Documents (Settings, Dashboard, Link) and their patches
//! - **engine**: The file store with atomic writes and a single write lock
//! - **archive**: Zip export/import of the whole store
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   settings.json          global settings + ordered dashboard index
//!   dashboards/<id>.json   one document per dashboard, links embedded
//!   uploads/               user-uploaded thumbnails
//!   images/                downloaded favicons and background images
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use warpdeck::store::{FileStore, NewDashboard, NewLink, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::open(StoreConfig::new("./data")).await?;
//!
//!     store.create_dashboard(NewDashboard::new("Home", "home")).await?;
//!     store.add_link("home", NewLink::new("Rust", "https://www.rust-lang.org")).await?;
//!
//!     let home = store.get_dashboard_by_slug("home").await?;
//!     println!("{} links", home.map(|d| d.links.len()).unwrap_or(0));
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod engine;
pub mod error;
pub mod types;

pub use archive::{build_export, read_export, ExportBundle, ImportReport};
pub use engine::{FileStore, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use types::{
    BackgroundConfig, BackgroundType, CardSize, Dashboard, DashboardLayout, DashboardPatch,
    DashboardSummary, Link, LinkPatch, NewDashboard, NewLink, RepairOutcome, SearchConfig,
    SearchEngine, Settings, SettingsPatch, Theme,
};
