//! UI Components
//!
//! Reusable Leptos components for dashboards and the editor.

pub mod header;
pub mod link_card;
pub mod loading;
pub mod search_bar;
pub mod toast;

pub use header::Header;
pub use link_card::LinkGrid;
pub use loading::{GridSkeleton, Loading};
pub use search_bar::SearchBar;
pub use toast::Toast;
