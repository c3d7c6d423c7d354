//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod settings;

pub use dashboard::{DashboardPage, Home};
pub use settings::Settings;
