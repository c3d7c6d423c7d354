//! API Routes
//!
//! Route handlers organized by functionality.

pub mod dashboards;
pub mod health;
pub mod links;
pub mod settings;
pub mod upload;
pub mod utils;
