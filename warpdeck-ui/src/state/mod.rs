//! State Management
//!
//! Global application state and the document types shared with the API.

pub mod global;
pub mod models;

pub use global::{provide_global_state, GlobalState};
