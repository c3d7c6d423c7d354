//! API access
//!
//! Thin wrappers over the WarpDeck HTTP API.

pub mod client;

pub use client::*;
