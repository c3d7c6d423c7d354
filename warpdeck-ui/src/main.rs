//! WarpDeck Client
//!
//! Start page and dashboard editor built with Leptos (WASM).
//!
//! # Features
//!
//! - Dashboards rendered as a responsive card grid
//! - Optional search bar and custom background per dashboard
//! - Settings page for dashboards, links, uploads, import and export
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the WarpDeck server over `/api` on the same origin.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
