//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

use crate::api;
use crate::state::models::{Settings, Theme};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Settings document, `None` until the first load finishes
    pub settings: RwSignal<Option<Settings>>,
    /// Theme currently applied to the page
    pub theme: RwSignal<Theme>,
    /// Bumped whenever the open dashboard should be fetched again
    pub dashboard_version: RwSignal<u32>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        settings: create_rw_signal(None),
        theme: create_rw_signal(Theme::default()),
        dashboard_version: create_rw_signal(0),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

/// Global state from context
pub fn use_global_state() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    /// Fetch settings from the server and apply the saved theme
    pub fn reload_settings(&self) {
        let state = *self;
        spawn_local(async move {
            state.loading.set(true);
            match api::fetch_settings().await {
                Ok(settings) => state.apply_settings(settings),
                Err(e) => state.show_error(&format!("Failed to load settings: {}", e)),
            }
            state.loading.set(false);
        });
    }

    pub fn apply_settings(&self, settings: Settings) {
        self.theme.set(settings.default_theme);
        self.settings.set(Some(settings));
    }

    /// Ask the open dashboard view to fetch its document again
    pub fn refresh_dashboard(&self) {
        self.dashboard_version.update(|v| *v = v.wrapping_add(1));
    }

    /// Flip the theme locally, then persist it; reverts if the save fails
    pub fn toggle_theme(&self) {
        let previous = self.theme.get_untracked();
        let next = previous.toggled();
        self.theme.set(next);

        let state = *self;
        spawn_local(async move {
            match api::update_settings(&serde_json::json!({ "defaultTheme": next })).await {
                Ok(settings) => state.settings.set(Some(settings)),
                Err(e) => {
                    state.theme.set(previous);
                    state.show_error(&format!("Failed to save theme: {}", e));
                }
            }
        });
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
