//! Header Component
//!
//! Brand, dashboard switcher, refresh, theme toggle and settings link.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::global::use_global_state;
use crate::state::models::Theme;

/// Top bar shown on every page
#[component]
pub fn Header() -> impl IntoView {
    let state = use_global_state();
    let pathname = use_location().pathname;
    let navigate = use_navigate();

    let on_settings = move || pathname.get() == "/settings";

    // Slug of the open dashboard, or the landing dashboard elsewhere
    let current_slug = move || {
        let path = pathname.get();
        let slug = path.trim_start_matches('/');
        if !slug.is_empty() && slug != "settings" {
            return Some(slug.to_string());
        }
        state.settings.get().and_then(|s| s.landing_slug())
    };

    let (refreshing, set_refreshing) = create_signal(false);
    let refresh = move |_| {
        let Some(slug) = current_slug() else { return };
        set_refreshing.set(true);
        state.show_success("Refreshing dashboard... downloading favicons");

        spawn_local(async move {
            match api::refresh_dashboard(&slug).await {
                Ok(result) => {
                    state.show_success(&format!(
                        "Dashboard refreshed, {} favicon(s) downloaded",
                        result.favicons_downloaded
                    ));
                    state.refresh_dashboard();
                }
                Err(e) => state.show_error(&format!("Failed to refresh dashboard: {}", e)),
            }
            set_refreshing.set(false);
        });
    };

    let switch = move |ev: ev::Event| {
        let slug = event_target_value(&ev);
        if !slug.is_empty() {
            navigate(&format!("/{}", slug), Default::default());
        }
    };

    view! {
        <header class="bg-gray-800/90 border-b border-gray-700 text-white">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-12 gap-2">
                    <A href="/" class="text-lg font-bold">"WarpDeck"</A>

                    <div class="flex items-center gap-2">
                        {move || if on_settings() {
                            view! {
                                <A href="/" class="px-2 py-1 rounded hover:bg-gray-700">"⌂"</A>
                            }.into_view()
                        } else {
                            view! {
                                <A href="/settings" class="px-2 py-1 rounded hover:bg-gray-700">"⚙"</A>
                            }.into_view()
                        }}

                        <button
                            class="px-2 py-1 rounded hover:bg-gray-700 disabled:opacity-50"
                            title="Refresh dashboard (download new favicons)"
                            disabled=move || refreshing.get()
                            on:click=refresh
                        >
                            "⟳"
                        </button>

                        <button
                            class="px-2 py-1 rounded hover:bg-gray-700"
                            title="Toggle theme"
                            on:click=move |_| state.toggle_theme()
                        >
                            {move || match state.theme.get() {
                                Theme::Dark => "☀",
                                Theme::Light => "☾",
                            }}
                        </button>

                        <select
                            class="bg-gray-700 rounded px-2 py-1 text-sm border border-gray-600"
                            on:change=switch
                        >
                            {move || {
                                let current = current_slug().unwrap_or_default();
                                api::summaries(&state.settings.get())
                                    .into_iter()
                                    .map(|d| {
                                        let is_current = d.slug.eq_ignore_ascii_case(&current);
                                        view! {
                                            <option value=d.slug.clone() selected=is_current>{d.title}</option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                </div>
            </div>
        </header>
    }
}
