//! Search Bar Component

use leptos::*;

use crate::state::models::SearchConfig;

/// Web search box; submits to the configured engine
#[component]
pub fn SearchBar(config: SearchConfig) -> impl IntoView {
    let (query, set_query) = create_signal(String::new());
    let engine = config.search_engine;
    let new_tab = config.open_in_new_tab;

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let terms = query.get_untracked();
        if terms.trim().is_empty() {
            return;
        }

        let url = engine.query_url(terms.trim());
        if let Some(window) = web_sys::window() {
            let target = if new_tab { "_blank" } else { "_self" };
            let _ = window.open_with_url_and_target(&url, target);
        }
        set_query.set(String::new());
    };

    view! {
        <form class="px-4 pt-4" on:submit=submit>
            <input
                type="search"
                placeholder=format!("Search {}", engine.name())
                prop:value=move || query.get()
                on:input=move |ev| set_query.set(event_target_value(&ev))
                class="w-full max-w-2xl block mx-auto bg-gray-700/80 text-white rounded-lg px-4 py-3
                       border border-gray-600 focus:border-indigo-400 focus:outline-none"
            />
        </form>
    }
}
