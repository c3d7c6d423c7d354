//! Dashboard Page
//!
//! Renders one dashboard: title, optional search bar and background, card grid.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{GridSkeleton, LinkGrid, Loading, SearchBar};
use crate::state::global::use_global_state;
use crate::state::models::Dashboard;

/// `/`: open the default dashboard, or settings when there are none
#[component]
pub fn Home() -> impl IntoView {
    let state = use_global_state();

    view! {
        {move || match state.settings.get() {
            None => view! { <Loading /> }.into_view(),
            Some(settings) => match settings.landing_slug() {
                Some(slug) => view! { <Redirect path=format!("/{}", slug) /> }.into_view(),
                None => view! { <Redirect path="/settings" /> }.into_view(),
            },
        }}
    }
}

/// `/:slug`
#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_global_state();
    let params = use_params_map();
    let slug = move || params.with(|p| p.get("slug").cloned().unwrap_or_default());

    let dashboard = create_resource(
        move || (slug(), state.dashboard_version.get()),
        |(slug, _)| async move { api::fetch_dashboard(&slug).await },
    );

    view! {
        <Suspense fallback=|| view! { <div class="container mx-auto px-4 py-8"><GridSkeleton /></div> }>
            {move || dashboard.get().map(|result| match result {
                Ok(dashboard) => view! { <DashboardView dashboard=dashboard /> }.into_view(),
                Err(e) => view! { <DashboardMissing error=e /> }.into_view(),
            })}
        </Suspense>
    }
}

#[component]
fn DashboardView(dashboard: Dashboard) -> impl IntoView {
    let layout = dashboard.layout();
    let background = dashboard.background().cloned();
    let over_image = background
        .as_ref()
        .is_some_and(|b| b.kind == crate::state::models::BackgroundType::Image);

    let page_style = background.as_ref().map(|b| b.style()).unwrap_or_default();
    let title_style = background
        .as_ref()
        .and_then(|b| b.text_color.clone())
        .map(|c| format!("color: {};", c))
        .unwrap_or_default();

    let search = dashboard
        .show_search_bar
        .then(|| dashboard.search_config.clone().unwrap_or_default());
    let is_empty = dashboard.links.is_empty();

    view! {
        <div class="min-h-[calc(100vh-3rem)]" style=page_style>
            <div class="px-4 pt-4">
                <h1 class="text-2xl font-semibold" style=title_style>{dashboard.title.clone()}</h1>
                {is_empty.then(|| view! {
                    <p class="opacity-70 mt-1">"No links in this dashboard yet. Go to settings to add some!"</p>
                })}
            </div>

            {search.map(|config| view! { <SearchBar config=config /> })}

            {(!is_empty).then(|| view! {
                <LinkGrid links=dashboard.links.clone() layout=layout.clone() over_image=over_image />
            })}
        </div>
    }
}

#[component]
fn DashboardMissing(error: String) -> impl IntoView {
    view! {
        <div class="p-6 space-y-3">
            <div class="bg-red-600/20 border border-red-600 text-red-300 rounded-lg px-4 py-3">{error}</div>
            <p>
                "Dashboard not found. Check the URL or go to "
                <A href="/settings" class="underline">"settings"</A>
                " to manage your dashboards."
            </p>
        </div>
    }
}
