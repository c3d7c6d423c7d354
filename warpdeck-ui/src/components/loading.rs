//! Loading Component

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="animate-spin rounded-full border-4 border-gray-500 border-t-transparent w-8 h-8" />
        </div>
    }
}

/// Skeleton loader for the card grid
#[component]
pub fn GridSkeleton(
    #[prop(default = 6)]
    count: usize,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-3 gap-4 animate-pulse">
            {(0..count).map(|_| view! {
                <div class="bg-gray-700/60 rounded-lg h-20" />
            }).collect_view()}
        </div>
    }
}
