//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::components::{Header, Toast};
use crate::pages::{DashboardPage, Home, Settings};
use crate::state::global::{provide_global_state, use_global_state};
use crate::state::models::Theme;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    let state = use_global_state();
    state.reload_settings();

    let shell_class = move || match state.theme.get() {
        Theme::Dark => "dark min-h-screen bg-gray-900 text-white flex flex-col",
        Theme::Light => "light min-h-screen bg-gray-100 text-gray-900 flex flex-col",
    };

    view! {
        <Router>
            <div class=shell_class>
                <Header />

                <main class="flex-1">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path="/settings" view=Settings />
                        <Route path="/:slug" view=DashboardPage />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="opacity-70 mb-6">"Nothing lives at this address."</p>
            <A
                href="/"
                class="px-6 py-3 bg-indigo-600 hover:bg-indigo-700 text-white rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
