//! Settings Page
//!
//! Global settings, dashboard management, the dashboard editor and links.
//! Changes are applied to local state first and then sent to the server;
//! a failed request reloads the server copy.

use leptos::*;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::Loading;
use crate::state::global::{use_global_state, GlobalState};
use crate::state::models::{
    BackgroundConfig, BackgroundType, CardSize, Dashboard, DashboardLayout, Link, LinkInput,
    SearchConfig, SearchEngine, Theme,
};

const SECTION: &str = "bg-gray-800 text-white rounded-xl p-6";
const INPUT: &str = "bg-gray-700 rounded-lg px-3 py-2 border border-gray-600 focus:border-indigo-400 focus:outline-none";
const BUTTON: &str = "px-3 py-2 rounded-lg font-medium bg-gray-600 hover:bg-gray-500 disabled:opacity-50 transition-colors";
const PRIMARY: &str = "px-3 py-2 rounded-lg font-medium bg-indigo-600 hover:bg-indigo-700 disabled:opacity-50 transition-colors";
const DANGER: &str = "px-3 py-2 rounded-lg font-medium bg-red-700 hover:bg-red-600 transition-colors";

/// Settings page component
#[component]
pub fn Settings() -> impl IntoView {
    // Dashboard open in the editor
    let editing = create_rw_signal(None::<String>);

    view! {
        <div class="container mx-auto px-4 py-8 space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Settings"</h1>
                <p class="opacity-70 mt-1">"Manage dashboards, links and preferences"</p>
            </div>

            <GlobalSettings />
            <DashboardManagement editing=editing />

            {move || editing.get().map(|slug| view! { <DashboardEditor slug=slug editing=editing /> })}
        </div>
    }
}

/// First file chosen in a file input
fn selected_file(ev: &ev::Event) -> Option<web_sys::File> {
    ev.target()?
        .dyn_into::<web_sys::HtmlInputElement>()
        .ok()?
        .files()?
        .get(0)
}

/// Reset a file input so the same file can be chosen again
fn clear_file_input(ev: &ev::Event) {
    if let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
    {
        input.set_value("");
    }
}

async fn read_text(file: &web_sys::File) -> Result<String, String> {
    let text = wasm_bindgen_futures::JsFuture::from(file.text())
        .await
        .map_err(|_| "Could not read file".to_string())?;
    text.as_string().ok_or_else(|| "File is not text".to_string())
}

/// Re-fetch settings after a failed optimistic change
fn rollback(state: GlobalState, message: &str, error: String) {
    state.show_error(&format!("{}: {}", message, error));
    state.reload_settings();
}

// ============================================
// Global settings
// ============================================

#[component]
fn GlobalSettings() -> impl IntoView {
    let state = use_global_state();

    let set_theme = move |ev: ev::Event| {
        let theme = if event_target_value(&ev) == "light" { Theme::Light } else { Theme::Dark };
        state.theme.set(theme);
        spawn_local(async move {
            match api::update_settings(&serde_json::json!({ "defaultTheme": theme })).await {
                Ok(settings) => {
                    state.settings.set(Some(settings));
                    state.show_success("Theme saved");
                }
                Err(e) => rollback(state, "Failed to save theme", e),
            }
        });
    };

    let set_default = move |ev: ev::Event| {
        let slug = event_target_value(&ev);
        state.settings.update(|s| {
            if let Some(s) = s {
                s.default_dashboard_slug = slug.clone();
            }
        });
        spawn_local(async move {
            match api::update_settings(&serde_json::json!({ "defaultDashboardSlug": slug })).await {
                Ok(settings) => {
                    state.settings.set(Some(settings));
                    state.show_success("Default dashboard saved");
                }
                Err(e) => rollback(state, "Failed to save default dashboard", e),
            }
        });
    };

    view! {
        <section class=SECTION>
            <h2 class="text-xl font-semibold mb-4">"Global Settings"</h2>

            <div class="grid md:grid-cols-2 gap-4">
                <label class="flex flex-col gap-2">
                    <span class="text-sm opacity-70">"Theme"</span>
                    <select class=INPUT on:change=set_theme>
                        <option value="dark" selected=move || state.theme.get() == Theme::Dark>"Dark"</option>
                        <option value="light" selected=move || state.theme.get() == Theme::Light>"Light"</option>
                    </select>
                </label>

                <label class="flex flex-col gap-2">
                    <span class="text-sm opacity-70">"Default Dashboard"</span>
                    <select class=INPUT on:change=set_default>
                        <option value="">"(first dashboard)"</option>
                        {move || {
                            let settings = state.settings.get().unwrap_or_default();
                            settings.dashboards.into_iter().map(|d| {
                                let selected = d.slug.eq_ignore_ascii_case(&settings.default_dashboard_slug);
                                view! { <option value=d.slug.clone() selected=selected>{d.title}</option> }
                            }).collect_view()
                        }}
                    </select>
                </label>
            </div>
        </section>
    }
}

// ============================================
// Dashboard management
// ============================================

#[component]
fn DashboardManagement(editing: RwSignal<Option<String>>) -> impl IntoView {
    let state = use_global_state();

    let (title, set_title) = create_signal(String::new());
    let (slug, set_slug) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let create = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let (t, s) = (title.get_untracked(), slug.get_untracked());
        if t.trim().is_empty() || s.trim().is_empty() {
            state.show_error("Title and slug are required");
            return;
        }

        set_busy.set(true);
        spawn_local(async move {
            match api::create_dashboard(t.trim(), s.trim()).await {
                Ok(dashboard) => {
                    set_title.set(String::new());
                    set_slug.set(String::new());
                    state.show_success(&format!("Created {}", dashboard.title));
                    state.reload_settings();
                }
                Err(e) => state.show_error(&e),
            }
            set_busy.set(false);
        });
    };

    // Swap a dashboard with its neighbour, then send the new order
    let move_by = move |index: usize, up: bool| {
        let Some(mut settings) = state.settings.get_untracked() else { return };
        let other = if up { index.checked_sub(1) } else { Some(index + 1) };
        let Some(other) = other.filter(|o| *o < settings.dashboards.len()) else { return };

        settings.dashboards.swap(index, other);
        let ids: Vec<String> = settings.dashboards.iter().map(|d| d.id.clone()).collect();
        state.settings.set(Some(settings));

        spawn_local(async move {
            if let Err(e) = api::reorder_dashboards(&ids).await {
                rollback(state, "Failed to reorder dashboards", e);
            }
        });
    };

    let remove = move |slug: String| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Delete dashboard \"{}\"?", slug)).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        state.settings.update(|s| {
            if let Some(s) = s {
                s.dashboards.retain(|d| !d.slug.eq_ignore_ascii_case(&slug));
            }
        });
        if editing.get_untracked().is_some_and(|e| e.eq_ignore_ascii_case(&slug)) {
            editing.set(None);
        }

        spawn_local(async move {
            match api::delete_dashboard(&slug).await {
                Ok(()) => {
                    state.show_success("Dashboard deleted");
                    state.reload_settings();
                }
                Err(e) => rollback(state, "Failed to delete dashboard", e),
            }
        });
    };

    let import_json = move |ev: ev::Event| {
        let Some(file) = selected_file(&ev) else { return };
        clear_file_input(&ev);
        spawn_local(async move {
            let result = async {
                let text = read_text(&file).await?;
                let document: serde_json::Value =
                    serde_json::from_str(&text).map_err(|e| format!("Invalid JSON: {}", e))?;
                api::import_dashboard(&document).await
            }
            .await;

            match result {
                Ok(dashboard) => {
                    state.show_success(&format!("Imported as {}", dashboard.slug));
                    state.reload_settings();
                }
                Err(e) => state.show_error(&format!("Import failed: {}", e)),
            }
        });
    };

    let import_zip = move |ev: ev::Event| {
        let Some(file) = selected_file(&ev) else { return };
        clear_file_input(&ev);
        spawn_local(async move {
            match api::import_settings(&file).await {
                Ok(result) => {
                    state.show_success(&format!(
                        "Imported {} dashboard(s), {} failed",
                        result.imported, result.failed
                    ));
                    state.reload_settings();
                }
                Err(e) => state.show_error(&format!("Import failed: {}", e)),
            }
        });
    };

    let repair = move |_| {
        spawn_local(async move {
            match api::repair_default().await {
                Ok(result) => {
                    state.show_success(&result.message);
                    if result.repaired {
                        state.reload_settings();
                    }
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    view! {
        <section class=SECTION>
            <h2 class="text-xl font-semibold mb-4">"Dashboards"</h2>

            <div class="space-y-2 mb-6">
                {move || {
                    let dashboards = api::summaries(&state.settings.get());
                    let last = dashboards.len().saturating_sub(1);
                    if dashboards.is_empty() {
                        return view! { <p class="opacity-70">"No dashboards yet. Create one below."</p> }.into_view();
                    }
                    dashboards.into_iter().enumerate().map(|(i, d)| {
                        let slug_for_edit = d.slug.clone();
                        let slug_for_delete = d.slug.clone();
                        view! {
                            <div class="flex items-center justify-between gap-2 p-3 bg-gray-700 rounded-lg">
                                <div class="min-w-0">
                                    <span class="font-medium">{d.title}</span>
                                    <span class="opacity-60 text-sm ml-2">{format!("/{}", d.slug)}</span>
                                </div>
                                <div class="flex gap-1 shrink-0">
                                    <button class=BUTTON disabled={i == 0} on:click=move |_| move_by(i, true)>"↑"</button>
                                    <button class=BUTTON disabled={i == last} on:click=move |_| move_by(i, false)>"↓"</button>
                                    <button class=BUTTON on:click=move |_| editing.set(Some(slug_for_edit.clone()))>"Edit"</button>
                                    <button class=DANGER on:click=move |_| remove(slug_for_delete.clone())>"Delete"</button>
                                </div>
                            </div>
                        }
                    }).collect_view()
                }}
            </div>

            <form class="flex flex-wrap gap-2 mb-6" on:submit=create>
                <input
                    class=INPUT
                    placeholder="Title"
                    prop:value=move || title.get()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />
                <input
                    class=INPUT
                    placeholder="slug"
                    prop:value=move || slug.get()
                    on:input=move |ev| set_slug.set(event_target_value(&ev))
                />
                <button type="submit" class=PRIMARY disabled=move || busy.get()>"Create Dashboard"</button>
            </form>

            <div class="flex flex-wrap gap-2">
                <a class=BUTTON href={api::export_url()} download="warpdeck-export.zip">"Export (zip)"</a>
                <label class={format!("{} cursor-pointer", BUTTON)}>
                    "Import dashboard (JSON)"
                    <input type="file" accept=".json,application/json" class="hidden" on:change=import_json />
                </label>
                <label class={format!("{} cursor-pointer", BUTTON)}>
                    "Import export (zip)"
                    <input type="file" accept=".zip,application/zip" class="hidden" on:change=import_zip />
                </label>
                <button class=BUTTON on:click=repair>"Repair default"</button>
            </div>
        </section>
    }
}

// ============================================
// Dashboard editor
// ============================================

#[component]
fn DashboardEditor(slug: String, editing: RwSignal<Option<String>>) -> impl IntoView {
    let version = create_rw_signal(0u32);
    let dashboard = create_resource(
        move || version.get(),
        move |_| {
            let slug = slug.clone();
            async move { api::fetch_dashboard(&slug).await }
        },
    );

    view! {
        <Suspense fallback=|| view! { <Loading /> }>
            {move || dashboard.get().map(|result| match result {
                Ok(d) => view! {
                    <DashboardInfoEditor dashboard=d.clone() editing=editing />
                    <LinkManagement dashboard=d version=version />
                }.into_view(),
                Err(e) => view! { <p class="text-red-400">{e}</p> }.into_view(),
            })}
        </Suspense>
    }
}

#[component]
fn DashboardInfoEditor(dashboard: Dashboard, editing: RwSignal<Option<String>>) -> impl IntoView {
    let state = use_global_state();
    let original_slug = dashboard.slug.clone();
    let layout = dashboard.layout();
    let search = dashboard.search_config.clone().unwrap_or_default();
    let background = dashboard.background_config.clone();

    let title = create_rw_signal(dashboard.title.clone());
    let slug = create_rw_signal(dashboard.slug.clone());
    let columns = create_rw_signal(layout.columns);
    let card_size = create_rw_signal(layout.card_size);
    let gutter = create_rw_signal(layout.gutter);
    let show_search = create_rw_signal(dashboard.show_search_bar);
    let engine = create_rw_signal(search.search_engine);
    let search_new_tab = create_rw_signal(search.open_in_new_tab);
    let show_background = create_rw_signal(dashboard.show_custom_background);
    let background_kind = create_rw_signal(background.as_ref().map(|b| b.kind).unwrap_or(BackgroundType::Color));
    let background_value = create_rw_signal(background.as_ref().map(|b| b.value.clone()).unwrap_or_default());
    let header_color = create_rw_signal(background.and_then(|b| b.text_color).unwrap_or_default());
    let (saving, set_saving) = create_signal(false);

    let save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let layout = DashboardLayout {
            columns: columns.get_untracked().max(1),
            card_size: card_size.get_untracked(),
            gutter: gutter.get_untracked(),
        };
        let search = SearchConfig {
            open_in_new_tab: search_new_tab.get_untracked(),
            search_engine: engine.get_untracked(),
        };
        let mut patch = serde_json::json!({
            "title": title.get_untracked(),
            "slug": slug.get_untracked(),
            "layout": layout,
            "searchConfig": search,
            "showSearchBar": show_search.get_untracked(),
            "showCustomBackground": show_background.get_untracked(),
        });
        let value = background_value.get_untracked();
        if !value.is_empty() {
            let text_color = Some(header_color.get_untracked()).filter(|c| !c.is_empty());
            let config = BackgroundConfig {
                kind: background_kind.get_untracked(),
                value,
                text_color,
            };
            patch["backgroundConfig"] = serde_json::json!(config);
        }

        let from = original_slug.clone();
        set_saving.set(true);
        spawn_local(async move {
            match api::update_dashboard(&from, &patch).await {
                Ok(updated) => {
                    state.show_success("Dashboard saved");
                    if !updated.slug.eq_ignore_ascii_case(&from) {
                        editing.set(Some(updated.slug.clone()));
                    }
                    state.reload_settings();
                    state.refresh_dashboard();
                }
                Err(e) => state.show_error(&e),
            }
            set_saving.set(false);
        });
    };

    let upload_background = move |ev: ev::Event| {
        let Some(file) = selected_file(&ev) else { return };
        clear_file_input(&ev);
        spawn_local(async move {
            match api::upload_background(&file).await {
                Ok(url) => {
                    background_kind.set(BackgroundType::Image);
                    background_value.set(url);
                    show_background.set(true);
                    state.show_success("Background uploaded, save to apply");
                }
                Err(e) => state.show_error(&format!("Upload failed: {}", e)),
            }
        });
    };

    view! {
        <section class=SECTION>
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-xl font-semibold">{format!("Edit \"{}\"", dashboard.title)}</h2>
                <button class=BUTTON on:click=move |_| editing.set(None)>"Close"</button>
            </div>

            <form class="space-y-6" on:submit=save>
                <div class="grid md:grid-cols-2 gap-4">
                    <TextField label="Title" value=title />
                    <TextField label="Slug" value=slug />
                </div>

                <fieldset class="grid md:grid-cols-3 gap-4">
                    <legend class="font-medium mb-2">"Layout"</legend>
                    <NumberField label="Columns" value=columns min=1 />
                    <label class="flex flex-col gap-2">
                        <span class="text-sm opacity-70">"Card size"</span>
                        <select class=INPUT on:change=move |ev| card_size.set(match event_target_value(&ev).as_str() {
                            "sm" => CardSize::Sm,
                            "lg" => CardSize::Lg,
                            _ => CardSize::Md,
                        })>
                            <option value="sm" selected=move || card_size.get() == CardSize::Sm>"Small"</option>
                            <option value="md" selected=move || card_size.get() == CardSize::Md>"Medium"</option>
                            <option value="lg" selected=move || card_size.get() == CardSize::Lg>"Large"</option>
                        </select>
                    </label>
                    <NumberField label="Gutter (px)" value=gutter min=0 />
                </fieldset>

                <fieldset class="grid md:grid-cols-3 gap-4 items-end">
                    <legend class="font-medium mb-2">"Search"</legend>
                    <CheckField label="Show search bar" value=show_search />
                    <label class="flex flex-col gap-2">
                        <span class="text-sm opacity-70">"Engine"</span>
                        <select class=INPUT on:change=move |ev| {
                            let key = event_target_value(&ev);
                            if let Some(e) = SearchEngine::ALL.into_iter().find(|e| e.key() == key) {
                                engine.set(e);
                            }
                        }>
                            {SearchEngine::ALL.into_iter().map(|e| view! {
                                <option value=e.key() selected=move || engine.get() == e>{e.name()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                    <CheckField label="Open results in new tab" value=search_new_tab />
                </fieldset>

                <fieldset class="grid md:grid-cols-2 gap-4 items-end">
                    <legend class="font-medium mb-2">"Background"</legend>
                    <CheckField label="Use custom background" value=show_background />
                    <label class="flex flex-col gap-2">
                        <span class="text-sm opacity-70">"Type"</span>
                        <select class=INPUT on:change=move |ev| background_kind.set(
                            if event_target_value(&ev) == "image" { BackgroundType::Image } else { BackgroundType::Color }
                        )>
                            <option value="color" selected=move || background_kind.get() == BackgroundType::Color>"Color"</option>
                            <option value="image" selected=move || background_kind.get() == BackgroundType::Image>"Image"</option>
                        </select>
                    </label>
                    <TextField label="Color or image URL" value=background_value />
                    <TextField label="Header text color" value=header_color />
                    <label class={format!("{} cursor-pointer w-fit", BUTTON)}>
                        "Upload background image"
                        <input type="file" accept="image/*" class="hidden" on:change=upload_background />
                    </label>
                </fieldset>

                <button type="submit" class=PRIMARY disabled=move || saving.get()>
                    {move || if saving.get() { "Saving..." } else { "Save Dashboard" }}
                </button>
            </form>
        </section>
    }
}

// ============================================
// Links
// ============================================

#[component]
fn LinkManagement(dashboard: Dashboard, version: RwSignal<u32>) -> impl IntoView {
    let state = use_global_state();
    let slug = store_value(dashboard.slug.clone());
    let links = create_rw_signal(dashboard.links.clone());
    // None: closed, Some(None): adding, Some(Some(id)): editing
    let form = create_rw_signal(None::<Option<String>>);

    let remove = move |link_id: String| {
        links.update(|l| l.retain(|link| link.id != link_id));
        spawn_local(async move {
            match api::delete_link(&slug.get_value(), &link_id).await {
                Ok(()) => {
                    state.show_success("Link deleted");
                    state.refresh_dashboard();
                }
                Err(e) => {
                    state.show_error(&format!("Failed to delete link: {}", e));
                    version.update(|v| *v += 1);
                }
            }
        });
    };

    let (refreshing, set_refreshing) = create_signal(false);
    let refresh = move |_| {
        set_refreshing.set(true);
        spawn_local(async move {
            match api::refresh_dashboard(&slug.get_value()).await {
                Ok(result) => {
                    links.set(result.dashboard.links);
                    state.show_success(&format!("{} favicon(s) downloaded", result.favicons_downloaded));
                    state.refresh_dashboard();
                }
                Err(e) => state.show_error(&format!("Failed to refresh favicons: {}", e)),
            }
            set_refreshing.set(false);
        });
    };

    let on_saved = Callback::new(move |_: ()| {
        form.set(None);
        version.update(|v| *v += 1);
        state.refresh_dashboard();
    });

    view! {
        <section class=SECTION>
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-xl font-semibold">"Links"</h2>
                <div class="flex gap-2">
                    <button class=BUTTON disabled=move || refreshing.get() on:click=refresh>
                        "Refresh favicons"
                    </button>
                    <button class=PRIMARY on:click=move |_| form.set(Some(None))>"Add Link"</button>
                </div>
            </div>

            {move || form.get().map(|target| {
                let existing = target.as_ref().and_then(|id| links.get_untracked().into_iter().find(|l| &l.id == id));
                view! { <LinkEditor slug=slug.get_value() link=existing on_saved=on_saved on_cancel=move || form.set(None) /> }
            })}

            <div class="space-y-2 mt-4">
                {move || {
                    let current = links.get();
                    if current.is_empty() {
                        return view! { <p class="opacity-70">"No links yet."</p> }.into_view();
                    }
                    current.into_iter().map(|link: Link| {
                        let id_for_edit = link.id.clone();
                        let id_for_delete = link.id.clone();
                        let image = link.image_url();
                        view! {
                            <div class="flex items-center justify-between gap-2 p-3 bg-gray-700 rounded-lg">
                                <div class="flex items-center gap-3 min-w-0">
                                    {image.map(|src| view! { <img src=src alt="" class="w-6 h-6 rounded-full" /> })}
                                    <div class="min-w-0">
                                        <div class="font-medium truncate">{link.label.clone()}</div>
                                        <div class="text-sm opacity-60 truncate">{link.url.clone()}</div>
                                    </div>
                                </div>
                                <div class="flex gap-1 shrink-0">
                                    <button class=BUTTON on:click=move |_| form.set(Some(Some(id_for_edit.clone())))>"Edit"</button>
                                    <button class=DANGER on:click=move |_| remove(id_for_delete.clone())>"Delete"</button>
                                </div>
                            </div>
                        }
                    }).collect_view()
                }}
            </div>
        </section>
    }
}

#[component]
fn LinkEditor(
    slug: String,
    link: Option<Link>,
    on_saved: Callback<()>,
    on_cancel: impl Fn() + 'static,
) -> impl IntoView {
    let state = use_global_state();
    let link_id = link.as_ref().map(|l| l.id.clone());
    let initial = link.as_ref().map(LinkInput::from).unwrap_or_else(|| LinkInput {
        grid_columns: 1,
        ..Default::default()
    });

    let label = create_rw_signal(initial.label);
    let url = create_rw_signal(initial.url);
    let description = create_rw_signal(initial.description);
    let thumbnail = create_rw_signal(initial.thumbnail);
    let color_bar = create_rw_signal(initial.color_bar);
    let background_color = create_rw_signal(initial.background_color);
    let text_color = create_rw_signal(initial.text_color);
    let new_tab = create_rw_signal(initial.open_in_new_tab);
    let grid_columns = create_rw_signal(initial.grid_columns);
    let (saving, set_saving) = create_signal(false);

    let save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let input = LinkInput {
            label: label.get_untracked(),
            url: url.get_untracked(),
            description: description.get_untracked(),
            thumbnail: thumbnail.get_untracked(),
            color_bar: color_bar.get_untracked(),
            background_color: background_color.get_untracked(),
            text_color: text_color.get_untracked(),
            open_in_new_tab: new_tab.get_untracked(),
            grid_columns: grid_columns.get_untracked().max(1),
        };
        if input.label.trim().is_empty() || input.url.trim().is_empty() {
            state.show_error("Label and URL are required");
            return;
        }

        let slug = slug.clone();
        let link_id = link_id.clone();
        set_saving.set(true);
        spawn_local(async move {
            let result = match &link_id {
                Some(id) => api::update_link(&slug, id, &input).await,
                None => api::add_link(&slug, &input).await,
            };
            match result {
                Ok(_) => {
                    state.show_success("Link saved");
                    on_saved.call(());
                }
                Err(e) => state.show_error(&e),
            }
            set_saving.set(false);
        });
    };

    let upload_thumbnail = move |ev: ev::Event| {
        let Some(file) = selected_file(&ev) else { return };
        clear_file_input(&ev);
        spawn_local(async move {
            match api::upload_thumbnail(&file).await {
                Ok(path) => {
                    thumbnail.set(path);
                    state.show_success("Thumbnail uploaded");
                }
                Err(e) => state.show_error(&format!("Upload failed: {}", e)),
            }
        });
    };

    view! {
        <form class="space-y-4 p-4 bg-gray-900/60 rounded-lg" on:submit=save>
            <div class="grid md:grid-cols-2 gap-4">
                <TextField label="Label" value=label />
                <TextField label="URL" value=url />
                <TextField label="Description" value=description />
                <NumberField label="Grid columns" value=grid_columns min=1 />
                <TextField label="Border color" value=color_bar />
                <TextField label="Background color" value=background_color />
                <TextField label="Text color" value=text_color />
                <CheckField label="Open in new tab" value=new_tab />
            </div>

            <div class="flex flex-wrap items-center gap-2">
                <label class={format!("{} cursor-pointer", BUTTON)}>
                    "Upload thumbnail"
                    <input type="file" accept="image/*" class="hidden" on:change=upload_thumbnail />
                </label>
                {move || (!thumbnail.get().is_empty()).then(|| view! {
                    <img src=thumbnail.get() alt="" class="w-8 h-8 rounded-full" />
                    <button type="button" class=BUTTON on:click=move |_| thumbnail.set(String::new())>
                        "Remove thumbnail"
                    </button>
                })}
            </div>

            <div class="flex gap-2">
                <button type="submit" class=PRIMARY disabled=move || saving.get()>
                    {move || if saving.get() { "Saving..." } else { "Save Link" }}
                </button>
                <button type="button" class=BUTTON on:click=move |_| on_cancel()>"Cancel"</button>
            </div>
        </form>
    }
}

// ============================================
// Form fields
// ============================================

#[component]
fn TextField(label: &'static str, value: RwSignal<String>) -> impl IntoView {
    view! {
        <label class="flex flex-col gap-2">
            <span class="text-sm opacity-70">{label}</span>
            <input
                type="text"
                class=INPUT
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

#[component]
fn NumberField(label: &'static str, value: RwSignal<u32>, min: u32) -> impl IntoView {
    view! {
        <label class="flex flex-col gap-2">
            <span class="text-sm opacity-70">{label}</span>
            <input
                type="number"
                min=min
                class=INPUT
                prop:value=move || value.get().to_string()
                on:input=move |ev| {
                    if let Ok(n) = event_target_value(&ev).parse::<u32>() {
                        value.set(n.max(min));
                    }
                }
            />
        </label>
    }
}

#[component]
fn CheckField(label: &'static str, value: RwSignal<bool>) -> impl IntoView {
    view! {
        <label class="flex items-center gap-2">
            <input
                type="checkbox"
                prop:checked=move || value.get()
                on:change=move |ev| value.set(event_target_checked(&ev))
            />
            <span>{label}</span>
        </label>
    }
}
