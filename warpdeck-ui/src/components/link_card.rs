//! Link Cards
//!
//! The dashboard grid and the card rendered for each link.

use leptos::*;

use crate::state::models::{CardSize, DashboardLayout, Link};

/// Inline grid style: at most `columns` tracks, each at least the card width
pub fn grid_style(layout: &DashboardLayout) -> String {
    let columns = layout.columns.max(1);
    let gap = layout.gutter;
    format!(
        "display: grid; gap: {gap}px; grid-template-columns: repeat(auto-fill, minmax(max({min}px, calc((100% - {gaps}px) / {columns})), 1fr));",
        gap = gap,
        min = layout.card_size.min_width(),
        gaps = gap * (columns - 1),
        columns = columns,
    )
}

/// Responsive grid of link cards
#[component]
pub fn LinkGrid(
    links: Vec<Link>,
    layout: DashboardLayout,
    /// Dim cards so they stay readable over a background image
    #[prop(default = false)]
    over_image: bool,
) -> impl IntoView {
    let size = layout.card_size;

    view! {
        <div class="p-4 w-full" style=grid_style(&layout)>
            {links.into_iter().map(|link| {
                let span = format!("grid-column: span {};", link.grid_columns.max(1));
                view! {
                    <div class="min-w-0 flex" style=span>
                        <LinkCard link=link size=size over_image=over_image />
                    </div>
                }
            }).collect_view()}
        </div>
    }
}

/// A single clickable card
#[component]
pub fn LinkCard(link: Link, size: CardSize, over_image: bool) -> impl IntoView {
    let mut style = String::new();
    if let Some(color) = link.border_color() {
        style.push_str(&format!("border-left: 4px solid {};", color));
    }
    if let Some(bg) = link.background_color.as_deref().filter(|c| !c.is_empty()) {
        style.push_str(&format!("background-color: {};", bg));
    }
    if let Some(fg) = link.text_color.as_deref().filter(|c| !c.is_empty()) {
        style.push_str(&format!("color: {};", fg));
    }

    let target = if link.open_in_new_tab { "_blank" } else { "_self" };
    let icon_px = size.icon_size();
    let icon_style = format!("width: {0}px; height: {0}px;", icon_px);
    let title_class = match size {
        CardSize::Sm => "text-sm font-bold break-words",
        CardSize::Md => "text-base font-bold break-words",
        CardSize::Lg => "text-lg font-bold break-words",
    };

    let mut accessible = Vec::new();
    if let Some(desc) = link.description.as_deref().filter(|d| !d.is_empty()) {
        accessible.push(desc.to_string());
    }
    accessible.push(format!("URL: {}", link.url));
    if link.open_in_new_tab {
        accessible.push("Opens in new tab".to_string());
    }

    let image = link.image_url();
    let initial = link.initial();
    let description = link.description.clone().filter(|d| !d.is_empty());

    view! {
        <a
            href=link.url.clone()
            target=target
            rel="noopener noreferrer"
            aria-label=format!("Open {}", link.label)
            title=accessible.join(". ")
            class="relative flex flex-1 items-center gap-3 p-4 rounded-lg shadow bg-gray-800 \
                   hover:-translate-y-0.5 hover:shadow-lg transition-all focus:outline focus:outline-2 \
                   focus:outline-indigo-400"
            style=style
        >
            {over_image.then(|| view! {
                <span class="absolute inset-0 rounded-lg bg-black/40 pointer-events-none" aria-hidden="true" />
            })}

            <span class="relative z-10 flex items-center justify-center shrink-0" style=icon_style aria-hidden="true">
                {match image {
                    Some(src) => view! {
                        <img src=src alt="" class="w-full h-full rounded-full object-cover" />
                    }.into_view(),
                    None => view! {
                        <span class="w-full h-full flex items-center justify-center rounded-full bg-black/10 text-xs">
                            {initial}
                        </span>
                    }.into_view(),
                }}
            </span>

            <span class="relative z-10 flex flex-col min-w-0">
                <span class=title_class>{link.label.clone()}</span>
                {description.map(|d| view! {
                    <span class="text-sm opacity-75 break-words leading-snug">{d}</span>
                })}
            </span>
        </a>
    }
}
