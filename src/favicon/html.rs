//! `<link rel="icon">` extraction from HTML pages

use regex::Regex;
use reqwest::Url;
use std::sync::OnceLock;

fn link_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<link\b[^>]*>").unwrap())
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)(?:^|\s)(rel|href)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
    })
}

/// rel values that point at a site icon
fn is_icon_rel(rel: &str) -> bool {
    matches!(
        rel.trim().to_ascii_lowercase().as_str(),
        "icon" | "shortcut icon" | "apple-touch-icon" | "apple-touch-icon-precomposed"
    )
}

/// First icon href in document order, with `&amp;` decoded
pub fn extract_icon_href(html: &str) -> Option<String> {
    link_tag_regex().find_iter(html).find_map(|tag| {
        let mut rel = None;
        let mut href = None;

        for caps in attr_regex().captures_iter(tag.as_str()) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str())
                .unwrap_or_default();

            match caps[1].to_ascii_lowercase().as_str() {
                "rel" => rel = Some(value),
                "href" => href = Some(value),
                _ => {}
            }
        }

        match (rel, href) {
            (Some(rel), Some(href)) if is_icon_rel(rel) && !href.trim().is_empty() => {
                Some(href.trim().replace("&amp;", "&"))
            }
            _ => None,
        }
    })
}

/// Resolve an icon href against the page it was found on
pub fn resolve_icon_url(page: &Url, href: &str) -> Option<Url> {
    let url = page.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
