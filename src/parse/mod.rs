//! Extraction rules turning origin-site markup into typed records.
//!
//! Everything here is synchronous and works on an already-fetched document.
//! Per-entry parsers return `Option` so a single malformed node never takes
//! its siblings down with it.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

pub mod card;
pub mod detail;
pub mod episode;

pub use card::parse_listings;
pub use detail::parse_detail;
pub use episode::collect_episodes;

static TRAILING_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d+)/?$").expect("id regex"));
static CSS_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(\s*['"]?(.*?)['"]?\s*\)"#).expect("css url regex"));

pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("bad selector {css:?}: {e:?}"))
}

/// Numeric id at the end of an origin URL, e.g. `/filme-dublado-45343/`.
pub fn extract_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    TRAILING_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn normalize_text(s: &str) -> String {
    s.replace(['\n', '\r'], "").trim().to_string()
}

/// `scheme ":"` prefix per RFC 3986: a letter, then letters, digits, `+`, `-` or `.`.
fn has_scheme(path: &str) -> bool {
    let Some((scheme, _)) = path.split_once(':') else { return false };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Rebase a relative path on the origin. Anything that already carries a
/// scheme (`https:`, `HTTP:`, `data:`) is returned untouched.
pub fn absolutize(base: &str, path: &str) -> String {
    if has_scheme(path) {
        return path.to_string();
    }
    if let Some(rest) = path.strip_prefix("//") {
        let scheme = base.split("://").next().unwrap_or("https");
        return format!("{}://{}", scheme, rest);
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Normalized text of the first descendant matching `selector`, or "".
pub(crate) fn text_of(el: &ElementRef, selector: &Selector) -> String {
    el.select(selector)
        .next()
        .map(|n| normalize_text(&n.text().collect::<String>()))
        .unwrap_or_default()
}

type ThumbStrategy = fn(&ElementRef) -> Option<String>;

/// Tried in order; the first one that yields a non-empty value wins.
const THUMB_STRATEGIES: [ThumbStrategy; 2] = [thumb_from_data_attr, thumb_from_inline_style];

fn thumb_from_data_attr(el: &ElementRef) -> Option<String> {
    el.value().attr("data-background-src").map(|s| s.trim().to_string())
}

fn thumb_from_inline_style(el: &ElementRef) -> Option<String> {
    let style = el.value().attr("style")?;
    if !style.contains("url(") {
        return None;
    }
    CSS_URL
        .captures(style)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn resolve_thumbnail(container: &ElementRef, base: &str) -> Option<String> {
    THUMB_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(container).filter(|s| !s.is_empty()))
        .map(|raw| absolutize(base, &raw))
}
