use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{collect_episodes, extract_id, normalize_text, resolve_thumbnail, sel, text_of};
use crate::config::DetailLayout;
use crate::types::Title;

static EPISODE_LIST: Lazy<Selector> = Lazy::new(|| sel("#listagem"));
static BREADCRUMB: Lazy<Selector> = Lazy::new(|| sel(".ipsBreadcrumb, .breadcrumb"));
static HEADING: Lazy<Selector> = Lazy::new(|| sel("h1"));
static COVER: Lazy<Selector> = Lazy::new(|| sel(".vb_image_container"));
static SYNOPSIS: Lazy<Selector> = Lazy::new(|| sel(".sinopse"));
static IMDB: Lazy<Selector> = Lazy::new(|| sel(".imdb"));
static INFO: Lazy<Selector> = Lazy::new(|| sel(".infos span"));

const SERIES_TERMS: [&str; 2] = ["Séries", "Series"];
const READ_MORE: [&str; 3] = ["Ler mais", "Leia mais", "Read more"];

/// Either signal alone marks a series; neither is reliable on every template.
fn looks_like_series(root: &ElementRef) -> bool {
    if root.select(&EPISODE_LIST).next().is_some() {
        return true;
    }
    let crumbs: String = root.select(&BREADCRUMB).flat_map(|b| b.text()).collect();
    SERIES_TERMS.iter().any(|t| crumbs.contains(t))
}

fn strip_read_more(text: &str) -> &str {
    let mut out = text.trim_end();
    for marker in READ_MORE {
        let Some(cut) = out.len().checked_sub(marker.len()) else { continue };
        if out.is_char_boundary(cut) && out[cut..].eq_ignore_ascii_case(marker) {
            let kept = out[..cut].trim_end();
            out = match kept.strip_suffix("...") {
                Some(rest) => rest.trim_end(),
                None => kept.strip_suffix('…').unwrap_or(kept).trim_end(),
            };
        }
    }
    out
}

/// The year sits at a fixed position among the `.infos` spans. Upstream
/// offers nothing better; a reordered template silently yields another field.
fn year_by_position(root: &ElementRef, layout: &DetailLayout) -> String {
    root.select(&INFO)
        .nth(layout.year_info_index)
        .map(|n| normalize_text(&n.text().collect::<String>()))
        .unwrap_or_default()
}

/// Build the title record for a detail page fetched from `page_url`.
///
/// Movies get exactly one watch link pointing at `service_origin`; series get
/// none at this level, only their episode list.
pub fn parse_detail(doc: &Html, page_url: &str, base: &str, layout: &DetailLayout, service_origin: &str) -> Title {
    let root = doc.root_element();
    let id = extract_id(page_url).unwrap_or_default();
    let is_series = looks_like_series(&root);

    let description = root
        .select(&SYNOPSIS)
        .next()
        .map(|n| normalize_text(strip_read_more(&n.text().collect::<String>())))
        .unwrap_or_default();

    let (episodes, watch_link) = if is_series {
        let episodes = root
            .select(&EPISODE_LIST)
            .next()
            .map(|list| collect_episodes(&list, base))
            .unwrap_or_default();
        (episodes, None)
    } else {
        (Vec::new(), Some(format!("{}/watch/{}", service_origin.trim_end_matches('/'), id)))
    };
    debug!(%id, is_series, episodes = episodes.len(), "parsed detail page");

    Title {
        title: text_of(&root, &HEADING),
        year: year_by_position(&root, layout),
        imdb: text_of(&root, &IMDB),
        thumb: root.select(&COVER).next().and_then(|c| resolve_thumbnail(&c, base)),
        description,
        is_series,
        episodes,
        watch_link,
        id,
    }
}
