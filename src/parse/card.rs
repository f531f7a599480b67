use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{absolutize, extract_id, normalize_text, resolve_thumbnail, sel, text_of};
use crate::types::{Listing, ListingTags};

static ANCHOR: Lazy<Selector> = Lazy::new(|| sel("a"));
static THUMB: Lazy<Selector> = Lazy::new(|| sel(".vb_image_container"));
static CAPTION: Lazy<Selector> = Lazy::new(|| sel(".caption"));
static YEAR: Lazy<Selector> = Lazy::new(|| sel(".caption .y"));
static DURATION: Lazy<Selector> = Lazy::new(|| sel(".caption .t"));
static AUDIO: Lazy<Selector> = Lazy::new(|| sel(".capa-audio"));
static QUALITY: Lazy<Selector> = Lazy::new(|| sel(".capa-quali"));

/// Caption text without its badge children.
///
/// Works on a detached copy of the caption: the badges are cut out of the
/// copy, so the caller's document stays intact while it keeps iterating.
pub(crate) fn caption_title(caption: &ElementRef) -> String {
    let mut detached = Html::parse_fragment(&caption.html());
    let badge_ids: Vec<_> = match detached.root_element().children().filter_map(ElementRef::wrap).next() {
        Some(copy) => copy.children().filter_map(ElementRef::wrap).map(|c| c.id()).collect(),
        None => return String::new(),
    };
    for id in badge_ids {
        if let Some(mut node) = detached.tree.get_mut(id) {
            node.detach();
        }
    }
    normalize_text(&detached.root_element().text().collect::<String>())
}

/// One catalog entry (`#collview`) into a listing. `None` when the entry has
/// no usable link; siblings are unaffected.
pub fn parse_card(entry: &ElementRef, base: &str) -> Option<Listing> {
    let href = entry
        .select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())?;
    let url = absolutize(base, href);

    let thumb = entry
        .select(&THUMB)
        .next()
        .and_then(|c| resolve_thumbnail(&c, base));

    let title = entry
        .select(&CAPTION)
        .next()
        .map(|c| caption_title(&c))
        .unwrap_or_default();

    let quality = text_of(entry, &QUALITY);
    Some(Listing {
        id: extract_id(&url),
        title,
        thumb,
        year: text_of(entry, &YEAR),
        duration: text_of(entry, &DURATION),
        tags: ListingTags {
            audio: text_of(entry, &AUDIO),
            quality: quality.clone(),
        },
        quality,
        url,
    })
}

/// Parse every entry, dropping failed ones and those without an id.
pub fn parse_listings<'a, I>(entries: I, base: &str) -> Vec<Listing>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    let mut skipped = 0usize;
    let items: Vec<Listing> = entries
        .into_iter()
        .filter_map(|e| {
            let parsed = parse_card(&e, base).filter(|l| l.id.is_some());
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();
    if skipped > 0 {
        debug!(skipped, kept = items.len(), "dropped catalog entries without id");
    }
    items
}
