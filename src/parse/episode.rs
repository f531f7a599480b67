use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::{absolutize, extract_id, normalize_text, sel};
use crate::types::Episode;

static ITEM: Lazy<Selector> = Lazy::new(|| sel("li"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| sel("a"));

type OrderStrategy = fn(&ElementRef, usize) -> Option<i64>;

/// Explicit `data-id` first, document position otherwise. The last strategy
/// always answers, so every episode gets a key.
const ORDER_STRATEGIES: [OrderStrategy; 2] = [order_from_data_id, order_from_position];

fn order_from_data_id(item: &ElementRef, _pos: usize) -> Option<i64> {
    item.value().attr("data-id").and_then(|v| v.trim().parse::<i64>().ok())
}

fn order_from_position(_item: &ElementRef, pos: usize) -> Option<i64> {
    i64::try_from(pos).ok()
}

fn order_key(item: &ElementRef, pos: usize) -> i64 {
    ORDER_STRATEGIES
        .iter()
        .find_map(|s| s(item, pos))
        .unwrap_or(i64::MAX)
}

fn parse_episode(item: &ElementRef, pos: usize, base: &str) -> Option<Episode> {
    let anchor = item.select(&ANCHOR).next()?;
    let href = anchor.value().attr("href").map(str::trim).filter(|h| !h.is_empty())?;
    let url = absolutize(base, href);
    Some(Episode {
        name: normalize_text(&anchor.text().collect::<String>()),
        player_id: extract_id(&url),
        order: order_key(item, pos),
        url,
    })
}

/// True when no other `li` sits between `item` and the listing container.
fn is_listing_item(item: &ElementRef, container: &ElementRef) -> bool {
    item.ancestors()
        .take_while(|n| n.id() != container.id())
        .filter_map(ElementRef::wrap)
        .all(|el| el.value().name() != "li")
}

/// Episodes of the listing container, sorted by their order key. Items
/// without a link are dropped, not padded; nested sub-lists are ignored.
pub fn collect_episodes(container: &ElementRef, base: &str) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = container
        .select(&ITEM)
        .filter(|item| is_listing_item(item, container))
        .enumerate()
        .filter_map(|(pos, item)| parse_episode(&item, pos, base))
        .collect();
    episodes.sort_by_key(|e| e.order);
    episodes
}
