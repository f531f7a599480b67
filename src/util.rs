use colored::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::types::{Catalog, Listing, PlayerEmbed, SearchResults, Title};

/// Logs go to stderr so `--json` output on stdout stays clean. `RUST_LOG`
/// wins over the `--debug` switch when set.
pub fn init_logging(debug: bool) {
    let fallback = if debug { "flix=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Pretty JSON on stdout; falls back to the Debug form if serialization fails.
pub fn print_json<T: Serialize + std::fmt::Debug>(value: &T) {
    println!("{}", render_json(value));
}

fn render_json<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{:?}", value))
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub fn print_error(message: &str, json: bool) {
    if json {
        print_json(&ErrorBody { error: message });
    } else {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
}

pub fn print_listings_table(items: &[Listing]) {
    println!("{} {}", "Total".bold(), items.len());

    let index_header = "#";
    let id_header = "ID";
    let year_header = "Year";
    let title_header = "Title";

    let index_width = std::cmp::max(index_header.len(), format!("{}", items.len()).len());
    let id_width = std::cmp::max(
        id_header.len(),
        items.iter().map(|i| i.id.as_deref().unwrap_or("").len()).max().unwrap_or(0),
    );
    let year_width = 4;

    println!(
        "{:<iw$}  {:<dw$}  {:<yw$}  {}",
        index_header.bold(),
        id_header.bold(),
        year_header.bold(),
        title_header.bold(),
        iw = index_width,
        dw = id_width,
        yw = year_width
    );
    println!(
        "{:<iw$}  {:<dw$}  {:<yw$}  {}",
        "-".repeat(index_width),
        "-".repeat(id_width),
        "-".repeat(year_width),
        "-".repeat(10),
        iw = index_width,
        dw = id_width,
        yw = year_width
    );

    for (idx, item) in items.iter().enumerate() {
        let mut title = item.title.clone();
        if !item.quality.is_empty() {
            title.push_str(&format!(" [{}]", item.quality));
        }
        if !item.tags.audio.is_empty() {
            title.push_str(&format!(" ({})", item.tags.audio));
        }
        println!(
            "{:<iw$}  {:<dw$}  {:<yw$}  {}",
            idx + 1,
            item.id.as_deref().unwrap_or(""),
            item.year,
            title,
            iw = index_width,
            dw = id_width,
            yw = year_width
        );
    }
}

pub fn print_catalog_human(catalog: &Catalog) {
    let sections = [
        ("Movies / releases", &catalog.movies.releases),
        ("Movies / trending", &catalog.movies.trending),
        ("Series / releases", &catalog.series.releases),
        ("Series / trending", &catalog.series.trending),
    ];
    for (name, items) in sections {
        println!("\n{}", name.green().bold());
        print_listings_table(items);
    }
}

pub fn print_search_human(results: &SearchResults) {
    println!("Query: {}", results.query.bold());
    print_listings_table(&results.results);
}

pub fn print_title_human(title: &Title) {
    println!("ID:     {}", title.id.bold());
    println!("Title:  {}", title.title);
    if !title.year.is_empty() {
        println!("Year:   {}", title.year);
    }
    if !title.imdb.is_empty() {
        println!("IMDb:   {}", title.imdb);
    }
    if let Some(thumb) = &title.thumb {
        println!("Cover:  {}", thumb);
    }
    println!("Type:   {}", if title.is_series { "series" } else { "movie" });
    if let Some(link) = &title.watch_link {
        println!("Watch:  {}", link.cyan());
    }
    if !title.description.is_empty() {
        println!("Plot:\n{}", title.description);
    }
    if !title.episodes.is_empty() {
        println!("Episodes: {}", title.episodes.len());
        for (i, ep) in title.episodes.iter().enumerate() {
            let player = ep.player_id.as_deref().unwrap_or("-");
            println!("  {}. {} [{}] {}", i + 1, ep.name, player, ep.url);
        }
    }
}

pub fn print_player_human(embed: &PlayerEmbed) {
    println!("ID:     {}", embed.id.bold());
    println!("Server: {}", embed.server);
    println!("URL:    {}", embed.url.cyan());
    println!("Iframe: {}", embed.iframe);
}
