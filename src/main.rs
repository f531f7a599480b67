use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

mod api;
mod config;
mod error;
mod fetch;
mod parse;
mod types;
mod util;

use api::Service;
use config::Config;
use fetch::HttpFetcher;

#[derive(Parser, Debug)]
#[command(name = "flix", version, about = "Catalog, search and title details scraped from the streaming site", long_about = None)]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Origin site to scrape (overrides FLIX_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Our own scheme+host, used for movie watch links (overrides FLIX_SERVICE_ORIGIN)
    #[arg(long, global = true)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Home page releases and trending, for movies and series
    #[command(visible_alias = "home")]
    Recommends,

    /// Search titles by name
    Search { query: String },

    /// Title details; series include their episodes
    Detail {
        url: String,
        /// Season to request for series
        #[arg(short, long)]
        season: Option<String>,
    },

    /// Player embed URL for an id
    #[command(visible_alias = "watch")]
    Player {
        id: String,
        /// Streaming server backend
        #[arg(short = 'v', long)]
        server: Option<String>,
    },
}

/// Failures reach the user as one generic line; details only go to the log.
fn report<T>(result: error::Result<T>, fallback: &str, json: bool, show: impl FnOnce(&T)) -> bool {
    match result {
        Ok(value) => {
            show(&value);
            true
        }
        Err(e) => {
            debug!(error = %e, "request failed");
            util::print_error(e.public_message(fallback), json);
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_logging(cli.debug);

    let config = Config::from_env().with_overrides(cli.base_url.clone(), cli.origin.clone());
    debug!(?config, "configuration loaded");
    let fetcher = HttpFetcher::new(&config).context("failed to build HTTP client")?;
    let service = Service::new(fetcher, config);
    let json = cli.json;

    let ok = match cli.command {
        Commands::Recommends => report(service.recommends().await, "failed to load recommendations", json, |c| {
            if json { util::print_json(c) } else { util::print_catalog_human(c) }
        }),
        Commands::Search { query } => report(service.search(&query).await, "search failed or timed out", json, |r| {
            if json { util::print_json(r) } else { util::print_search_human(r) }
        }),
        Commands::Detail { url, season } => {
            report(service.detail(&url, season.as_deref()).await, "failed to load title details", json, |t| {
                if json { util::print_json(t) } else { util::print_title_human(t) }
            })
        }
        Commands::Player { id, server } => {
            report(service.player_embed(&id, server.as_deref()), "failed to resolve player", json, |p| {
                if json { util::print_json(p) } else { util::print_player_human(p) }
            })
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
