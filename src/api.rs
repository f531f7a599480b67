use scraper::Html;
use tracing::{debug, info};
use urlencoding::encode;

use crate::config::{Config, DEFAULT_PLAYER_SERVER};
use crate::error::{Result, ScrapeError};
use crate::fetch::HtmlFetcher;
use crate::parse::{self, absolutize, extract_id, sel};
use crate::types::{Catalog, Listing, PlayerEmbed, SearchResults, Section, Title};

const SEASON_PARAM: &str = "temporada";
const EMBED_PATH: &str = "/e/getplay.php";

/// Request-scoped operations: validate, fetch once, parse synchronously.
pub struct Service<F> {
    fetcher: F,
    config: Config,
}

fn parse_section(doc: &Html, widget: usize, base: &str) -> Section {
    let widgets = sel(".cWidgetContainer");
    let Some(container) = doc.select(&widgets).nth(widget) else {
        debug!(widget, "catalog widget missing");
        return Section::default();
    };
    let releases = sel(r#".vbPanel-container[class*="releases_"] #collview"#);
    let trending = sel(r#".vbPanel-container[class*="trending_"] #collview"#);
    Section {
        releases: parse::parse_listings(container.select(&releases), base),
        trending: parse::parse_listings(container.select(&trending), base),
    }
}

fn parse_catalog(body: &str, base: &str) -> Catalog {
    let doc = Html::parse_document(body);
    Catalog {
        movies: parse_section(&doc, 0, base),
        series: parse_section(&doc, 1, base),
    }
}

fn parse_search(body: &str, base: &str) -> Vec<Listing> {
    let doc = Html::parse_document(body);
    parse::parse_listings(doc.select(&sel("#collview")), base)
}

fn with_season(url: &str, season: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, sep, SEASON_PARAM, encode(season))
}

impl<F: HtmlFetcher> Service<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        Service { fetcher, config }
    }

    /// Home page widgets: movies first, series second.
    pub async fn recommends(&self) -> Result<Catalog> {
        let url = format!("{}/", self.config.base_url);
        let body = self.fetcher.fetch_html(&url).await?;
        let catalog = parse_catalog(&body, &self.config.base_url);
        info!(
            movies = catalog.movies.releases.len() + catalog.movies.trending.len(),
            series = catalog.series.releases.len() + catalog.series.trending.len(),
            "catalog parsed"
        );
        Ok(catalog)
    }

    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let q = query.trim();
        if q.is_empty() {
            return Err(ScrapeError::validation("a search query is required"));
        }
        let url = format!("{}/pesquisar/?p={}", self.config.base_url, encode(q));
        let body = self.fetcher.fetch_html(&url).await?;
        let results = parse_search(&body, &self.config.base_url);
        info!(query = q, count = results.len(), "search parsed");
        Ok(SearchResults { query: q.to_string(), count: results.len(), results })
    }

    /// Detail page for `url` (as found in a listing). The season, if any, is
    /// passed upstream as a query parameter.
    pub async fn detail(&self, url: &str, season: Option<&str>) -> Result<Title> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ScrapeError::validation("a title url is required"));
        }
        let page_url = absolutize(&self.config.base_url, url);
        if extract_id(&page_url).is_none() {
            return Err(ScrapeError::validation("title url must end with a numeric identifier"));
        }
        let fetch_url = match season.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => with_season(&page_url, s),
            None => page_url.clone(),
        };
        let body = self.fetcher.fetch_html(&fetch_url).await?;
        let doc = Html::parse_document(&body);
        Ok(parse::parse_detail(
            &doc,
            &page_url,
            &self.config.base_url,
            &self.config.layout,
            &self.config.service_origin,
        ))
    }

    /// Embed URL for the origin's player endpoint. No fetch involved.
    pub fn player_embed(&self, id: &str, server: Option<&str>) -> Result<PlayerEmbed> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ScrapeError::validation("an id is required"));
        }
        let server = server.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_PLAYER_SERVER);
        let url = format!(
            "{}{}?id={}&sv={}",
            self.config.base_url,
            EMBED_PATH,
            encode(id),
            encode(server)
        );
        let iframe = format!(r#"<iframe src="{}" scrolling="no" frameborder="0" allowfullscreen></iframe>"#, url);
        Ok(PlayerEmbed { id: id.to_string(), server: server.to_string(), url, iframe })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "https://origin.test";

    /// Canned pages keyed by URL; records every URL requested.
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl HtmlFetcher for StubFetcher {
        async fn fetch_html(&self, url: &str) -> Result<String> {
            self.requested.lock().expect("lock").push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        }
    }

    fn service(fetcher: StubFetcher) -> Service<StubFetcher> {
        let config = Config::default().with_overrides(Some(BASE.into()), Some("https://api.test".into()));
        Service::new(fetcher, config)
    }

    fn card(href: &str, title: &str) -> String {
        format!(r#"<div id="collview"><a href="{href}"></a><div class="caption">{title}<span class="y">2024</span></div></div>"#)
    }

    #[tokio::test]
    async fn recommends_groups_sections_and_drops_idless() {
        let home = format!(
            r#"<html><body>
            <div class="cWidgetContainer">
                <div class="vbPanel-container releases_movies">{}{}</div>
                <div class="vbPanel-container trending_movies">{}</div>
            </div>
            <div class="cWidgetContainer">
                <div class="vbPanel-container releases_series">{}</div>
                <div class="vbPanel-container trending_series">{}{}</div>
            </div>
            </body></html>"#,
            card("/filme/a-1/", "Movie A"),
            card("/filme/sem-id/", "Broken"),
            card("/filme/b-2/", "Movie B"),
            card("/serie/c-3/", "Show C"),
            card("/serie/d-4/", "Show D"),
            card("", "Empty"),
        );
        let svc = service(StubFetcher::default().with("https://origin.test/", &home));
        let cat = svc.recommends().await.expect("catalog");
        assert_eq!(cat.movies.releases.len(), 1);
        assert_eq!(cat.movies.releases[0].title, "Movie A");
        assert_eq!(cat.movies.trending[0].id.as_deref(), Some("2"));
        assert_eq!(cat.series.releases[0].title, "Show C");
        assert_eq!(cat.series.trending.len(), 1);
        for section in [&cat.movies, &cat.series] {
            assert!(section.releases.iter().chain(&section.trending).all(|l| l.id.is_some()));
        }
    }

    #[tokio::test]
    async fn recommends_tolerates_missing_widgets() {
        let svc = service(StubFetcher::default().with("https://origin.test/", "<html></html>"));
        let cat = svc.recommends().await.expect("catalog");
        assert!(cat.movies.releases.is_empty());
        assert!(cat.series.trending.is_empty());
    }

    #[tokio::test]
    async fn search_encodes_query_and_filters() {
        let page = format!("<html><body>{}{}</body></html>", card("/filme/x-10/", "X"), card("/noid/", "Y"));
        let svc = service(StubFetcher::default().with("https://origin.test/pesquisar/?p=o%20poderoso", &page));
        let res = svc.search("  o poderoso ").await.expect("search");
        assert_eq!(res.query, "o poderoso");
        assert_eq!(res.count, 1);
        assert_eq!(res.results[0].url, "https://origin.test/filme/x-10/");
    }

    #[tokio::test]
    async fn empty_inputs_fail_before_fetching() {
        let svc = service(StubFetcher::default());
        assert!(matches!(svc.search("   ").await, Err(ScrapeError::Validation(_))));
        assert!(matches!(svc.detail("", None).await, Err(ScrapeError::Validation(_))));
        assert!(matches!(svc.detail("/filme/no-id/", None).await, Err(ScrapeError::Validation(_))));
        assert!(svc.fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_aborts_whole_request() {
        let svc = service(StubFetcher::default());
        let err = svc.recommends().await.expect_err("no page");
        assert_eq!(err.public_message("failed to load recommendations"), "failed to load recommendations");
    }

    #[tokio::test]
    async fn movie_detail_links_to_own_watch_endpoint() {
        let page = r#"<html><body><h1>Known Movie</h1><div class="sinopse">Plot</div></body></html>"#;
        let svc = service(StubFetcher::default().with("https://origin.test/filme/known-movie-45343/", page));
        let t = svc.detail("/filme/known-movie-45343/", None).await.expect("detail");
        assert!(!t.is_series);
        assert!(t.episodes.is_empty());
        assert!(t.watch_link.as_deref().is_some_and(|l| l.ends_with("/watch/45343")));
    }

    #[tokio::test]
    async fn series_detail_with_season_returns_sorted_episodes() {
        let page = r#"<html><body><h1>Known Show</h1>
            <ul id="listagem">
                <li data-id="30"><a href="/ep-c-3/">C</a></li>
                <li data-id="10"><a href="/ep-a-1/">A</a></li>
                <li data-id="20"><a href="/ep-b-2/">B</a></li>
            </ul></body></html>"#;
        let fetcher = StubFetcher::default().with("https://origin.test/serie/known-show-900/?temporada=2", page);
        let svc = service(fetcher);
        let t = svc.detail("https://origin.test/serie/known-show-900/", Some("2")).await.expect("detail");
        assert!(t.is_series);
        assert_eq!(t.id, "900");
        assert_eq!(t.watch_link, None);
        let names: Vec<_> = t.episodes.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(svc.fetcher.requested(), ["https://origin.test/serie/known-show-900/?temporada=2"]);
    }

    #[test]
    fn season_appends_to_existing_query() {
        assert_eq!(with_season("https://o/x-1/?a=b", "3"), "https://o/x-1/?a=b&temporada=3");
    }

    #[test]
    fn player_embed_defaults_server() {
        let svc = service(StubFetcher::default());
        let p = svc.player_embed("45343", None).expect("embed");
        assert_eq!(p.server, "filemoon");
        assert_eq!(p.url, "https://origin.test/e/getplay.php?id=45343&sv=filemoon");
        assert!(p.iframe.contains(r#"src="https://origin.test/e/getplay.php?id=45343&sv=filemoon""#));

        let p = svc.player_embed("45343", Some("streamtape")).expect("embed");
        assert!(p.url.ends_with("sv=streamtape"));
        assert!(matches!(svc.player_embed(" ", None), Err(ScrapeError::Validation(_))));
    }
}
