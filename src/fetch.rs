use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, ScrapeError};

const UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0 Safari/537.36";

/// Source of raw page markup. The service only needs the body text; parsing
/// happens afterwards, synchronously, on the caller's side.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(UA));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers())
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(HttpFetcher { client: builder.build()? })
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");
        let fetch_err = |source: reqwest::Error| ScrapeError::Fetch { url: url.to_string(), source };
        let resp = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { url: url.to_string(), status });
        }
        let body = resp.text().await.map_err(fetch_err)?;
        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
