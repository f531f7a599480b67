use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.pobreflixtv.uk";
pub const DEFAULT_SERVICE_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PLAYER_SERVER: &str = "filemoon";

/// Positional knobs for the detail template. The year has no semantic
/// selector upstream, so it is read as the N-th `.infos span`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLayout {
    pub year_info_index: usize,
}

impl Default for DetailLayout {
    fn default() -> Self {
        DetailLayout { year_info_index: 1 }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Origin site; relative links and thumbnails are rebased on it.
    pub base_url: String,
    /// Our own scheme+host, used for movie watch links.
    pub service_origin: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub layout: DetailLayout,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            service_origin: DEFAULT_SERVICE_ORIGIN.to_string(),
            proxy: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            layout: DetailLayout::default(),
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let timeout = env_nonempty("FLIX_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let year_info_index = env_nonempty("FLIX_YEAR_INFO_INDEX")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.layout.year_info_index);
        Config {
            base_url: env_nonempty("FLIX_BASE_URL").unwrap_or(defaults.base_url),
            service_origin: env_nonempty("FLIX_SERVICE_ORIGIN").unwrap_or(defaults.service_origin),
            proxy: env_nonempty("FLIX_HTTP_PROXY"),
            timeout,
            layout: DetailLayout { year_info_index },
        }
        .normalized()
    }

    /// Apply CLI overrides on top of the environment.
    pub fn with_overrides(mut self, base_url: Option<String>, service_origin: Option<String>) -> Self {
        if let Some(b) = base_url {
            self.base_url = b;
        }
        if let Some(o) = service_origin {
            self.service_origin = o;
        }
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self.service_origin = self.service_origin.trim_end_matches('/').to_string();
        self
    }
}
