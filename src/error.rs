use thiserror::Error;

/// Request-scoped failures. Per-entry extraction misses are not errors:
/// parsers return `Option` and the aggregators drop them.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl ScrapeError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        ScrapeError::Validation(msg.into())
    }

    /// Message safe to show to the caller. Only validation errors carry
    /// their own text; everything else collapses to the operation's fallback.
    pub fn public_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ScrapeError::Validation(msg) => msg,
            _ => fallback,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
