use thiserror::Error;

/// Failures surfaced by the scrape backend and the controller driving it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    /// The HTTP call could not be completed
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status
    #[error("backend returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The response body could not be decoded at all
    #[error("could not decode backend response: {0}")]
    Parse(String),

    /// The request shape has no matching backend endpoint
    #[error("{0} is not supported for this request type")]
    Unsupported(&'static str),

    /// Export or summary was requested before any scrape was started
    #[error("no scrape request is active")]
    NoActiveRequest,
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScrapeError::Parse(err.to_string())
        } else {
            ScrapeError::Request(err.to_string())
        }
    }
}

/// Failures while loading client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid backend URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not build HTTP client: {0}")]
    Client(String),
}
