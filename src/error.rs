use thiserror::Error;

/// Failure retrieving one feed over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    TimedOut { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure turning fetched bytes into feed items.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed feed from {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },
}

/// Invalid or missing configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no feeds configured")]
    NoFeeds,

    #[error("feed #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("feed name '{0}' is configured more than once")]
    DuplicateName(String),

    #[error("feed '{name}' has an invalid url '{url}'")]
    InvalidUrl { name: String, url: String },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// Why a single source contributed nothing to an aggregation.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("source did not finish before the aggregation deadline")]
    DeadlineExceeded,
}
