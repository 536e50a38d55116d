use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// How far back an item counts as recent, in hours
    #[serde(default = "default_hours_window")]
    pub hours_window: u32,
    /// Per-feed HTTP timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Optional ceiling for a whole aggregation run, in seconds
    #[serde(default)]
    pub aggregate_timeout_secs: Option<u64>,
    /// Items kept per source when nothing falls inside the window
    #[serde(default = "default_fallback_per_source")]
    pub fallback_per_source: usize,
    /// Global trim applied after merging
    #[serde(default = "default_max_items")]
    pub max_items: Option<usize>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    pub feeds: Vec<FeedConfig>,
}

fn default_hours_window() -> u32 {
    24
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_fallback_per_source() -> usize {
    1
}

fn default_max_items() -> Option<usize> {
    Some(120)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        .to_string()
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse and validate config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.hours_window))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn aggregate_timeout(&self) -> Option<Duration> {
        self.aggregate_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hours_window == 0 {
            return Err(ConfigError::NotPositive {
                field: "hours_window",
            });
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "fetch_timeout_secs",
            });
        }
        if self.aggregate_timeout_secs == Some(0) {
            return Err(ConfigError::NotPositive {
                field: "aggregate_timeout_secs",
            });
        }
        if self.fallback_per_source == 0 {
            return Err(ConfigError::NotPositive {
                field: "fallback_per_source",
            });
        }
        if self.feeds.is_empty() {
            return Err(ConfigError::NoFeeds);
        }

        let mut seen = HashSet::new();
        for (index, feed) in self.feeds.iter().enumerate() {
            let name = feed.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyName { index });
            }
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateName(name.to_string()));
            }
            let scheme_ok = reqwest::Url::parse(feed.url.trim())
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !scheme_ok {
                return Err(ConfigError::InvalidUrl {
                    name: name.to_string(),
                    url: feed.url.clone(),
                });
            }
        }

        Ok(())
    }
}
