use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::registry::Source;

pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.fetch_timeout(), &config.user_agent)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retrieve the raw feed document for one source.
    pub async fn fetch(&self, source: &Source) -> Result<Vec<u8>, FetchError> {
        info!("Fetching: {} -> {}", source.name, source.url);

        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(|e| Self::classify(&source.url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} for '{}'", status, source.name);
            return Err(FetchError::Status {
                url: source.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::classify(&source.url, e))?;

        info!("{}: HTTP {}, {} bytes", source.name, status, bytes.len());
        Ok(bytes.to_vec())
    }

    fn classify(url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::TimedOut {
                url: url.to_string(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source: err,
            }
        }
    }
}
