//! Shared HTTP fetcher for source adapters
//!
//! Applies the request timeout, user agent and retry policy used by every
//! upstream market. Only the final failure is surfaced to the caller.

use super::SourceError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default user agent sent to upstream markets
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 PolyStrikeBot/1.0";

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Total attempts per request (at least one)
    pub attempts: u32,
    /// Base delay; attempt `n` waits `base_delay * n` before retrying
    pub base_delay: Duration,
    /// User agent header
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            attempts: 3,
            base_delay: Duration::from_millis(500),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Delay before the retry that follows `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// JSON-over-HTTP fetcher with retry
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    config: FetchConfig,
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given configuration
    pub fn new(config: FetchConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `url` and decode the body as JSON, retrying transient failures
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.get_once(url, query, headers).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    let delay = self.config.backoff(attempt);
                    tracing::debug!(
                        url = %url,
                        attempt,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
