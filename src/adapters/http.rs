//! Rate-limited REST client shared by the hosted-API adapters.
//!
//! Wraps reqwest with a concurrency cap, bounded retries with
//! exponential backoff, and optional API-key authentication. Transient
//! failures (connection errors, 5xx, 429) are retried; anything else is
//! surfaced immediately with the response body in the error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for a hosted-API REST client.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Header name carrying the API key, when one is set.
    pub api_key_header: &'static str,
    /// API key. Requests run unauthenticated without one.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum concurrent requests.
    pub max_concurrent: usize,
    /// Maximum retries on transient errors.
    pub max_retries: u32,
    /// Base delay between retries (exponential backoff).
    pub retry_base_delay: Duration,
}

impl RestClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key_header: "x-api-key",
            api_key,
            timeout: Duration::from_secs(30),
            max_concurrent: 10,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(200),
        }
    }
}

/// Rate-limited HTTP client for one hosted API.
pub struct RestClient {
    http: Client,
    config: RestClientConfig,
    semaphore: Arc<Semaphore>,
}

impl RestClient {
    pub fn new(config: RestClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .build()
            .context("Failed to build HTTP client")?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

        Ok(Self {
            http,
            config,
            semaphore,
        })
    }

    /// GET `path` (with query string already attached) and decode JSON.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        let request = self.http.get(&url);
        let response = self.execute_with_retry(request, "GET", path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Malformed JSON from GET {path}"))
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        let request = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body.to_string());
        let response = self.execute_with_retry(request, "POST", path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Malformed JSON from POST {path}"))
    }

    /// Execute a request with authentication, concurrency cap, and retries.
    async fn execute_with_retry(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<Response> {
        let _permit = self.semaphore.acquire().await.context("Semaphore closed")?;

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis(), method, path, "Retrying request");
                sleep(delay).await;
            }

            let mut req = request.try_clone().context("Failed to clone request")?;
            if let Some(key) = &self.config.api_key {
                req = req.header(self.config.api_key_header, key);
            }

            match req.send().await {
                Ok(response) => match response.status() {
                    status if status.is_success() => return Ok(response),
                    StatusCode::TOO_MANY_REQUESTS => {
                        warn!(method, path, "Rate limited, backing off");
                        sleep(Duration::from_secs(2)).await;
                        last_error = Some(anyhow::anyhow!("Rate limited"));
                        continue;
                    }
                    status if status.is_server_error() => {
                        warn!(status = %status, method, path, "Server error, retrying");
                        last_error = Some(anyhow::anyhow!("Server error: {status}"));
                        continue;
                    }
                    status => {
                        let body = response.text().await.unwrap_or_default();
                        return Err(anyhow::anyhow!("API error {status}: {body}"));
                    }
                },
                Err(e) => {
                    warn!(error = %e, attempt, method, path, "Request failed");
                    last_error = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
    }
}
