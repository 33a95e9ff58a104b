//! HTTP release feed client
//!
//! Reads release packages with `reqwest`, following the server's `links.next`
//! until it disappears. Rate limiting (429/503) is handled by waiting for
//! `Retry-After` and re-requesting the same page, within the attempt and
//! backoff budget of `[feed.rate_limit]`. Connect errors and timeouts are
//! retried separately per `[feed.retry]`.

use super::backoff::{retry_after_secs, transport_delay, truncate_body};
use super::ReleaseFeed;
use crate::config::FeedConfig;
use crate::core::shutdown::ShutdownSignal;
use crate::domain::{FeedError, ReleasePackage, Result, TenderflowError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Release feed over HTTP
///
/// # Example
///
/// ```no_run
/// use tenderflow::adapters::feed::{FeedClient, ReleaseFeed};
/// use tenderflow::config::load_config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("tenderflow.toml")?;
/// let feed = FeedClient::new(config.feed)?;
///
/// let page = feed.fetch_page(None, None).await?;
/// println!("{} releases, more: {}", page.releases.len(), page.next_page.is_some());
/// # Ok(())
/// # }
/// ```
pub struct FeedClient {
    client: Client,
    config: FeedConfig,
    shutdown: ShutdownSignal,
}

impl FeedClient {
    /// Create a new feed client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            .default_headers(headers)
            .user_agent(concat!("tenderflow/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| {
                TenderflowError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            shutdown: ShutdownSignal::never(),
        })
    }

    /// Abort waits when shutdown is requested
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// URL of the first page: `?limit=<page_size>[&updatedFrom=<RFC 3339>]`
    pub fn first_page_url(
        &self,
        updated_since: Option<DateTime<Utc>>,
    ) -> std::result::Result<Url, FeedError> {
        let mut url = Url::parse(&self.config.endpoint).map_err(|e| {
            FeedError::InvalidResponse(format!(
                "Invalid feed endpoint '{}': {}",
                self.config.endpoint, e
            ))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.config.page_size.to_string());
            if let Some(since) = updated_since {
                query.append_pair(
                    "updatedFrom",
                    &since.to_rfc3339_opts(SecondsFormat::Secs, true),
                );
            }
        }

        Ok(url)
    }

    /// Send one GET, retrying transport failures with exponential backoff
    async fn send_with_retry(
        &self,
        url: &str,
        shutdown: &mut ShutdownSignal,
    ) -> std::result::Result<Response, FeedError> {
        let retry = &self.config.retry;
        let mut attempt: u32 = 0;

        loop {
            match self.client.get(url).send().await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    attempt += 1;
                    if attempt as usize > retry.max_retries {
                        return Err(FeedError::ConnectionFailed(e.to_string()));
                    }

                    let delay = transport_delay(retry, attempt);
                    tracing::warn!(
                        url = %url,
                        attempt = attempt,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying request after transport error"
                    );

                    if !shutdown.sleep(delay).await {
                        return Err(FeedError::Cancelled);
                    }
                }
            }
        }
    }

    /// Request one page until it is served, rejected or the rate-limit budget runs out
    async fn fetch_url(&self, url: &str) -> std::result::Result<ReleasePackage, FeedError> {
        let policy = &self.config.rate_limit;
        let mut shutdown = self.shutdown.clone();
        let mut attempts: u32 = 0;
        let mut waited_secs: u64 = 0;

        loop {
            if shutdown.is_triggered() {
                return Err(FeedError::Cancelled);
            }

            attempts += 1;
            tracing::debug!(url = %url, attempt = attempts, "Requesting page");
            let response = self.send_with_retry(url, &mut shutdown).await?;
            let status = response.status();

            if is_rate_limited(status) {
                let wait = retry_after_secs(
                    response.headers().get(header::RETRY_AFTER),
                    policy.default_retry_after_secs,
                );

                if attempts >= policy.max_attempts
                    || waited_secs.saturating_add(wait) > policy.max_total_backoff_secs
                {
                    tracing::error!(
                        url = %url,
                        status = status.as_u16(),
                        attempts = attempts,
                        waited_secs = waited_secs,
                        "Rate limit budget exhausted"
                    );
                    return Err(FeedError::RateLimitExhausted {
                        attempts,
                        waited_secs,
                    });
                }

                crate::log_retry_attempt!(
                    attempts,
                    policy.max_attempts,
                    format!("HTTP {}, waiting {}s", status.as_u16(), wait)
                );

                if !shutdown.sleep(Duration::from_secs(wait)).await {
                    return Err(FeedError::Cancelled);
                }
                waited_secs += wait;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FeedError::Http {
                    status: status.as_u16(),
                    body: truncate_body(&body),
                });
            }

            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| FeedError::InvalidResponse(e.to_string()))?;

            return ReleasePackage::from_value(body)
                .map_err(|e| FeedError::InvalidResponse(e.to_string()));
        }
    }
}

fn is_rate_limited(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

#[async_trait]
impl ReleaseFeed for FeedClient {
    async fn fetch_page(
        &self,
        next_page: Option<&str>,
        updated_since: Option<DateTime<Utc>>,
    ) -> std::result::Result<ReleasePackage, FeedError> {
        let url = match next_page {
            Some(link) => link.to_string(),
            None => self.first_page_url(updated_since)?.to_string(),
        };

        let page = self.fetch_url(&url).await?;
        tracing::debug!(
            url = %url,
            releases = page.releases.len(),
            has_next = page.next_page.is_some(),
            "Fetched page"
        );
        Ok(page)
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}
