//! HTTP client for Daraz listing pages.

mod relay;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

pub use relay::relay_url;

/// Fetches listing-page markup, optionally through a CORS relay.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors (429, network failures, 5xx) are retried
/// with exponential backoff up to `max_retries` additional attempts.
pub struct PageClient {
    client: Client,
    /// Relay prefix; empty means targets are fetched directly.
    cors_proxy: String,
    max_retries: u32,
    /// Base delay for backoff: `backoff_base_ms * 2^(retry - 1)`.
    backoff_base_ms: u64,
}

impl PageClient {
    /// Creates a `PageClient` with the configured timeout, `User-Agent`,
    /// relay prefix, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        cors_proxy: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            cors_proxy: cors_proxy.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches the page at `url` and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: `url` is not an absolute http(s) URL (not retried).
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries. A numeric
    ///   `Retry-After` is the minimum wait before the next attempt; without
    ///   one `retry_after_secs` is 0 and plain back-off applies.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let request_url = relay_url(&self.cors_proxy, url)?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let request_url = request_url.clone();
            async move {
                let response = self
                    .client
                    .get(&request_url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(0);
                    return Err(ScraperError::RateLimited {
                        domain: relay::extract_domain(url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound {
                        url: url.to_owned(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                let body = response.text().await?;
                tracing::debug!(url, bytes = body.len(), "fetched listing page");
                Ok(body)
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
