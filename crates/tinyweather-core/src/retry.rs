//! Retry utilities for outbound HTTP calls with exponential backoff.
//!
//! Retried: timeouts, connection failures, 5xx, 408 and 429.
//! Not retried: any other 4xx, request construction errors.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt)
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// No retries at all; used by tests and one-shot lookups.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis() as u64);
        Duration::from_millis(capped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Classify a transport-level reqwest error
pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }
    if error.is_request() {
        return RetryDecision::NoRetry;
    }
    match error.status() {
        Some(status) => is_retryable_status(status),
        None => RetryDecision::NoRetry,
    }
}

/// Classify an HTTP status code
pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        return RetryDecision::Retry;
    }
    RetryDecision::NoRetry
}

/// Execute an HTTP request with retry logic.
///
/// The final attempt's outcome is returned as-is, so a response with a
/// retryable status comes back as `Ok` once retries are exhausted and the
/// caller's status handling applies.
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        let last_attempt = attempt >= config.max_retries;
        match operation().await {
            Ok(response) => {
                let status = response.status();
                if last_attempt || is_retryable_status(status) == RetryDecision::NoRetry {
                    if attempt > 0 {
                        tracing::info!("Request finished with {} after {} retries", status, attempt);
                    }
                    return Ok(response);
                }
                tracing::warn!(
                    "Request returned retryable status {}, attempt {} of {}",
                    status,
                    attempt + 1,
                    config.max_retries + 1
                );
            }
            Err(e) => {
                if last_attempt || is_retryable_error(&e) == RetryDecision::NoRetry {
                    tracing::debug!("Giving up on request: {}", e);
                    return Err(e);
                }
                tracing::warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    config.max_retries + 1,
                    e
                );
            }
        }

        let delay = config.delay_for_attempt(attempt);
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
