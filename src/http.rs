//! Shared outbound HTTP client

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::HttpConfig;

/// Longest wait between two retry attempts
pub const RETRY_BACKOFF_MAX: Duration = Duration::from_secs(5);
const RETRY_BACKOFF_MIN: Duration = Duration::from_millis(500);

/// Per-call timeouts handed to every provider
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub request: Duration,
    pub image: Duration,
    pub llm: Duration,
}

impl Timeouts {
    /// Worst case of one call with `timeout`, counting every retry and its backoff
    #[must_use]
    pub fn with_retries(timeout: Duration, max_retries: u32) -> Duration {
        timeout * (max_retries + 1) + RETRY_BACKOFF_MAX * max_retries
    }
}

impl From<&HttpConfig> for Timeouts {
    fn from(config: &HttpConfig) -> Self {
        Self {
            request: Duration::from_secs(config.timeout_seconds.into()),
            image: Duration::from_secs(config.image_timeout_seconds.into()),
            llm: Duration::from_secs(config.llm_timeout_seconds.into()),
        }
    }
}

/// Build the client every provider shares.
///
/// Retries are only attached when `max_retries` is positive, so by default
/// each provider call is attempted exactly once.
pub fn build_client(config: &HttpConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        let policy = ExponentialBackoff::builder()
            .retry_bounds(RETRY_BACKOFF_MIN, RETRY_BACKOFF_MAX)
            .build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}
