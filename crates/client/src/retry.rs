//! Exponential backoff with jitter, grounded on the indexer's Horizon
//! client `retry_request`, extended with jitter per the platform's
//! transient-dependency-error policy.

use crate::error::{ClientError, Result};
use rand::Rng;
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

pub async fn retry_request<F, Fut, T>(config: &RetryConfig, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempt += 1;
                if !e.is_retryable() || attempt >= config.max_retries {
                    match e.log_level() {
                        tracing::Level::ERROR => tracing::error!("request failed after {attempt} attempts: {e}"),
                        tracing::Level::WARN => tracing::warn!("request failed after {attempt} attempts: {e}"),
                        _ => tracing::info!("request failed after {attempt} attempts: {e}"),
                    }
                    return Err(e);
                }

                let jitter_ms = rand::thread_rng().gen_range(0..=delay_ms / 4 + 1);
                let sleep_ms = delay_ms + jitter_ms;
                debug!("request failed (attempt {attempt}/{}), retrying in {sleep_ms}ms: {e}", config.max_retries);
                tokio::time::sleep(Duration::from_millis(sleep_ms)).await;

                delay_ms = ((delay_ms as f64) * config.backoff_multiplier) as u64;
                delay_ms = delay_ms.min(config.max_delay_ms);
            }
        }
    }
}

/// Classifies a completed HTTP response as success or a typed upstream
/// error, the shape used by every endpoint method on `ControlPlaneClient`.
pub async fn ok_or_upstream(endpoint: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Upstream {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}
