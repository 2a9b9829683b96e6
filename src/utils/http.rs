use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::{RetryPolicy, Settings};
use crate::error::{Result, ScrapeError};

pub fn create_client(settings: &Settings) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .pool_max_idle_per_host(6)
        .build()
        .map_err(|e| ScrapeError::transport(&settings.base_url, e))?;

    Ok(client)
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`.
pub fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(policy.base_delay_ms.saturating_mul(factor))
}

/// GET `url`, retrying retryable failures with exponential backoff.
/// Client errors such as 404 fail on the first attempt.
pub async fn fetch_with_retry(client: &Client, url: &str, policy: RetryPolicy) -> Result<Response> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let err = match client.get(url).send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => {
                let status = response.status();
                warn!("HTTP error {}: {}", status, url);
                ScrapeError::Fetch {
                    url: url.to_string(),
                    status: status.as_u16(),
                }
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                ScrapeError::transport(url, e)
            }
        };

        if attempts >= max_attempts || !err.is_retryable() {
            return Err(err);
        }

        let delay = backoff_delay(&policy, attempts);
        warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_attempts);
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay_ms: 100,
        };
        assert_eq!(backoff_delay(&policy, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(&policy, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(&policy, 3), Duration::from_millis(400));
    }
}
