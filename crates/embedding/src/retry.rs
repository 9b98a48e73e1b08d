//! Bounded retry with exponential backoff for transient provider failures.
//!
//! Only errors for which [`EmbeddingError::is_transient`] holds are retried. Everything
//! else is returned after the first attempt.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

use crate::EmbeddingError;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call. `0` disables retries.
    pub max_retries: u32,
    /// Base delay between retries (doubled per attempt), in milliseconds on the wire.
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    /// Add up to 50% random jitter on top of each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Result of a retried operation.
#[derive(Debug, Clone)]
pub struct RetryResult<T> {
    /// Final outcome (last error when every attempt failed).
    pub result: Result<T, EmbeddingError>,
    /// Number of attempts made (1 = no retries needed).
    pub attempts: u32,
    /// Total time spent across attempts and delays.
    pub total_duration: Duration,
}

impl<T> RetryResult<T> {
    pub fn into_result(self) -> Result<T, EmbeddingError> {
        self.result
    }

    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Execute an async operation, retrying transient failures.
///
/// The closure receives the zero-based attempt number.
pub async fn execute_with_retry_async<T, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
) -> RetryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, EmbeddingError>>,
{
    let start = Instant::now();
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryResult {
                    result: Ok(value),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
            Err(error) if error.is_transient() && attempt < config.max_retries => {
                let delay = calculate_delay(config, attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "transient provider failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                return RetryResult {
                    result: Err(error),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
        }
    }
}

/// Calculate delay for a retry attempt with exponential backoff.
fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.base_delay.as_millis() as u64;
    let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
    let delay = exponential.min(config.max_delay.as_millis() as u64);

    if config.jitter {
        // Add 0-50% random jitter
        let jitter = fastrand::u64(0..=delay / 2);
        Duration::from_millis(delay + jitter)
    } else {
        Duration::from_millis(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig::default()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(1))
            .with_jitter(false)
    }

    #[tokio::test]
    async fn retry_succeeds_eventually() {
        let calls = AtomicU32::new(0);
        let result = execute_with_retry_async(&fast_config(3), |_attempt| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(EmbeddingError::ProviderUnavailable("connection reset".into()))
                } else {
                    Ok("success")
                }
            }
        })
        .await;

        assert!(result.succeeded());
        assert_eq!(result.attempts, 3);
        assert_eq!(result.into_result().unwrap(), "success");
    }

    #[tokio::test]
    async fn retry_fails_after_max_attempts() {
        let result: RetryResult<()> = execute_with_retry_async(&fast_config(2), |_| async {
            Err(EmbeddingError::ProviderRateLimited("HTTP 429".into()))
        })
        .await;

        assert!(!result.succeeded());
        assert_eq!(result.attempts, 3); // Initial + 2 retries
        assert!(matches!(
            result.into_result(),
            Err(EmbeddingError::ProviderRateLimited(_))
        ));
    }

    #[tokio::test]
    async fn non_transient_errors_are_not_retried() {
        let result: RetryResult<()> = execute_with_retry_async(&fast_config(5), |_| async {
            Err(EmbeddingError::ProviderRejectedInput("HTTP 400".into()))
        })
        .await;

        assert_eq!(result.attempts, 1);
        assert!(!result.succeeded());
    }

    #[tokio::test]
    async fn disabled_config_makes_one_attempt() {
        let result: RetryResult<()> = execute_with_retry_async(&RetryConfig::disabled(), |_| async {
            Err(EmbeddingError::ProviderUnavailable("timeout".into()))
        })
        .await;

        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn delay_grows_and_is_capped() {
        let cfg = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(300))
            .with_jitter(false);
        assert_eq!(calculate_delay(&cfg, 0), Duration::from_millis(100));
        assert_eq!(calculate_delay(&cfg, 1), Duration::from_millis(200));
        assert_eq!(calculate_delay(&cfg, 2), Duration::from_millis(300));
        assert_eq!(calculate_delay(&cfg, 40), Duration::from_millis(300));
    }

    #[test]
    fn jitter_stays_within_half_delay() {
        let cfg = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_jitter(true);
        for _ in 0..50 {
            let d = calculate_delay(&cfg, 0);
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(150));
        }
    }

    #[test]
    fn config_serializes_durations_as_millis() {
        let json = serde_json::to_value(RetryConfig::default()).unwrap();
        assert_eq!(json["base_delay"], 200);
        assert_eq!(json["max_delay"], 2000);

        let parsed: RetryConfig = serde_json::from_str(r#"{"max_retries":0}"#).unwrap();
        assert_eq!(parsed.max_retries, 0);
        assert_eq!(parsed.base_delay, Duration::from_millis(200));
    }
}
