//! Retry with exponential backoff for flaky provider calls.
//!
//! Permanent failures (rejected content, bad credentials, invalid
//! parameters) fail fast; everything else is considered transient and
//! retried with a doubling delay.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry (doubles each attempt).
    pub base_delay: Duration,
    /// Backoff multiplier applied after each failed attempt.
    pub backoff_multiplier: f64,
    /// Operation name for logging.
    pub operation_name: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(2000),
            backoff_multiplier: 2.0,
            operation_name: "operation".to_string(),
        }
    }
}

impl RetryConfig {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `retry` (1-based).
    fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(retry.saturating_sub(1) as i32);
        self.base_delay.mul_f64(factor)
    }
}

/// Messages that mark an error as permanent. Matched case-insensitively as
/// substrings of the error's display output.
const PERMANENT_MARKERS: &[&str] = &[
    "content policy violation",
    "content could not be processed",
    "unauthorized",
    "invalid api key",
    "authentication failed",
    "invalid parameter",
    "validation error",
];

/// Whether an error message describes a failure no retry can fix.
pub fn is_permanent_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    PERMANENT_MARKERS.iter().any(|m| lower.contains(m))
}

/// Execute an async operation with bounded retries and backoff.
///
/// Stops immediately when the error classifies as permanent.
pub async fn retry_async<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_async_with(
        config,
        operation,
        |e: &E| !is_permanent_failure(&e.to_string()),
        |_, _| {},
    )
    .await
}

/// [`retry_async`] with a custom retry predicate and per-retry observer.
///
/// `should_retry` replaces the built-in classifier; `on_retry` is invoked
/// with the attempt number and the error before each wait.
pub async fn retry_async_with<F, Fut, T, E, P, O>(
    config: &RetryConfig,
    operation: F,
    should_retry: P,
    mut on_retry: O,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
    O: FnMut(u32, &E),
{
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !should_retry(&e) {
                    warn!(
                        "{} failed permanently on attempt {}: {}",
                        config.operation_name, attempt, e
                    );
                    return Err(e);
                }
                if attempt >= config.max_attempts {
                    warn!(
                        "{} failed after {} attempts: {}",
                        config.operation_name, attempt, e
                    );
                    return Err(e);
                }
                let delay = config.delay_for_retry(attempt);
                debug!(
                    "{} attempt {} failed, retrying in {:?}: {}",
                    config.operation_name, attempt, delay, e
                );
                on_retry(attempt, &e);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(name: &str, attempts: u32) -> RetryConfig {
        RetryConfig::new(name)
            .with_max_attempts(attempts)
            .with_base_delay(Duration::from_millis(1))
    }

    #[test]
    fn classifies_permanent_failures() {
        assert!(is_permanent_failure("Content policy violation: nsfw"));
        assert!(is_permanent_failure("UNAUTHORIZED: invalid API key"));
        assert!(is_permanent_failure("invalid parameter 'duration'"));
        assert!(!is_permanent_failure("connection reset by peer"));
        assert!(!is_permanent_failure("Job timed out after 300 status checks"));
    }

    #[test]
    fn backoff_doubles() {
        let config = RetryConfig::new("test").with_base_delay(Duration::from_millis(100));
        assert_eq!(config.delay_for_retry(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_retry(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_retry(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn retries_transient_errors() {
        let calls = AtomicU32::new(0);
        let result = retry_async(&fast("test", 3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("connection reset".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_on_permanent_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_async(&fast("test", 3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("Content policy violation: rejected".to_string()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn custom_predicate_and_observer() {
        let calls = AtomicU32::new(0);
        let observed = AtomicU32::new(0);
        let result: Result<(), String> = retry_async_with(
            &fast("test", 3),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("anything".to_string()) }
            },
            |e| !e.contains("anything"),
            |attempt, _| {
                observed.store(attempt, Ordering::SeqCst);
            },
        )
        .await;
        assert!(result.is_err());
        // Predicate says never retry, so one call and no observer firing.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(observed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhausts_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_async(&fast("test", 3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("timeout".to_string()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
