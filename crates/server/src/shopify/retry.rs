//! Bounded retry for outbound Shopify requests.
//!
//! Every request gets a fixed number of attempts with a fixed pause between
//! them. No backoff, no jitter.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// How many times to attempt a request, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Default number of attempts per request.
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    /// Default pause between attempts, in milliseconds.
    pub const DEFAULT_DELAY_MS: u64 = 500;

    /// Create a policy. `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ATTEMPTS,
            Duration::from_millis(Self::DEFAULT_DELAY_MS),
        )
    }
}

/// Run `operation` until it succeeds or `policy.max_attempts` is reached.
///
/// Returns the first success, or the error from the final attempt.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %err, "Shopify request failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(attempt, max_attempts, error = %err, "Shopify request failed, giving up");
                return Err(err);
            }
        }
    }
}
