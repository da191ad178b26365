//! Cooldown-and-retry for rate-limited searches.
//!
//! [`retry_on_rate_limit`] wraps a fallible async search and retries it only on
//! [`SearchError::RateLimited`]. Every other error is returned immediately.
//! The wait before each retry follows the provider's reset time when one was
//! given, otherwise the policy's fixed cooldown, and is capped by
//! [`RetryPolicy::max_cooldown`]. The loop is bounded by
//! [`RetryPolicy::max_attempts`] and ends in [`SearchError::RateLimitExhausted`].

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;

/// Bounds for the rate-limit retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Wait used when the provider gave no reset time.
    pub default_cooldown: Duration,
    /// Cap on any single wait.
    pub max_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_cooldown: Duration::from_secs(15 * 60),
            max_cooldown: Duration::from_secs(15 * 60),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, default_cooldown: Duration, max_cooldown: Duration) -> Self {
        Self {
            max_attempts,
            default_cooldown,
            max_cooldown,
        }
    }

    /// How long to wait before retrying, given the provider's reset time.
    ///
    /// A reset time already in the past yields zero.
    #[must_use]
    pub fn cooldown_for(&self, reset_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Duration {
        let wait = match reset_at {
            Some(reset) => (reset - now).to_std().unwrap_or(Duration::ZERO),
            None => self.default_cooldown,
        };
        wait.min(self.max_cooldown)
    }
}

/// Runs `operation`, re-issuing it after a cooldown each time it reports
/// [`SearchError::RateLimited`].
///
/// `operation` must rebuild the identical request on each call. Cancelling
/// `cancel` during a cooldown returns [`SearchError::Cancelled`].
///
/// # Errors
///
/// - [`SearchError::RateLimitExhausted`] once `max_attempts` attempts were all
///   rate limited.
/// - [`SearchError::Cancelled`] if cancelled while cooling down.
/// - Any non-rate-limit error from `operation`, unchanged.
pub async fn retry_on_rate_limit<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, SearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(SearchError::RateLimited { reset_at }) => {
                if attempt >= max_attempts {
                    tracing::error!(attempts = attempt, "search still rate limited, giving up");
                    return Err(SearchError::RateLimitExhausted { attempts: attempt });
                }
                let delay = policy.cooldown_for(reset_at, Utc::now());
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_secs = delay.as_secs(),
                    reset_at = ?reset_at,
                    "search rate limited; cooling down before retrying"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        tracing::info!(attempt, "rate-limit cooldown cancelled");
                        return Err(SearchError::Cancelled);
                    }
                    () = tokio::time::sleep(delay) => {}
                }
            }
            Err(err) => return Err(err),
        }
    }
}
