// src/retry.rs
//
// Exponential-backoff wrapper for fallible async operations. Explicit loop
// with an attempt counter, so the backoff formula stays independently
// testable and the stack stays flat.
//
// Known limitation: no jitter and no maximum delay cap, so concurrent
// callers hitting a sustained outage back off in lockstep.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the given 1-based failed attempt: doubles each time
    /// (1s, 2s, 4s, ...).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Run `op` until it succeeds or the attempt budget is spent; the last error
/// is returned unchanged. Retries on any error.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    with_retry_when(policy, op, |_| true).await
}

/// Like [`with_retry`], but only errors for which `should_retry` returns
/// true consume further attempts; others short-circuit immediately.
pub async fn with_retry_when<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut op: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt >= attempts || !should_retry(&e) {
                    return Err(e);
                }
                let delay = policy.delay_after(attempt);
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying");
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
