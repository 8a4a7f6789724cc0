//! Bounded retry with exponential backoff for idempotent fetches.
//!
//! Used for the initial session fetch and the plan listing. Credential
//! operations (sign-in/up/out) are never retried.
//!
//! Client-side (hydrate): delays sleep on a browser timer.
//! Elsewhere (SSR, tests): delays are skipped.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use std::future::Future;

/// Attempt budget and delay curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero behaves like one.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay_ms: 500, max_delay_ms: 4_000 }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    #[must_use]
    pub fn none() -> Self {
        Self { max_attempts: 1, base_delay_ms: 0, max_delay_ms: 0 }
    }

    /// Delay before attempt `attempt` (1-based). The first attempt never waits.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> u64 {
        if attempt <= 1 {
            return 0;
        }
        let doublings = (attempt - 2).min(32);
        self.base_delay_ms.saturating_mul(1 << doublings).min(self.max_delay_ms)
    }
}

/// Run `op` until it succeeds or the attempt budget is spent.
///
/// `on_retry` is told the attempt number (2, 3, ...) before each retry so the
/// UI can show a distinct retrying state.
///
/// # Errors
///
/// Returns the last error once every attempt has failed.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F, on_retry: impl Fn(u32)) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                attempt += 1;
                #[cfg(feature = "hydrate")]
                log::warn!("attempt {} failed, retrying: {e}", attempt - 1);
                #[cfg(not(feature = "hydrate"))]
                let _ = &e;
                on_retry(attempt);
                backoff_sleep(policy.delay_before(attempt)).await;
            }
        }
    }
}

async fn backoff_sleep(ms: u64) {
    #[cfg(feature = "hydrate")]
    {
        if ms > 0 {
            gloo_timers::future::sleep(std::time::Duration::from_millis(ms)).await;
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = ms;
    }
}
