//! Retry Policy
//!
//! One policy type shared by the detail-view click, the gallery wait and any
//! other bounded retry loop: attempt budget, delay between attempts, and a
//! predicate deciding which errors are worth another attempt.

mod tests;

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, ScrapeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Base wait between two attempts.
    pub delay: Duration,
    /// Random extra delay in `[0, jitter)` added to every wait.
    pub jitter: Duration,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            jitter: Duration::ZERO,
        }
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last error is returned on exhaustion.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut, P>(&self, label: &str, retryable: P, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
        P: Fn(&ScrapeError) -> bool,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < attempts && retryable(&e) => {
                    debug!(label, attempt, max = attempts, error = %e, "retrying");
                    pause(self.delay, self.jitter).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Sleep for `base` plus up to `jitter`; a zero total returns immediately.
pub async fn pause(base: Duration, jitter: Duration) {
    let total = base + random_below(jitter);
    if !total.is_zero() {
        tokio::time::sleep(total).await;
    }
}

/// Sleep somewhere in `[min, max)`, the way a person would between actions.
/// `max <= min` sleeps exactly `min`.
pub async fn human_pause(min: Duration, max: Duration) {
    pause(min, max.saturating_sub(min)).await
}

/// Uniform in `[0, range)` at millisecond resolution.
fn random_below(range: Duration) -> Duration {
    match range.as_millis() as u64 {
        0 => Duration::ZERO,
        ms => Duration::from_millis(fastrand::u64(0..ms)),
    }
}
