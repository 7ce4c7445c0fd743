//! Bounded fixed-delay retry.
//!
//! The backend sleeps when idle and answers with errors for a few seconds
//! while it wakes, so every call is wrapped in [`with_retry`]. Each retry is
//! reported through a notice callback so the widget can say why it is
//! waiting.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::config::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
use super::types::NetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one. Total attempts is `max_retries + 1`.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS) }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Handed to the notice callback before each wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryNotice {
    /// The attempt that just failed, starting at 1.
    pub attempt: u32,
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Waits between attempts. Tokio on native, browser timers in the shell.
#[async_trait(?Send)]
pub trait Sleeper {
    async fn sleep(&self, delay: Duration);
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are used up. The last error is returned unchanged.
///
/// # Errors
///
/// Returns the final [`NetError`] from `op`.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    sleeper: &dyn Sleeper,
    notify: &mut dyn FnMut(RetryNotice),
    mut op: F,
) -> Result<T, NetError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NetError>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.retryable() && attempt < max_attempts => {
                warn!(error = %e, attempt, total = max_attempts, "request failed; retrying");
                notify(RetryNotice { attempt, max_attempts, delay: policy.delay });
                sleeper.sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(error = %e, attempt, "request failed; giving up");
                return Err(e);
            }
        }
    }
}
