use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::error::JudgeError;
use crate::constants::DEFAULT_MAX_ATTEMPTS;

/// Default base delay; attempt `n` waits `n × base` before the next try.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
/// Bounded retry with linear backoff around a judgment call.
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
    retryable: fn(&JudgeError) -> bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
            retryable: JudgeError::is_retryable,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Overrides which errors are retried.
    pub fn with_predicate(mut self, retryable: fn(&JudgeError) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or attempts run out.
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, JudgeError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, JudgeError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let err = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if attempt >= self.max_attempts || !(self.retryable)(&err) {
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Judgment call throttled, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn throttled() -> JudgeError {
        JudgeError::Throttled {
            message: "429".to_string(),
        }
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for(2), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_throttling_then_succeeds() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = RetryPolicy::default()
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(throttled())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::default()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(throttled()) }
            })
            .await;

        assert_eq!(result, Err(throttled()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_aborts_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::default()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(JudgeError::Malformed {
                        reason: "not json".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(JudgeError::Malformed { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_predicate() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::ZERO).with_predicate(|_| true);

        let _: Result<(), _> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(JudgeError::EmptyResponse) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
