use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// Runs the future produced by `get_future` until it succeeds or the policy
/// gives up. The error of the last attempt is returned.
pub async fn with_retry<F, Fut, R, Err>(get_future: F, policy: RetryPolicy) -> Result<R, Err>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<R, Err>>,
{
    let mut attempt: u64 = 0;

    loop {
        attempt = attempt.saturating_add(1);

        match get_future().await {
            Ok(result) => return Ok(result),
            Err(err) => match policy.delay_before_retry(attempt) {
                Some(delay) => {
                    warn!(attempt, delay = ?delay, "request failed, retrying");
                    sleep(delay).await;
                }
                None => return Err(err),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    RepeatConstant { sleep: Duration, max_attempts: u64 },
    NoRetry,
}

impl RetryPolicy {
    pub fn repeat_constant(sleep: Duration, max_attempts: u64) -> Self {
        RetryPolicy::RepeatConstant {
            sleep,
            max_attempts,
        }
    }

    fn delay_before_retry(&self, failed_attempts: u64) -> Option<Duration> {
        match self {
            RetryPolicy::RepeatConstant {
                sleep,
                max_attempts,
            } if failed_attempts < *max_attempts => Some(*sleep),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn should_return_first_success_without_sleeping() {
        let counter = AtomicU64::new(0);
        let calls = &counter;
        let start = Instant::now();

        let result = with_retry(
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(5)
            },
            RetryPolicy::repeat_constant(Duration::from_secs(1), 3),
        )
        .await;

        assert_eq!(result, Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn should_retry_until_success() {
        let counter = AtomicU64::new(0);
        let calls = &counter;
        let start = Instant::now();

        let result = with_retry(
            || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("unavailable")
                } else {
                    Ok(7)
                }
            },
            RetryPolicy::repeat_constant(Duration::from_secs(1), 5),
        )
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn should_give_up_after_max_attempts() {
        let counter = AtomicU64::new(0);
        let calls = &counter;

        let result = with_retry(
            || async move { Err::<(), _>(calls.fetch_add(1, Ordering::SeqCst)) },
            RetryPolicy::repeat_constant(Duration::from_millis(10), 3),
        )
        .await;

        assert_eq!(result, Err(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn no_retry_should_try_once() {
        let counter = AtomicU64::new(0);
        let calls = &counter;

        let result = with_retry(
            || async move { Err::<(), _>(calls.fetch_add(1, Ordering::SeqCst)) },
            RetryPolicy::NoRetry,
        )
        .await;

        assert_eq!(result, Err(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
