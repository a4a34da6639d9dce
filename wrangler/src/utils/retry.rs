//! Bounded retry with exponential backoff
//!
//! Used at the registration client boundary only. With `max_attempts = 1`
//! (the default) the operation runs once and its result is returned as-is,
//! leaving retries to the next scheduled run.
//!
//! **Backoff Strategy:**
//! - Initial delay: 100ms
//! - Max delay: 2000ms
//! - Multiplier: 2.0 (exponential)

use std::time::Duration;

const INITIAL_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 2000;

/// Retry an async operation while `should_retry` accepts its result
///
/// # Arguments
/// * `operation_name` - Name for logging (e.g., "plate submission")
/// * `max_attempts` - Total attempts including the first; values below 1 count as 1
/// * `should_retry` - Decides whether a finished attempt is worth repeating
/// * `operation` - Async closure performing one attempt
///
/// # Returns
/// The result of the last attempt made
pub async fn retry_with_backoff<F, Fut, T, R>(
    operation_name: &str,
    max_attempts: u32,
    should_retry: R,
    mut operation: F,
) -> T
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = T>,
    R: Fn(&T) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut backoff_ms = INITIAL_BACKOFF_MS;
    let mut attempt = 1;

    loop {
        let result = operation().await;

        if attempt >= max_attempts || !should_retry(&result) {
            if attempt > 1 {
                tracing::debug!(operation = operation_name, attempt, "Finished after retry");
            }
            return result;
        }

        tracing::warn!(
            operation = operation_name,
            attempt,
            max_attempts,
            backoff_ms,
            "Attempt failed, will retry after backoff"
        );

        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_single_attempt_never_retries() {
        let attempts = &AtomicU32::new(0);

        let result: Result<i32, &str> = retry_with_backoff(
            "test_op",
            1,
            |r: &Result<i32, &str>| r.is_err(),
            || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("down")
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let attempts = &AtomicU32::new(0);

        let result: Result<i32, &str> = retry_with_backoff(
            "test_op",
            5,
            |r: &Result<i32, &str>| r.is_err(),
            || async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("down")
                } else {
                    Ok(42)
                }
            },
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let attempts = &AtomicU32::new(0);

        let result: Result<i32, &str> = retry_with_backoff(
            "test_op",
            3,
            |r: &Result<i32, &str>| r.is_err(),
            || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("down")
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_result_returns_immediately() {
        let attempts = &AtomicU32::new(0);

        let result: Result<i32, &str> = retry_with_backoff(
            "test_op",
            5,
            |r: &Result<i32, &str>| *r == Err("transient"),
            || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("permanent")
            },
        )
        .await;

        assert_eq!(result, Err("permanent"));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_treated_as_one() {
        let attempts = &AtomicU32::new(0);

        let _: Result<(), &str> = retry_with_backoff(
            "test_op",
            0,
            |r: &Result<(), &str>| r.is_err(),
            || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("down")
            },
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
