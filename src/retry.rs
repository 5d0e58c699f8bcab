//! Bounded-attempts retry, shared by every polling site.

use std::future::Future;
use std::time::Duration;

/// Run `op` up to `attempts` times with `delay` between attempts.
///
/// Returns the first success, or the last error once the attempts are
/// exhausted. `attempts` is clamped to at least one.
pub async fn retry<T, E, F, Fut>(attempts: usize, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_err = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(last_err.expect("at least one attempt ran"))
}

/// Poll `check` until it reports true or `timeout` elapses.
///
/// The check runs immediately, then at `interval` spacing. Errors from the
/// check are treated the same as "not yet".
pub async fn poll_until<F, Fut, E>(timeout: Duration, interval: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if matches!(check().await, Ok(true)) {
            return true;
        }
        if tokio::time::Instant::now() + interval > deadline {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retry_succeeds_first_attempt() {
        let calls = AtomicUsize::new(0);
        let result: Result<i32, &str> = retry(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let calls = AtomicUsize::new(0);
        let result: Result<i32, &str> = retry(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("not yet")
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let calls = AtomicUsize::new(0);
        let result: Result<i32, &str> = retry(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("nope") }
        })
        .await;

        assert_eq!(result, Err("nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_zero_attempts_still_runs_once() {
        let calls = AtomicUsize::new(0);
        let result: Result<i32, &str> = retry(0, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(1) }
        })
        .await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_poll_until_true() {
        let calls = AtomicUsize::new(0);
        let found = poll_until(Duration::from_secs(1), Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<bool, ()>(n >= 2) }
        })
        .await;

        assert!(found);
    }

    #[tokio::test]
    async fn test_poll_until_timeout() {
        let found = poll_until(Duration::from_millis(5), Duration::from_millis(2), || async {
            Ok::<bool, ()>(false)
        })
        .await;

        assert!(!found);
    }
}
