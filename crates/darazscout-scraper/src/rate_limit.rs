//! Retry with exponential back-off and jitter for page fetches.
//!
//! Only transport-level and server-side failures are retried. A 404, a bad
//! URL, or anything from the completion and decoding steps is returned on the
//! first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` is a transient condition worth another attempt.
///
/// Retriable:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: timeout, connection failure, or a 5xx surfaced by reqwest.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } => true,
        ScraperError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Retry | Sleep before it              |
/// |-------|------------------------------|
/// | 1     | 1 000 ms × 2⁰ ± 25 % jitter  |
/// | 2     | 1 000 ms × 2¹ ± 25 % jitter  |
/// | 3     | 1 000 ms × 2² ± 25 % jitter  |
///
/// A 429 never sleeps less than its `Retry-After`. Delay is capped at 60 s.
/// With `max_retries = 0` the operation runs once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let jitter = rand::random::<f64>() * 0.5 + 0.75;
                let delay_ms = backoff_delay_ms(&err, attempt, backoff_base_ms, jitter);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient fetch error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

/// Sleep before retry number `attempt` (1-based). `jitter` scales the
/// exponential delay; a server-supplied `Retry-After` is the floor.
fn backoff_delay_ms(err: &ScraperError, attempt: u32, backoff_base_ms: u64, jitter: f64) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * jitter) as u64;
    let floor_ms = match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1_000),
        _ => 0,
    };
    jittered.max(floor_ms).min(MAX_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn rate_limited() -> ScraperError {
        ScraperError::RateLimited {
            domain: "www.daraz.lk".to_owned(),
            retry_after_secs: 0,
        }
    }

    #[test]
    fn rate_limited_is_retriable() {
        assert!(is_retriable(&rate_limited()));
    }

    #[test]
    fn server_errors_are_retriable_client_errors_are_not() {
        let status = |status| ScraperError::UnexpectedStatus {
            status,
            url: "https://www.daraz.lk/".to_owned(),
        };
        assert!(is_retriable(&status(503)));
        assert!(!is_retriable(&status(403)));
    }

    #[test]
    fn extraction_failures_are_not_retriable() {
        assert!(!is_retriable(&ScraperError::Llm {
            reason: "boom".to_owned()
        }));
        assert!(!is_retriable(&ScraperError::MalformedExtraction {
            reason: "not an array".to_owned()
        }));
        assert!(!is_retriable(&ScraperError::NotFound {
            url: "https://www.daraz.lk/x".to_owned()
        }));
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let err = ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://www.daraz.lk/".to_owned(),
        };
        assert_eq!(backoff_delay_ms(&err, 1, 1_000, 1.0), 1_000);
        assert_eq!(backoff_delay_ms(&err, 3, 1_000, 1.0), 4_000);
        assert_eq!(backoff_delay_ms(&err, 2, 1_000, 0.75), 1_500);
    }

    #[test]
    fn delay_never_exceeds_cap() {
        let err = ScraperError::UnexpectedStatus {
            status: 502,
            url: "https://www.daraz.lk/".to_owned(),
        };
        assert_eq!(backoff_delay_ms(&err, 30, 1_000, 1.25), MAX_DELAY_MS);
    }

    #[test]
    fn retry_after_sets_minimum_delay() {
        let err = ScraperError::RateLimited {
            domain: "www.daraz.lk".to_owned(),
            retry_after_secs: 5,
        };
        assert_eq!(backoff_delay_ms(&err, 1, 100, 0.75), 5_000);
        // Longer back-off still wins over a short Retry-After.
        assert_eq!(backoff_delay_ms(&err, 8, 100, 1.0), 12_800);
    }

    #[test]
    fn retry_after_is_capped() {
        let err = ScraperError::RateLimited {
            domain: "www.daraz.lk".to_owned(),
            retry_after_secs: 3_600,
        };
        assert_eq!(backoff_delay_ms(&err, 1, 0, 1.0), MAX_DELAY_MS);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(0, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(rate_limited())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(rate_limited())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::NotFound {
                    url: "https://www.daraz.lk/gone/".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    }
}
