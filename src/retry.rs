//! Retry executor for transient pipeline failures.
//!
//! Wraps any fallible async operation and re-invokes it according to the
//! error classification in [`crate::error`]: retryable failures back off and
//! try again, non-retryable failures surface immediately, and exhausted
//! budgets surface the last observed error unchanged rather than a wrapper.
//!
//! Backoff is linear in the attempt number (`base_delay * attempt`), with
//! rate-limit errors doubled on top (`base_delay * attempt * 2`) so pressure
//! on a throttling provider eases faster than for generic transient faults.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::ErrorCode;
use crate::Result;

/// Invoke `operation` up to `max_attempts` times, sleeping between attempts.
///
/// - Success at any attempt returns immediately.
/// - A non-retryable classified error returns immediately with no further
///   attempts.
/// - After a retryable failure that is not the last attempt, waits
///   `base_delay * attempt` (1-based attempt number), doubled when the
///   failure is [`ErrorCode::RateLimited`].
/// - When all attempts are exhausted, the last observed error is returned
///   as-is.
///
/// A `max_attempts` of 0 is treated as 1: the operation always runs at
/// least once.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use rag_sentinel::{with_retry, Error};
///
/// # async fn demo() -> rag_sentinel::Result<Vec<f32>> {
/// let vector = with_retry(
///     || async { Err::<Vec<f32>, _>(Error::embedding_failed("503 from provider")) },
///     3,
///     Duration::from_millis(100),
/// )
/// .await?;
/// # Ok(vector)
/// # }
/// ```
pub async fn with_retry<T, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let budget = max_attempts.max(1);
    let mut attempt: u32 = 1;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.retryable() {
            debug!(code = %err.code(), attempt, "non-retryable failure, failing fast");
            return Err(err);
        }
        if attempt >= budget {
            debug!(code = %err.code(), attempts = budget, "retry budget exhausted");
            return Err(err);
        }

        let delay = backoff_delay(base_delay, attempt, err.code());
        debug!(
            code = %err.code(),
            attempt,
            delay_ms = delay.as_millis() as u64,
            "transient failure, backing off before next attempt"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// Delay before the attempt following 1-based failed attempt `attempt`.
fn backoff_delay(base_delay: Duration, attempt: u32, code: ErrorCode) -> Duration {
    let factor = if code == ErrorCode::RateLimited { 2 } else { 1 };
    base_delay.saturating_mul(attempt.saturating_mul(factor))
}
