//! Retryable-operation helper shared by the connect and publish paths.
//!
//! One loop owns the attempt counting and backoff sleeping; callers supply
//! the operation and a backoff schedule. Backoff waits race the cancellation
//! token so an interrupt never has to wait out a sleep.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Why a retried operation gave up
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed; carries the last error
    Exhausted { attempts: u32, source: E },

    /// Cancellation observed during a backoff wait
    Cancelled,
}

/// Exponential backoff schedule: `base^attempt` seconds, attempt starting at 1.
/// Non-decreasing across attempts for any base >= 1.
pub fn exponential_backoff(base: f64) -> impl Fn(u32) -> Duration {
    move |attempt| Duration::from_secs_f64(base.powi(attempt as i32).max(0.0))
}

/// Run `op` up to `max_attempts` times, sleeping `backoff(attempt)` between
/// failures. The attempt number (starting at 1) is passed to `op` for log
/// context. Returns the first success, or why the loop gave up.
pub async fn retry_with_backoff<T, E, F, Fut, B>(
    mut op: F,
    max_attempts: u32,
    backoff: B,
    cancel: &CancellationToken,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    B: Fn(u32) -> Duration,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source: e,
                });
            }
            Err(e) => {
                let wait = backoff(attempt);
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:.1}s...",
                    attempt,
                    max_attempts,
                    e,
                    wait.as_secs_f64()
                );

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                }
            }
        }
    }
}
