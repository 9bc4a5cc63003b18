//! Bounded-retry wrapper for flaky market-data sources.
//!
//! The policy is a plain value: an ordered delay schedule plus a retryable
//! predicate. After the delay schedule is exhausted the operation runs one
//! final time and the failure propagates. Failures that do not match the
//! predicate propagate immediately without consuming a retry slot.

use crate::FeedError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default backoff schedule, in seconds.
const DEFAULT_DELAYS_SECS: [u64; 8] = [5, 5, 5, 10, 5, 5, 5, 10];

/// Immutable retry configuration, shared across calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
    retryable: fn(&FeedError) -> bool,
}

fn transient(err: &FeedError) -> bool {
    err.is_transient()
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_secs(&DEFAULT_DELAYS_SECS)
    }
}

impl RetryPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self {
            delays,
            retryable: transient,
        }
    }

    /// Build a policy from a schedule in whole seconds.
    pub fn from_secs(secs: &[u64]) -> Self {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    /// Replace the retryable predicate.
    pub fn with_retryable(mut self, retryable: fn(&FeedError) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Total invocations a fully failing call will make: one per delay slot
    /// plus the final attempt.
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }
}

/// Observer notified of each failed attempt before the backoff wait.
pub trait RetryObserver {
    /// `attempt` is 1-based; `next_delay` is `None` on the final failure.
    fn on_failure(&self, attempt: usize, error: &FeedError, next_delay: Option<Duration>);
}

/// Observer that reports attempts through `tracing`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl RetryObserver for LogObserver {
    fn on_failure(&self, attempt: usize, error: &FeedError, next_delay: Option<Duration>) {
        match next_delay {
            Some(delay) => warn!(attempt, %error, "fetch failed, retrying in {delay:?}"),
            None => warn!(attempt, %error, "fetch failed definitely"),
        }
    }
}

/// Invoke `op` under the policy, waiting out the delay schedule between
/// retryable failures. The backoff blocks only this task.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    observer: &dyn RetryObserver,
    mut op: F,
) -> Result<T, FeedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FeedError>>,
{
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !(policy.retryable)(&err) {
            return Err(err);
        }
        let next_delay = policy.delays.get(attempt - 1).copied();
        observer.on_failure(attempt, &err, next_delay);
        match next_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => return Err(err),
        }
    }
}
