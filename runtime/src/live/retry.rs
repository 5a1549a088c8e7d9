// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bounded retry around fallible page operations.

use crate::renderer::{PageError, PageErrorKind};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often and how patiently to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
    /// Error kinds that are returned immediately.
    pub non_retryable: Vec<PageErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(1),
            non_retryable: Vec::new(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            non_retryable: Vec::new(),
        }
    }

    /// Same delay, different attempt budget.
    pub fn with_attempts(&self, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..self.clone()
        }
    }

    pub fn with_non_retryable(mut self, kinds: &[PageErrorKind]) -> Self {
        self.non_retryable.extend_from_slice(kinds);
        self
    }

    fn gives_up_on(&self, attempt: u32, error: &PageError) -> bool {
        attempt >= self.max_attempts.max(1) || self.non_retryable.contains(&error.kind())
    }
}

/// Run `op` until it succeeds, the policy's attempts run out, or it fails
/// with a non-retryable kind. The last error is returned unchanged.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, PageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PageError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if policy.gives_up_on(attempt, &e) => return Err(e),
            Err(e) => {
                debug!(attempt, max_attempts = policy.max_attempts, "retrying: {e}");
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    fn flaky(failures: u32, calls: Arc<AtomicU32>) -> impl FnMut() -> futures::future::Ready<Result<u32, PageError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                futures::future::ready(Err(PageError::no_such_element("img")))
            } else {
                futures::future::ready(Ok(n))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_k_failures_with_k_delays() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let value = retry(&policy, flaky(3, Arc::clone(&calls))).await.unwrap();

        assert_eq!(value, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(10, Duration::from_secs(1));
        let start = Instant::now();

        let err = retry(&policy, flaky(u32::MAX, Arc::clone(&calls)))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PageErrorKind::NoSuchElement);
        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert_eq!(start.elapsed(), Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_kind_fails_fast() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default().with_non_retryable(&[PageErrorKind::NoSuchElement]);

        let result = retry(&policy, flaky(u32::MAX, Arc::clone(&calls))).await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_success_is_returned_unchanged() {
        let policy = RetryPolicy::default();
        let value = retry(&policy, || async { Ok::<_, PageError>("ready") }).await;
        assert_eq!(value.unwrap(), "ready");
    }
}
