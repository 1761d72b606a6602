//! Operation Context
//!
//! Deadline-bound, cancellable execution context handed to every storage
//! and hashing call. The context never polls: it races the wrapped future
//! against the deadline and the cancellation token, and dropping the losing
//! future aborts whatever the driver had in flight.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a bounded operation did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("operation cancelled")]
    Cancelled,
}

/// Per-request execution context
#[derive(Debug, Clone)]
pub struct OpContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl OpContext {
    /// Context whose deadline is `timeout` from now
    ///
    /// Timeouts past the clock's range saturate to a far-future deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        Self::with_deadline(now.checked_add(timeout).unwrap_or_else(|| far_future(now)))
    }

    /// Context with an absolute deadline
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline,
            cancel: CancellationToken::new(),
        }
    }

    /// Time left before the deadline (zero once passed)
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run `fut` bounded by this context
    ///
    /// Cancellation wins over a simultaneously expired deadline.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            _ = tokio::time::sleep_until(self.deadline) => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

/// Roughly 30 years out, the horizon tokio itself uses for unbounded sleeps
fn far_future(now: Instant) -> Instant {
    now + Duration::from_secs(86400 * 365 * 30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_before_deadline() {
        let ctx = OpContext::with_timeout(Duration::from_secs(5));
        let out = ctx.run(async { 42 }).await;
        assert_eq!(out, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let ctx = OpContext::with_timeout(Duration::from_millis(50));
        let out = ctx
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert_eq!(out, Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_run_observes_cancellation() {
        let ctx = OpContext::with_timeout(Duration::from_secs(60));
        ctx.cancel();
        let out = ctx.run(std::future::pending::<()>()).await;
        assert_eq!(out, Err(Interrupted::Cancelled));
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_huge_timeout_saturates() {
        let ctx = OpContext::with_timeout(Duration::MAX);
        assert!(ctx.remaining() > Duration::from_secs(86400 * 365));
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_saturates() {
        let ctx = OpContext::with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }
}
