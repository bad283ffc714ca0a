//! Per-operation cancellation and deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::DataError;

/// Cancellation token and optional deadline carried by every repository call.
///
/// Clones share the same token, so cancelling one cancels all. A context
/// created with [`OpContext::background`] never fires.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derive a context that also expires after `timeout`. The earlier of the
    /// existing and the new deadline wins.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// A child context: cancelling the parent cancels the child, not the reverse.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The reason this context has fired, if it has.
    pub fn check(&self) -> Result<(), DataError> {
        if self.token.is_cancelled() {
            return Err(DataError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(DataError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the context fires first.
    ///
    /// The future is dropped as soon as the token is cancelled or the
    /// deadline passes.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<DataError>,
    {
        self.check()?;
        let expiry = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(DataError::Cancelled.into()),
            _ = expiry => Err(DataError::DeadlineExceeded.into()),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = OpContext::background();
        let out: Result<i32, DataError> = ctx.run(async { Ok(7) }).await;
        assert_eq!(out.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = OpContext::background();
        ctx.cancel();
        let out: Result<(), DataError> = ctx.run(async { Ok(()) }).await;
        assert!(matches!(out, Err(DataError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_while_pending() {
        let ctx = OpContext::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let out: Result<(), DataError> = ctx.run(std::future::pending()).await;
        assert!(matches!(out, Err(DataError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = OpContext::background().with_timeout(Duration::from_secs(1));
        let out: Result<(), DataError> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(out, Err(DataError::DeadlineExceeded)));
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            let short = OpContext::background().with_timeout(Duration::from_secs(1));
            let derived = short.with_timeout(Duration::from_secs(60));
            assert_eq!(derived.deadline(), short.deadline());
        });
    }

    #[test]
    fn test_child_does_not_cancel_parent() {
        let parent = OpContext::background();
        let child = parent.child();
        child.cancel();
        assert!(parent.check().is_ok());
        assert!(matches!(child.check(), Err(DataError::Cancelled)));
    }
}
