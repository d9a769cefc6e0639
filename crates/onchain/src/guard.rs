use crate::OnchainError;
use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;

/// Cancellation and timeout applied to every outbound I/O call.
///
/// Cloning a guard shares its token, so cancelling one clone cancels calls
/// made through all of them.
#[derive(Debug, Clone, Default)]
pub struct IoGuard {
    token: CancellationToken,
    timeout: Option<Duration>,
}

impl IoGuard {
    /// A guard with a fresh token and no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the caller's token.
    pub fn with_token(self, token: CancellationToken) -> Self {
        Self { token, ..self }
    }

    /// Fail each call that takes longer than `timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout: Some(timeout), ..self }
    }

    /// Get the cancellation token.
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Get the per-call timeout.
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// True once the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `fut`, returning [`OnchainError::Cancelled`] if the token fires
    /// first and [`OnchainError::Timeout`] if the timeout elapses first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, OnchainError>
    where
        F: Future<Output = Result<T, OnchainError>>,
    {
        let io = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .map_err(|_| OnchainError::Timeout(limit))?,
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(OnchainError::Cancelled),
            res = io => res,
        }
    }

    /// Sleep for `period`, returning early with [`OnchainError::Cancelled`].
    pub async fn sleep(&self, period: Duration) -> Result<(), OnchainError> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(OnchainError::Cancelled),
            _ = tokio::time::sleep(period) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn times_out() {
        let guard = IoGuard::new().with_timeout(Duration::from_secs(2));
        let res: Result<(), _> = guard
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(OnchainError::Timeout(d)) if d == Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn cancelled_before_start() {
        let guard = IoGuard::new();
        guard.token().cancel();
        let res = guard.run(async { Ok(1) }).await;
        assert_eq!(res.unwrap_err().code(), "cancelled");
        assert!(guard.sleep(Duration::from_secs(1)).await.is_err());
    }

    #[tokio::test]
    async fn passes_through() {
        let guard = IoGuard::new().with_timeout(Duration::from_secs(1));
        assert_eq!(guard.run(async { Ok(7) }).await.unwrap(), 7);
    }
}
