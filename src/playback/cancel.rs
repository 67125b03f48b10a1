use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Cooperative cancellation signal scoped to one playback run.
///
/// Raised by `pause`/`stop` and checked by the column loop at its suspension
/// points. Raising never aborts an outstanding send; the loop discards the
/// column's results instead.
#[derive(Default)]
pub struct CancelToken {
    raised: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, returning early (without error) if raised.
    pub async fn sleep(&self, duration: Duration) {
        // Register interest before checking the flag so a raise between the
        // check and the await cannot be missed.
        let cancelled = self.notify.notified();
        if self.is_raised() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = cancelled => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_sleep_runs_to_completion_when_not_raised() {
        let token = CancelToken::new();
        let start = Instant::now();
        token.sleep(Duration::from_millis(50)).await;
        assert!(start.elapsed() >= Duration::from_millis(45));
        assert!(!token.is_raised());
    }

    #[tokio::test]
    async fn test_raise_interrupts_sleep() {
        let token = CancelToken::new();
        let sleeper = token.clone();
        let handle = tokio::spawn(async move {
            let start = Instant::now();
            sleeper.sleep(Duration::from_secs(30)).await;
            start.elapsed()
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.raise();
        let elapsed = handle.await.unwrap();
        assert!(elapsed < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_sleep_after_raise_returns_immediately() {
        let token = CancelToken::new();
        token.raise();
        let start = Instant::now();
        token.sleep(Duration::from_secs(30)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
