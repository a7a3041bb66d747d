//! In-flight send tracking.
//!
//! Every spawned channel send holds a token for its lifetime; shutdown
//! waits for the count to reach zero before the process may exit, so
//! background sends are never abandoned mid-flight.

use std::sync::Arc;

use tokio::sync::watch;

/// Counts outstanding delivery attempts.
#[derive(Clone)]
pub struct InFlight {
    count: Arc<watch::Sender<usize>>,
}

impl InFlight {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            count: Arc::new(tx),
        }
    }

    /// Acquire a token. Call before spawning the task that will carry it.
    pub fn token(&self) -> InFlightToken {
        self.count.send_modify(|c| *c += 1);
        InFlightToken {
            count: self.count.clone(),
        }
    }

    /// Number of outstanding tokens.
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Wait until no tokens are outstanding.
    pub async fn drained(&self) {
        let mut rx = self.count.subscribe();
        // wait_for checks the current value first, so a zero count
        // returns immediately.
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases its slot when dropped, including on task panic.
pub struct InFlightToken {
    count: Arc<watch::Sender<usize>>,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.count.send_modify(|c| *c -= 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_token_lifecycle() {
        let inflight = InFlight::new();
        assert_eq!(inflight.count(), 0);

        let token = inflight.token();
        let second = inflight.token();
        assert_eq!(inflight.count(), 2);

        drop(token);
        assert_eq!(inflight.count(), 1);
        drop(second);
        assert_eq!(inflight.count(), 0);
    }

    #[tokio::test]
    async fn test_drained_returns_immediately_when_idle() {
        let inflight = InFlight::new();
        tokio::time::timeout(Duration::from_millis(100), inflight.drained())
            .await
            .expect("drained should not block with no tokens");
    }

    #[tokio::test]
    async fn test_drained_waits_for_spawned_work() {
        let inflight = InFlight::new();

        let token = inflight.token();
        let handle = tokio::spawn(async move {
            let _token = token;
            tokio::time::sleep(Duration::from_millis(50)).await;
        });

        tokio::time::timeout(Duration::from_secs(1), inflight.drained())
            .await
            .expect("drained should complete once the task finishes");
        assert_eq!(inflight.count(), 0);
        handle.await.unwrap();
    }
}
