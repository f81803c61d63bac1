//! Cancellation tied to a mounted screen.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Ends when the screen is torn down. Clones share the same lifetime.
#[derive(Debug, Clone)]
pub struct Lifetime {
    ended_tx: Arc<watch::Sender<bool>>,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifetime {
    pub fn new() -> Self {
        let (ended_tx, _) = watch::channel(false);
        Self {
            ended_tx: Arc::new(ended_tx),
        }
    }

    /// End the lifetime. Idempotent.
    pub fn end(&self) {
        self.ended_tx.send_replace(true);
    }

    pub fn is_ended(&self) -> bool {
        *self.ended_tx.borrow()
    }

    /// Resolve once the lifetime has ended.
    pub async fn ended(&self) {
        let mut ended_rx = self.ended_tx.subscribe();
        loop {
            if *ended_rx.borrow_and_update() {
                return;
            }
            if ended_rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Drive `fut` to completion unless the lifetime ends first.
    ///
    /// Returns `None` when the lifetime ended, including when it had already
    /// ended before the call.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.ended() => None,
            out = fut => Some(out),
        }
    }
}
