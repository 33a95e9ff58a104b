//! Cooperative cancellation shared by the fetch loop and the orchestrator
//!
//! Wraps the `watch::Receiver<bool>` that `main` flips on SIGINT/SIGTERM.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Read side of the shutdown channel
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl ShutdownSignal {
    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }

    /// A signal that never fires
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Whether shutdown has been requested
    pub fn is_triggered(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Sleep for `duration` unless shutdown is requested first
    ///
    /// Returns `false` when the sleep was cut short by shutdown.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;

        let Some(rx) = self.rx.as_mut() else {
            tokio::time::sleep_until(deadline).await;
            return true;
        };

        if *rx.borrow() {
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => true,
            requested = async { rx.wait_for(|stop| *stop).await.is_ok() } => {
                if requested {
                    false
                } else {
                    // Sender dropped: nobody can request shutdown anymore
                    tokio::time::sleep_until(deadline).await;
                    true
                }
            }
        }
    }
}

impl From<watch::Receiver<bool>> for ShutdownSignal {
    fn from(rx: watch::Receiver<bool>) -> Self {
        Self::new(rx)
    }
}
