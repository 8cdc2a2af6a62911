//! One-shot completion signal for the receive loop

use tokio::sync::watch;

/// Fires once, when the receive loop has exited. Clone freely; every clone
/// observes the same signal.
#[derive(Debug, Clone)]
pub struct DoneSignal {
    rx: watch::Receiver<bool>,
}

impl DoneSignal {
    pub fn is_done(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the loop has exited. Returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // A dropped sender means the loop task is gone, which is also done.
        let _ = rx.wait_for(|done| *done).await;
    }
}

/// Held by the receive task; fires the signal when dropped, so the signal
/// goes out on every exit path including a panicking callback.
#[derive(Debug)]
pub(crate) struct DoneGuard {
    tx: watch::Sender<bool>,
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

pub(crate) fn done_pair() -> (DoneGuard, DoneSignal) {
    let (tx, rx) = watch::channel(false);
    (DoneGuard { tx }, DoneSignal { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_done_fires_on_guard_drop() {
        let (guard, signal) = done_pair();
        let waiter = signal.clone();
        assert!(!signal.is_done());

        let handle = tokio::spawn(async move { waiter.wait().await });
        drop(guard);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(signal.is_done());

        // Later waiters return immediately.
        tokio::time::timeout(Duration::from_millis(50), signal.wait())
            .await
            .expect("already done");
    }

    #[tokio::test]
    async fn test_done_fires_when_task_panics() {
        let (guard, signal) = done_pair();
        let task = tokio::spawn(async move {
            let _guard = guard;
            panic!("callback failure");
        });
        assert!(task.await.is_err());
        assert!(signal.is_done());
    }
}
