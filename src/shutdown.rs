//! Run-scoped cancellation signal.
//!
//! A `watch` channel rather than a broadcast so that a receiver cloned after
//! the signal fired still observes it.
use tokio::sync::watch;

pub type ShutdownSender = watch::Sender<bool>;
pub type ShutdownReceiver = watch::Receiver<bool>;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    watch::channel(false)
}

/// Fires the signal. Firing twice is harmless.
pub fn trigger(shutdown_tx: &ShutdownSender) {
    shutdown_tx.send_replace(true);
}

#[must_use]
pub fn is_triggered(shutdown_rx: &ShutdownReceiver) -> bool {
    *shutdown_rx.borrow()
}

/// Resolves once the signal fires. Never resolves if the sender is dropped
/// without firing.
pub async fn cancelled(shutdown_rx: &mut ShutdownReceiver) {
    if shutdown_rx.wait_for(|fired| *fired).await.is_err() {
        std::future::pending::<()>().await;
    }
}
