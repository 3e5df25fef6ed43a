use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::trace;

use crate::shutdown::{ShutdownReceiver, cancelled};

/// Fans `input` out to exactly `workers` concurrent tasks and fans their
/// results back into one channel.
///
/// Each worker owns a clone of the result sender, so the returned channel
/// closes only after every worker has exited. Workers wait for room in the
/// result channel instead of dropping results. A worker exits when the input
/// is exhausted, when cancellation fires while it is idle, or when the
/// result consumer is gone.
pub fn dispatch<T, R, F, Fut>(
    input: mpsc::Receiver<T>,
    workers: NonZeroUsize,
    shutdown: &ShutdownReceiver,
    run: F,
) -> mpsc::Receiver<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let (results_tx, results_rx) = mpsc::channel(workers.get());
    let input = Arc::new(Mutex::new(input));

    for worker_id in 0..workers.get() {
        let input = Arc::clone(&input);
        let results_tx = results_tx.clone();
        let mut shutdown_rx = shutdown.clone();
        let run = run.clone();

        tokio::spawn(async move {
            let mut handled: u64 = 0;
            loop {
                let next = tokio::select! {
                    biased;
                    () = cancelled(&mut shutdown_rx) => None,
                    item = next_item(&input) => item,
                };
                let Some(item) = next else {
                    break;
                };
                let result = run(item).await;
                handled = handled.saturating_add(1);
                if results_tx.send(result).await.is_err() {
                    break;
                }
            }
            trace!(worker_id, handled, "Worker exited");
        });
    }

    results_rx
}

async fn next_item<T>(input: &Mutex<mpsc::Receiver<T>>) -> Option<T> {
    input.lock().await.recv().await
}
