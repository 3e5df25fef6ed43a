use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use crate::shutdown::{ShutdownReceiver, cancelled};

use super::factory::STAGE_CAPACITY;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Pacing interval for a throttled run.
///
/// `rate` is requests per second *per worker*: the pipeline as a whole
/// emits up to `rate * concurrency` items per second. Returns `None` when
/// the run is unthrottled.
#[must_use]
pub fn throttle_interval(rate: u64, concurrency: usize) -> Option<Duration> {
    if rate == 0 {
        return None;
    }
    let workers = u64::try_from(concurrency).unwrap_or(u64::MAX).max(1);
    let per_second = rate.saturating_mul(workers);
    let nanos = NANOS_PER_SECOND.checked_div(per_second).unwrap_or(0).max(1);
    Some(Duration::from_nanos(nanos))
}

/// Re-emits `input` no faster than one item per `period`.
///
/// The first item waits a full period. Cancellation while waiting on the
/// input, the ticker, or the output closes the returned channel.
pub fn throttle<T>(
    mut input: mpsc::Receiver<T>,
    period: Duration,
    shutdown: ShutdownReceiver,
) -> mpsc::Receiver<T>
where
    T: Send + 'static,
{
    let (paced_tx, paced_rx) = mpsc::channel(STAGE_CAPACITY);
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown;
        let now = Instant::now();
        let first_tick = now.checked_add(period).unwrap_or(now);
        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut emitted: u64 = 0;

        loop {
            let next = tokio::select! {
                biased;
                () = cancelled(&mut shutdown_rx) => break,
                item = input.recv() => item,
            };
            let Some(item) = next else {
                break;
            };
            tokio::select! {
                biased;
                () = cancelled(&mut shutdown_rx) => break,
                _ = ticker.tick() => {}
            }
            let sent = tokio::select! {
                biased;
                () = cancelled(&mut shutdown_rx) => break,
                sent = paced_tx.send(item) => sent,
            };
            if sent.is_err() {
                break;
            }
            emitted = emitted.saturating_add(1);
        }
        debug!("Rate limiter stopped after {} items", emitted);
    });
    paced_rx
}
