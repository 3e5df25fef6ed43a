use std::time::Duration;

use hdrhistogram::Histogram;
use tracing::warn;

/// Significant decimal digits kept by every latency histogram.
const SIGNIFICANT_FIGURES: u8 = 3;

/// Latency distribution in microseconds.
///
/// Wraps an auto-resizing HDR histogram with three significant figures, so
/// every instance shares one bucket layout and merging is a per-bucket sum.
/// The exact latency sum is kept alongside for the mean. An empty histogram
/// holds no allocation.
#[derive(Debug, Clone, Default)]
pub struct LatencyHistogram {
    hist: Option<Histogram<u64>>,
    sum_us: u128,
}

impl LatencyHistogram {
    #[must_use]
    pub fn from_sample(latency: Duration) -> Self {
        let micros = duration_to_micros(latency);
        let hist = match Histogram::<u64>::new(SIGNIFICANT_FIGURES) {
            Ok(mut hist) => match hist.record(micros) {
                Ok(()) => Some(hist),
                Err(err) => {
                    warn!("Failed to record latency {}us: {}", micros, err);
                    None
                }
            },
            Err(err) => {
                warn!("Failed to create histogram: {}", err);
                None
            }
        };
        Self {
            hist,
            sum_us: u128::from(micros),
        }
    }

    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        self.sum_us = self.sum_us.saturating_add(other.sum_us);
        self.hist = match (self.hist.take(), other.hist.as_ref()) {
            (Some(mut hist), Some(other_hist)) => {
                if let Err(err) = hist.add(other_hist) {
                    warn!("Failed to merge histogram: {}", err);
                }
                Some(hist)
            }
            (Some(hist), None) => Some(hist),
            (None, Some(other_hist)) => Some(other_hist.clone()),
            (None, None) => None,
        };
        self
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.as_ref().map_or(0, Histogram::len)
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        Duration::from_micros(self.hist.as_ref().map_or(0, Histogram::min))
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        Duration::from_micros(self.hist.as_ref().map_or(0, Histogram::max))
    }

    #[must_use]
    pub fn mean(&self) -> Duration {
        let mean = self
            .sum_us
            .checked_div(u128::from(self.count()))
            .unwrap_or(0);
        Duration::from_micros(u64::try_from(mean).unwrap_or(u64::MAX))
    }

    /// Latency at `quantile` in `0.0..=1.0`; zero when nothing was recorded.
    #[must_use]
    pub fn quantile(&self, quantile: f64) -> Duration {
        let micros = self
            .hist
            .as_ref()
            .filter(|hist| hist.len() > 0)
            .map_or(0, |hist| hist.value_at_quantile(quantile));
        Duration::from_micros(micros)
    }

    #[must_use]
    pub fn percentiles(&self) -> (Duration, Duration, Duration) {
        (
            self.quantile(0.5),
            self.quantile(0.9),
            self.quantile(0.99),
        )
    }
}

impl PartialEq for LatencyHistogram {
    fn eq(&self, other: &Self) -> bool {
        if self.sum_us != other.sum_us || self.count() != other.count() {
            return false;
        }
        match (self.hist.as_ref(), other.hist.as_ref()) {
            (Some(left), Some(right)) => left
                .iter_recorded()
                .map(|value| (value.value_iterated_to(), value.count_at_value()))
                .eq(right
                    .iter_recorded()
                    .map(|value| (value.value_iterated_to(), value.count_at_value()))),
            (None, None) => true,
            (Some(hist), None) | (None, Some(hist)) => hist.len() == 0,
        }
    }
}

impl Eq for LatencyHistogram {}

fn duration_to_micros(latency: Duration) -> u64 {
    u64::try_from(latency.as_micros()).unwrap_or(u64::MAX)
}
