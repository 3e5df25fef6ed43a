use std::collections::BTreeMap;
use std::time::Duration;

use super::histogram::LatencyHistogram;
use super::report::FinalReport;
use super::types::{Outcome, SampleResult, TransportErrorKind};

/// Running totals over any number of samples.
///
/// State only changes through [`AggregateResult::merge`]; a sample enters the
/// aggregate by converting it into a one-sample aggregate first. Merging is
/// associative and commutative, and `total == success + errors` holds for
/// every value of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    total: u64,
    success: u64,
    http_errors: BTreeMap<u16, u64>,
    transport_errors: BTreeMap<TransportErrorKind, u64>,
    response_bytes: u64,
    latency: LatencyHistogram,
}

impl AggregateResult {
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        self.total = self.total.saturating_add(other.total);
        self.success = self.success.saturating_add(other.success);
        add_counts(&mut self.http_errors, &other.http_errors);
        add_counts(&mut self.transport_errors, &other.transport_errors);
        self.response_bytes = self.response_bytes.saturating_add(other.response_bytes);
        self.latency = self.latency.merge(&other.latency);
        self
    }

    /// Derives the report for a run that took `elapsed` wall-clock time.
    #[must_use]
    pub fn finalize(&self, elapsed: Duration) -> FinalReport {
        FinalReport::from_aggregate(self, elapsed)
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub const fn success(&self) -> u64 {
        self.success
    }

    #[must_use]
    pub const fn http_errors(&self) -> &BTreeMap<u16, u64> {
        &self.http_errors
    }

    #[must_use]
    pub const fn transport_errors(&self) -> &BTreeMap<TransportErrorKind, u64> {
        &self.transport_errors
    }

    #[must_use]
    pub fn http_error_count(&self) -> u64 {
        sum_counts(&self.http_errors)
    }

    #[must_use]
    pub fn transport_error_count(&self) -> u64 {
        sum_counts(&self.transport_errors)
    }

    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.http_error_count()
            .saturating_add(self.transport_error_count())
    }

    #[must_use]
    pub const fn response_bytes(&self) -> u64 {
        self.response_bytes
    }

    #[must_use]
    pub const fn latency(&self) -> &LatencyHistogram {
        &self.latency
    }
}

impl From<&SampleResult> for AggregateResult {
    fn from(sample: &SampleResult) -> Self {
        let mut aggregate = Self {
            total: 1,
            success: 0,
            http_errors: BTreeMap::new(),
            transport_errors: BTreeMap::new(),
            response_bytes: sample.response_bytes,
            latency: LatencyHistogram::from_sample(sample.latency),
        };
        match &sample.outcome {
            Outcome::Success { .. } => aggregate.success = 1,
            Outcome::HttpError { status } => {
                aggregate.http_errors.insert(*status, 1);
            }
            Outcome::TransportError { kind, .. } => {
                aggregate.transport_errors.insert(*kind, 1);
            }
        }
        aggregate
    }
}

impl From<SampleResult> for AggregateResult {
    fn from(sample: SampleResult) -> Self {
        Self::from(&sample)
    }
}

fn add_counts<K: Ord + Copy>(into: &mut BTreeMap<K, u64>, from: &BTreeMap<K, u64>) {
    for (key, count) in from {
        let slot = into.entry(*key).or_insert(0);
        *slot = slot.saturating_add(*count);
    }
}

fn sum_counts<K>(counts: &BTreeMap<K, u64>) -> u64 {
    counts
        .values()
        .fold(0u64, |acc, count| acc.saturating_add(*count))
}
