use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Serialize, Serializer};

use super::aggregate::AggregateResult;
use super::types::TransportErrorKind;

/// Derived statistics for one finished run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub error_requests: u64,
    pub http_errors: BTreeMap<u16, u64>,
    pub transport_errors: BTreeMap<TransportErrorKind, u64>,
    pub response_bytes: u64,
    #[serde(rename = "elapsed_us", serialize_with = "as_micros")]
    pub elapsed: Duration,
    /// Requests per second, scaled by 100.
    pub rps_x100: u64,
    /// Error percentage, scaled by 100.
    pub error_rate_x100: u64,
    #[serde(rename = "mean_latency_us", serialize_with = "as_micros")]
    pub mean_latency: Duration,
    #[serde(rename = "min_latency_us", serialize_with = "as_micros")]
    pub min_latency: Duration,
    #[serde(rename = "max_latency_us", serialize_with = "as_micros")]
    pub max_latency: Duration,
    #[serde(rename = "p50_latency_us", serialize_with = "as_micros")]
    pub p50_latency: Duration,
    #[serde(rename = "p90_latency_us", serialize_with = "as_micros")]
    pub p90_latency: Duration,
    #[serde(rename = "p99_latency_us", serialize_with = "as_micros")]
    pub p99_latency: Duration,
}

impl FinalReport {
    pub(super) fn from_aggregate(aggregate: &AggregateResult, elapsed: Duration) -> Self {
        let total_requests = aggregate.total();
        let error_requests = aggregate.error_count();
        let latency = aggregate.latency();
        let (p50_latency, p90_latency, p99_latency) = latency.percentiles();

        Self {
            total_requests,
            successful_requests: aggregate.success(),
            error_requests,
            http_errors: aggregate.http_errors().clone(),
            transport_errors: aggregate.transport_errors().clone(),
            response_bytes: aggregate.response_bytes(),
            elapsed,
            rps_x100: compute_rps_x100(total_requests, elapsed),
            error_rate_x100: compute_error_rate_x100(total_requests, error_requests),
            mean_latency: latency.mean(),
            min_latency: latency.min(),
            max_latency: latency.max(),
            p50_latency,
            p90_latency,
            p99_latency,
        }
    }

    #[must_use]
    pub fn http_error_count(&self) -> u64 {
        self.http_errors
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    #[must_use]
    pub fn transport_error_count(&self) -> u64 {
        self.transport_errors
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }
}

/// Throughput over the externally measured wall clock; sub-millisecond runs
/// count as one millisecond.
pub(crate) fn compute_rps_x100(total: u64, elapsed: Duration) -> u64 {
    if total == 0 {
        return 0;
    }
    let elapsed_us = elapsed.as_micros().max(1_000);
    let scaled = u128::from(total)
        .saturating_mul(100_000_000)
        .checked_div(elapsed_us)
        .unwrap_or(0);
    u64::try_from(scaled).map_or(u64::MAX, |value| value)
}

pub(crate) fn compute_error_rate_x100(total: u64, errors: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let scaled = u128::from(errors)
        .saturating_mul(10_000)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    u64::try_from(scaled).map_or(u64::MAX, |value| value)
}

fn as_micros<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(value.as_micros()).unwrap_or(u64::MAX))
}
