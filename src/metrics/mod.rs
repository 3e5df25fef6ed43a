//! Per-request samples, mergeable aggregates, and the final report.
mod aggregate;
mod histogram;
mod report;
mod types;


pub use aggregate::AggregateResult;
pub use histogram::LatencyHistogram;
pub use report::FinalReport;
pub use types::{HTTP_ERROR_THRESHOLD, Outcome, SampleResult, TransportErrorKind};
