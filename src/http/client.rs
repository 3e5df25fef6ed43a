use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::args::DEFAULT_USER_AGENT;
use crate::error::HttpError;
use crate::metrics::{AggregateResult, FinalReport};
use crate::shutdown::{ShutdownReceiver, is_triggered};

use super::execution::send;
use super::factory::{RequestTemplate, produce};
use super::pool::dispatch;
use super::rate::{throttle, throttle_interval};

/// Parameters of one run. Validated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub requests: NonZeroU64,
    pub concurrency: NonZeroUsize,
    /// Requests per second per worker; `None` runs unthrottled.
    pub rate: Option<NonZeroU64>,
    pub timeout: Duration,
}

impl RunConfig {
    #[must_use]
    pub const fn new(requests: NonZeroU64, concurrency: NonZeroUsize, timeout: Duration) -> Self {
        Self {
            requests,
            concurrency,
            rate: None,
            timeout,
        }
    }

    #[must_use]
    pub const fn with_rate(mut self, rate: Option<NonZeroU64>) -> Self {
        self.rate = rate;
        self
    }

    #[must_use]
    pub fn throttle_interval(&self) -> Option<Duration> {
        self.rate
            .and_then(|rate| throttle_interval(rate.get(), self.concurrency.get()))
    }
}

/// Runs load against a single target.
///
/// Every call to [`Client::run`] builds its own transport, pipeline and
/// aggregate; nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct Client {
    config: RunConfig,
}

impl Client {
    #[must_use]
    pub const fn new(config: RunConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Sends `RunConfig::requests` copies of `template` and reports on them.
    ///
    /// Request failures are recorded in the report, never returned. When
    /// `shutdown` fires mid-run the report covers the samples collected so
    /// far.
    ///
    /// # Errors
    ///
    /// Returns an error only when the HTTP client cannot be built, before any
    /// request is sent.
    pub async fn run(
        &self,
        template: &RequestTemplate,
        shutdown: &ShutdownReceiver,
    ) -> Result<FinalReport, HttpError> {
        let started = Instant::now();
        let http = self.build_http_client()?;
        let requests = self.config.requests.get();

        debug!(requests, "Producing work items");
        let mut items = produce(template.clone(), requests, shutdown.clone());
        if let Some(period) = self.config.throttle_interval() {
            debug!(?period, "Throttling work items");
            items = throttle(items, period, shutdown.clone());
        }

        debug!(workers = self.config.concurrency.get(), "Dispatching");
        let mut results = dispatch(items, self.config.concurrency, shutdown, move |item| {
            let http = http.clone();
            async move { send(&http, item).await }
        });

        let mut aggregate = AggregateResult::default();
        while let Some(sample) = results.recv().await {
            aggregate = aggregate.merge(&AggregateResult::from(sample));
        }
        let elapsed = started.elapsed();

        if is_triggered(shutdown) {
            warn!("Run cancelled after {} of {} requests", aggregate.total(), requests);
        }
        let report = aggregate.finalize(elapsed);
        debug!(
            total = report.total_requests,
            errors = report.error_requests,
            ?elapsed,
            "Run finalized"
        );
        Ok(report)
    }

    fn build_http_client(&self) -> Result<reqwest::Client, HttpError> {
        reqwest::Client::builder()
            .timeout(self.config.timeout)
            .pool_max_idle_per_host(self.config.concurrency.get())
            .user_agent(DEFAULT_USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })
    }
}
