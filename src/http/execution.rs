use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::time::Instant;
use tracing::debug;

use crate::metrics::{SampleResult, TransportErrorKind};
use crate::shutdown::cancelled;

use super::factory::WorkItem;

/// Executes one work item and classifies the outcome.
///
/// Latency covers dispatch up to the response head. The body is drained
/// afterwards so the connection can go back to the pool; dropping the
/// response releases it on every other path. Cancellation before the head
/// arrives yields a `Cancelled` sample; after it, the received status is
/// kept.
pub async fn send(client: &Client, item: WorkItem) -> SampleResult {
    let WorkItem {
        request,
        mut shutdown,
    } = item;
    let start = Instant::now();

    let response = tokio::select! {
        biased;
        () = cancelled(&mut shutdown) => return cancelled_sample(start),
        response = client.execute(request) => response,
    };
    let latency = start.elapsed();

    let response = match response {
        Ok(response) => response,
        Err(err) => return transport_failure(latency, &err),
    };
    let status = response.status().as_u16();

    let drained = tokio::select! {
        biased;
        () = cancelled(&mut shutdown) => None,
        drained = drain_response_body(response) => Some(drained),
    };
    match drained {
        Some(Ok(bytes)) => SampleResult::from_status(latency, status, bytes),
        Some(Err(err)) => transport_failure(latency, &err),
        // The head already arrived, so the status stands; the body is abandoned.
        None => SampleResult::from_status(latency, status, 0),
    }
}

pub(crate) fn classify_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    }
}

fn transport_failure(latency: Duration, err: &reqwest::Error) -> SampleResult {
    debug!("Request failed: {}", err);
    SampleResult::transport(latency, classify_error(err), err.to_string())
}

fn cancelled_sample(start: Instant) -> SampleResult {
    SampleResult::transport(
        start.elapsed(),
        TransportErrorKind::Cancelled,
        "run cancelled".to_owned(),
    )
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
