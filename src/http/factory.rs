use bytes::Bytes;
use reqwest::{Body, Method, Request, Url, header::HeaderMap};
use tokio::sync::mpsc;
use tracing::debug;

use crate::shutdown::{ShutdownReceiver, cancelled};

/// Queue depth between pipeline stages. Upstream stays at most one item
/// ahead of its consumer.
pub(crate) const STAGE_CAPACITY: usize = 1;

/// Request shape every work item is copied from.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestTemplate {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Builds an independent request. Header state is copied; the body
    /// shares the template's immutable buffer.
    #[must_use]
    pub fn instantiate(&self) -> Request {
        let mut request = Request::new(self.method.clone(), self.url.clone());
        *request.headers_mut() = self.headers.clone();
        if let Some(body) = self.body.as_ref() {
            *request.body_mut() = Some(Body::from(body.clone()));
        }
        request
    }
}

/// One request to execute, bound to the run it belongs to.
#[derive(Debug)]
pub struct WorkItem {
    pub request: Request,
    pub shutdown: ShutdownReceiver,
}

/// Lazily emits exactly `count` work items unless the run is cancelled.
///
/// A queue slot is reserved before each item is built, so nothing is
/// materialized once cancellation fires or the consumer goes away.
pub fn produce(
    template: RequestTemplate,
    count: u64,
    shutdown: ShutdownReceiver,
) -> mpsc::Receiver<WorkItem> {
    let (items_tx, items_rx) = mpsc::channel(STAGE_CAPACITY);
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown.clone();
        let mut produced: u64 = 0;
        while produced < count {
            let permit = tokio::select! {
                biased;
                () = cancelled(&mut shutdown_rx) => break,
                permit = items_tx.reserve() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };
            permit.send(WorkItem {
                request: template.instantiate(),
                shutdown: shutdown.clone(),
            });
            produced = produced.saturating_add(1);
        }
        debug!("Producer stopped after {} of {} requests", produced, count);
    });
    items_rx
}
