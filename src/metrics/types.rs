use std::time::Duration;

use serde::Serialize;

/// Why a request produced no usable HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Cancelled,
    Other,
}

impl TransportErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Cancelled => "cancelled",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { status: u16 },
    HttpError { status: u16 },
    TransportError {
        kind: TransportErrorKind,
        detail: String,
    },
}

/// Result of executing exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleResult {
    pub latency: Duration,
    pub response_bytes: u64,
    pub outcome: Outcome,
}

/// Statuses at or above this are counted as HTTP errors.
pub const HTTP_ERROR_THRESHOLD: u16 = 400;

impl SampleResult {
    /// Classifies a received response by its status code.
    #[must_use]
    pub const fn from_status(latency: Duration, status: u16, response_bytes: u64) -> Self {
        let outcome = if status >= HTTP_ERROR_THRESHOLD {
            Outcome::HttpError { status }
        } else {
            Outcome::Success { status }
        };
        Self {
            latency,
            response_bytes,
            outcome,
        }
    }

    #[must_use]
    pub const fn transport(latency: Duration, kind: TransportErrorKind, detail: String) -> Self {
        Self {
            latency,
            response_bytes: 0,
            outcome: Outcome::TransportError { kind, detail },
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }
}
