use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid method '{value}'. Should be GET, POST or PUT.")]
    InvalidMethod { value: String },
    #[error("url: required")]
    MissingUrl,
    #[error("url: parse error: {source}")]
    UrlParse {
        #[source]
        source: url::ParseError,
    },
    #[error("url: only supported scheme is http (got '{scheme}')")]
    UnsupportedScheme { scheme: String },
    #[error("url: missing host")]
    MissingHost,
    #[error("-c={concurrency}: should be less than or equal to -n={requests}")]
    ConcurrencyExceedsRequests { concurrency: usize, requests: u64 },
}
