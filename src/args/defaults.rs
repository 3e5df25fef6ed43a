use std::num::NonZeroUsize;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("hit/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_REQUESTS: &str = "100";

pub(crate) const DEFAULT_TIMEOUT: &str = "5s";

/// One worker per available CPU when `-c` is not given.
pub(crate) fn default_concurrency() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
