use clap::Parser;
use std::time::Duration;

use super::defaults::{DEFAULT_REQUESTS, DEFAULT_TIMEOUT};
use super::parsers::{
    parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
};
use super::types::{HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "hit",
    version,
    about = "Concurrent HTTP load generator - sends N requests with a bounded worker pool and reports latency percentiles."
)]
pub struct HitArgs {
    /// Target URL (http only)
    pub url: Option<String>,

    /// Number of requests to make
    #[arg(
        long = "requests",
        short = 'n',
        default_value = DEFAULT_REQUESTS,
        value_parser = parse_positive_u64
    )]
    pub requests: PositiveU64,

    /// Concurrency level (defaults to the number of CPUs, capped at -n)
    #[arg(long = "concurrency", short = 'c', value_parser = parse_positive_usize)]
    pub concurrency: Option<PositiveUsize>,

    /// Throttle requests per second, per worker
    #[arg(long = "rps", short = 't', value_parser = parse_positive_u64)]
    pub rps: Option<PositiveU64>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        short = 'd',
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub timeout: Duration,

    /// HTTP method to use
    #[arg(long, short = 'm', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body (for POST/PUT)
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Path to a TOML or JSON config file
    #[arg(long)]
    pub config: Option<String>,

    /// Report format
    #[arg(long = "output", short = 'o', default_value = "text", ignore_case = true)]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
