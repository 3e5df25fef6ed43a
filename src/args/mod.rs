//! CLI argument types, parsing helpers, and run validation.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use cli::HitArgs;
pub use types::{HttpMethod, OutputFormat, PositiveU64, PositiveUsize};
pub use validate::{RunPlan, build_run_plan, validate_url};

pub(crate) use defaults::DEFAULT_USER_AGENT;
pub use parsers::{parse_duration_arg, parse_header};
