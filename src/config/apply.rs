use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{HitArgs, HttpMethod, PositiveU64, PositiveUsize, parse_header};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(args: &mut HitArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method.as_deref()
    {
        args.method = method.parse::<HttpMethod>().map_err(AppError::validation)?;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = PositiveU64::try_from(requests).map_err(|err| positive("requests", err))?;
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency =
            Some(PositiveUsize::try_from(concurrency).map_err(|err| positive("concurrency", err))?);
    }

    if !is_cli(matches, "rps")
        && let Some(rps) = config.rps
    {
        args.rps = Some(PositiveU64::try_from(rps).map_err(|err| positive("rps", err))?);
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout.to_duration().map_err(|err| {
            AppError::config(ConfigError::InvalidDuration {
                field: "timeout",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(
                parse_header(header)
                    .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
            );
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "body")
        && let Some(body) = config.body.clone()
    {
        args.body = Some(body);
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output
    {
        args.output = output;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    Ok(())
}

fn positive(field: &str, err: crate::error::ValidationError) -> AppError {
    AppError::config(ConfigError::FieldMustBePositive {
        field: field.to_owned(),
        source: err,
    })
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
