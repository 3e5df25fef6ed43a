use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::{AppError, AppResult, HttpError, ValidationError};
use crate::http::{RequestTemplate, RunConfig};

use super::cli::HitArgs;
use super::defaults::default_concurrency;

/// Validated input for one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub config: RunConfig,
    pub template: RequestTemplate,
}

/// Checks that `raw` is an absolute `http` URL with a host.
///
/// # Errors
///
/// Returns an error when the URL is empty, unparsable, not `http`, or has no
/// host.
pub fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::MissingUrl);
    }
    let url = Url::parse(raw.trim()).map_err(|err| ValidationError::UrlParse { source: err })?;
    if url.scheme() != "http" {
        return Err(ValidationError::UnsupportedScheme {
            scheme: url.scheme().to_owned(),
        });
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::MissingHost);
    }
    Ok(url)
}

/// Turns parsed arguments into a run configuration and request template.
///
/// # Errors
///
/// Returns an error when the URL is missing or invalid, when `-c` exceeds
/// `-n`, or when a header cannot be represented.
pub fn build_run_plan(args: &HitArgs) -> AppResult<RunPlan> {
    let raw_url = args
        .url
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
    let url = validate_url(raw_url).map_err(AppError::validation)?;

    let requests = args.requests.as_non_zero();
    let concurrency = match args.concurrency {
        Some(concurrency) => {
            let requested = u64::try_from(concurrency.get()).unwrap_or(u64::MAX);
            if requested > requests.get() {
                return Err(AppError::validation(
                    ValidationError::ConcurrencyExceedsRequests {
                        concurrency: concurrency.get(),
                        requests: requests.get(),
                    },
                ));
            }
            concurrency.as_non_zero()
        }
        None => cap_concurrency(default_concurrency(), requests.get()),
    };

    let config = RunConfig::new(requests, concurrency, args.timeout)
        .with_rate(args.rps.map(|rps| rps.as_non_zero()));

    let mut template = RequestTemplate::new(args.method.into(), url)
        .with_headers(build_headers(&args.headers)?);
    if let Some(body) = args.body.as_ref() {
        template = template.with_body(body.clone());
    }

    Ok(RunPlan { config, template })
}

fn cap_concurrency(
    concurrency: std::num::NonZeroUsize,
    requests: u64,
) -> std::num::NonZeroUsize {
    let cap = usize::try_from(requests).unwrap_or(usize::MAX);
    std::num::NonZeroUsize::new(concurrency.get().min(cap)).unwrap_or(concurrency)
}

fn build_headers(headers: &[(String, String)]) -> AppResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderName {
                name: name.clone(),
                source: err,
            })
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderValue {
                name: name.clone(),
                source: err,
            })
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
