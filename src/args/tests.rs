use super::*;
use crate::error::AppError;
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> Result<HitArgs, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    HitArgs::try_parse_from(args).map_err(|err| format!("parse failed: {}", err))
}

#[test]
fn parse_args_defaults() -> Result<(), String> {
    let args = parse_test_args(["hit", "http://localhost"])?;

    let checks = [
        (args.url.as_deref() == Some("http://localhost"), "Unexpected url"),
        (args.requests.get() == 100, "Unexpected requests"),
        (args.concurrency.is_none(), "Expected concurrency to be None"),
        (args.rps.is_none(), "Expected rps to be None"),
        (args.timeout == Duration::from_secs(5), "Unexpected timeout"),
        (args.method == HttpMethod::Get, "Expected HttpMethod::Get"),
        (args.headers.is_empty(), "Expected no headers"),
        (args.body.is_none(), "Expected body to be None"),
        (args.output == OutputFormat::Text, "Expected text output"),
        (!args.verbose, "Expected verbose to be false"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(message.to_owned());
        }
    }
    Ok(())
}

#[test]
fn parse_args_full_flags() -> Result<(), String> {
    let args = parse_test_args([
        "hit",
        "-n",
        "20",
        "-c",
        "4",
        "-t",
        "10",
        "-d",
        "250ms",
        "-m",
        "post",
        "-H",
        "X-One: 1",
        "-H",
        "X-Two: 2",
        "-b",
        "payload",
        "-o",
        "json",
        "http://localhost:8080/path",
    ])?;

    if args.requests.get() != 20 {
        return Err("Unexpected requests".to_owned());
    }
    if args.concurrency.map(PositiveUsize::get) != Some(4) {
        return Err("Unexpected concurrency".to_owned());
    }
    if args.rps.map(PositiveU64::get) != Some(10) {
        return Err("Unexpected rps".to_owned());
    }
    if args.timeout != Duration::from_millis(250) {
        return Err(format!("Unexpected timeout: {:?}", args.timeout));
    }
    if args.method != HttpMethod::Post {
        return Err("Expected POST".to_owned());
    }
    if args.headers.len() != 2 {
        return Err(format!("Unexpected headers: {:?}", args.headers));
    }
    if args.body.as_deref() != Some("payload") {
        return Err("Unexpected body".to_owned());
    }
    if args.output != OutputFormat::Json {
        return Err("Expected json output".to_owned());
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_requests() -> Result<(), String> {
    match HitArgs::try_parse_from(["hit", "-n", "0", "http://localhost"]) {
        Ok(_) => Err("Expected -n 0 to be rejected".to_owned()),
        Err(_) => Ok(()),
    }
}

#[test]
fn parse_args_rejects_unknown_method() -> Result<(), String> {
    match HitArgs::try_parse_from(["hit", "-m", "DELETE", "http://localhost"]) {
        Ok(_) => Err("Expected DELETE to be rejected".to_owned()),
        Err(_) => Ok(()),
    }
}

#[test]
fn method_from_str_is_case_insensitive() -> Result<(), String> {
    let cases = [("get", HttpMethod::Get), ("Post", HttpMethod::Post), ("PUT", HttpMethod::Put)];
    for (raw, expected) in cases {
        let parsed: HttpMethod = raw.parse().map_err(|err| format!("{}: {}", raw, err))?;
        if parsed != expected {
            return Err(format!("Unexpected method for {}", raw));
        }
    }
    match "PATCH".parse::<HttpMethod>() {
        Ok(_) => Err("Expected PATCH to be rejected".to_owned()),
        Err(err) => {
            if err.to_string().contains("Should be GET, POST or PUT") {
                Ok(())
            } else {
                Err(format!("Unexpected error: {}", err))
            }
        }
    }
}

#[test]
fn parse_header_valid() -> Result<(), String> {
    let (key, value) = parse_header("Content-Type: application/json")
        .map_err(|err| format!("Expected Ok, got Err: {}", err))?;
    if key != "Content-Type" {
        return Err(format!("Unexpected key: {}", key));
    }
    if value != "application/json" {
        return Err(format!("Unexpected value: {}", value));
    }
    Ok(())
}

#[test]
fn parse_header_invalid() -> Result<(), String> {
    for raw in ["MissingDelimiter", ": no-key"] {
        if parse_header(raw).is_ok() {
            return Err(format!("Expected Err for {:?}", raw));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_units() -> Result<(), String> {
    let cases = [
        ("500ms", Duration::from_millis(500)),
        ("5s", Duration::from_secs(5)),
        ("7", Duration::from_secs(7)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (raw, expected) in cases {
        let parsed = parse_duration_arg(raw).map_err(|err| format!("{}: {}", raw, err))?;
        if parsed != expected {
            return Err(format!("Unexpected duration for {}: {:?}", raw, parsed));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_rejects_bad_input() -> Result<(), String> {
    for raw in ["", "0s", "ms", "5x", "0"] {
        if parse_duration_arg(raw).is_ok() {
            return Err(format!("Expected Err for {:?}", raw));
        }
    }
    Ok(())
}

#[test]
fn validate_url_accepts_http() -> Result<(), String> {
    let url = validate_url("http://example.com:8080/x").map_err(|err| err.to_string())?;
    if url.host_str() != Some("example.com") {
        return Err(format!("Unexpected host: {:?}", url.host_str()));
    }
    Ok(())
}

#[test]
fn validate_url_rejections() -> Result<(), String> {
    let cases = [
        ("", "url: required"),
        ("not a url", "url: parse error"),
        ("https://example.com", "only supported scheme is http"),
        ("ftp://example.com", "only supported scheme is http"),
    ];
    for (raw, expected) in cases {
        match validate_url(raw) {
            Ok(_) => return Err(format!("Expected Err for {:?}", raw)),
            Err(err) => {
                if !err.to_string().contains(expected) {
                    return Err(format!("Unexpected error for {:?}: {}", raw, err));
                }
            }
        }
    }
    Ok(())
}

#[test]
fn build_run_plan_rejects_concurrency_above_requests() -> Result<(), String> {
    let args = parse_test_args(["hit", "-n", "5", "-c", "10", "http://localhost"])?;
    match build_run_plan(&args) {
        Ok(_) => Err("Expected Err when -c > -n".to_owned()),
        Err(err) => {
            if !err.is_usage() {
                return Err(format!("Expected usage error, got {}", err));
            }
            if err.to_string().contains("-c=10: should be less than or equal to -n=5") {
                Ok(())
            } else {
                Err(format!("Unexpected error: {}", err))
            }
        }
    }
}

#[test]
fn build_run_plan_requires_url() -> Result<(), String> {
    let args = parse_test_args(["hit"])?;
    match build_run_plan(&args) {
        Err(AppError::Validation(_)) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected Err without url".to_owned()),
    }
}

#[test]
fn build_run_plan_defaults_concurrency_to_at_most_requests() -> Result<(), String> {
    let args = parse_test_args(["hit", "-n", "1", "http://localhost"])?;
    let plan = build_run_plan(&args).map_err(|err| err.to_string())?;
    if plan.config.concurrency.get() != 1 {
        return Err(format!("Unexpected concurrency: {}", plan.config.concurrency));
    }
    Ok(())
}

#[test]
fn build_run_plan_carries_request_shape() -> Result<(), String> {
    let args = parse_test_args([
        "hit",
        "-n",
        "4",
        "-c",
        "2",
        "-t",
        "3",
        "-m",
        "PUT",
        "-H",
        "X-Trace: abc",
        "-b",
        "data",
        "http://localhost:9000/items",
    ])?;
    let plan = build_run_plan(&args).map_err(|err| err.to_string())?;

    if plan.config.requests.get() != 4 || plan.config.concurrency.get() != 2 {
        return Err(format!("Unexpected config: {:?}", plan.config));
    }
    if plan.config.rate.map(std::num::NonZeroU64::get) != Some(3) {
        return Err("Unexpected rate".to_owned());
    }
    if *plan.template.method() != reqwest::Method::PUT {
        return Err("Expected PUT".to_owned());
    }
    if plan.template.url().as_str() != "http://localhost:9000/items" {
        return Err(format!("Unexpected url: {}", plan.template.url()));
    }
    let trace = plan
        .template
        .headers()
        .get("x-trace")
        .and_then(|value| value.to_str().ok());
    if trace != Some("abc") {
        return Err(format!("Unexpected header: {:?}", trace));
    }

    let request = plan.template.instantiate();
    let body = request.body().and_then(reqwest::Body::as_bytes);
    if body != Some(b"data".as_slice()) {
        return Err(format!("Unexpected body: {:?}", body));
    }
    Ok(())
}

#[test]
fn build_run_plan_rejects_bad_header_name() -> Result<(), String> {
    let args = parse_test_args(["hit", "-H", "Bad Name: x", "http://localhost"])?;
    match build_run_plan(&args) {
        Err(AppError::Http(_)) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected header name to be rejected".to_owned()),
    }
}
