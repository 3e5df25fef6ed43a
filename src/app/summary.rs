use std::time::Duration;

use hit::args::{OutputFormat, RunPlan};
use hit::error::AppResult;
use hit::metrics::FinalReport;

pub(crate) fn print_banner(plan: &RunPlan, output: OutputFormat) {
    let rps = plan
        .config
        .rate
        .map_or_else(|| "unlimited".to_owned(), |rate| rate.to_string());
    let banner = format!(
        "Making {} {} requests to {} with a concurrency level of {} (Timeout={:?}, RPS={}).",
        plan.config.requests,
        plan.template.method(),
        plan.template.url(),
        plan.config.concurrency,
        plan.config.timeout,
        rps
    );
    // Keep stdout a single JSON document.
    match output {
        OutputFormat::Text => println!("{}", banner),
        OutputFormat::Json => eprintln!("{}", banner),
    }
}

pub(crate) const fn success_rate_x100(report: &FinalReport) -> u64 {
    if report.total_requests == 0 {
        return 0;
    }
    10_000u64.saturating_sub(report.error_rate_x100)
}

pub(crate) fn format_latency(value: Duration) -> String {
    let micros = u64::try_from(value.as_micros()).unwrap_or(u64::MAX);
    format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
}

pub(crate) fn print_summary(report: &FinalReport) {
    let success_rate = success_rate_x100(report);

    println!();
    println!("Summary:");
    println!(
        "  Success:     {}.{:02}%",
        success_rate / 100,
        success_rate % 100
    );
    println!(
        "  RPS:         {}.{:02}",
        report.rps_x100 / 100,
        report.rps_x100 % 100
    );
    println!("  Requests:    {}", report.total_requests);
    println!("  Successful:  {}", report.successful_requests);
    println!(
        "  Errors:      {} ({}.{:02}%)",
        report.error_requests,
        report.error_rate_x100 / 100,
        report.error_rate_x100 % 100
    );
    println!("  Bytes:       {}", report.response_bytes);
    println!("  Duration:    {}", format_latency(report.elapsed));
    println!("  Fastest:     {}", format_latency(report.min_latency));
    println!("  Slowest:     {}", format_latency(report.max_latency));
    println!("  Mean:        {}", format_latency(report.mean_latency));
    println!(
        "  P50/P90/P99: {} / {} / {}",
        format_latency(report.p50_latency),
        format_latency(report.p90_latency),
        format_latency(report.p99_latency)
    );

    if !report.http_errors.is_empty() {
        println!("  HTTP errors:");
        for (status, count) in &report.http_errors {
            println!("    {}: {}", status, count);
        }
    }
    if !report.transport_errors.is_empty() {
        println!("  Transport errors:");
        for (kind, count) in &report.transport_errors {
            println!("    {}: {}", kind.as_str(), count);
        }
    }
}

pub(crate) fn print_json(report: &FinalReport) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(report)?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn report(total: u64, errors: u64) -> FinalReport {
        FinalReport {
            total_requests: total,
            successful_requests: total.saturating_sub(errors),
            error_requests: errors,
            http_errors: BTreeMap::new(),
            transport_errors: BTreeMap::new(),
            response_bytes: 0,
            elapsed: Duration::from_secs(1),
            rps_x100: 0,
            error_rate_x100: errors
                .saturating_mul(10_000)
                .checked_div(total)
                .unwrap_or(0),
            mean_latency: Duration::ZERO,
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
            p50_latency: Duration::ZERO,
            p90_latency: Duration::ZERO,
            p99_latency: Duration::ZERO,
        }
    }

    #[test]
    fn success_rate_complements_error_rate() -> Result<(), String> {
        let cases = [(0, 0, 0), (4, 0, 10_000), (4, 1, 7_500), (3, 3, 0)];
        for (total, errors, expected) in cases {
            let rate = success_rate_x100(&report(total, errors));
            if rate != expected {
                return Err(format!(
                    "Unexpected success rate for {}/{}: {}",
                    errors, total, rate
                ));
            }
        }
        Ok(())
    }

    #[test]
    fn format_latency_keeps_microseconds() -> Result<(), String> {
        let cases = [
            (Duration::ZERO, "0.000ms"),
            (Duration::from_micros(1_500), "1.500ms"),
            (Duration::from_millis(250), "250.000ms"),
        ];
        for (value, expected) in cases {
            let formatted = format_latency(value);
            if formatted != expected {
                return Err(format!("Unexpected format for {:?}: {}", value, formatted));
            }
        }
        Ok(())
    }
}
