use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches};
use tracing::debug;

use hit::args::{HitArgs, OutputFormat, RunPlan, build_run_plan};
use hit::config::{apply_config, load_config};
use hit::error::AppResult;
use hit::http::Client;
use hit::logger::init_logging;
use hit::shutdown::shutdown_channel;

use crate::app::summary::{print_banner, print_json, print_summary};
use crate::shutdown_handlers::setup_signal_shutdown_handler;

/// Exit code for invalid input, matching clap's own usage errors.
const USAGE_EXIT_CODE: u8 = 2;

pub(crate) fn run() -> ExitCode {
    match try_run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_usage() => {
            eprintln!("{}", err);
            eprintln!();
            eprintln!("{}", HitArgs::command().render_usage());
            ExitCode::from(USAGE_EXIT_CODE)
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_run() -> AppResult<()> {
    let matches = HitArgs::command().get_matches();
    let mut args = HitArgs::from_arg_matches(&matches)?;

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    init_logging(args.verbose);

    let plan = build_run_plan(&args)?;
    let output = args.output;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&plan, output))
}

async fn run_async(plan: &RunPlan, output: OutputFormat) -> AppResult<()> {
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    print_banner(plan, output);

    let client = Client::new(plan.config);
    let result = client.run(&plan.template, &shutdown_rx).await;
    signal_handle.abort();
    let report = result?;
    debug!(total = report.total_requests, "Printing report");

    match output {
        OutputFormat::Text => print_summary(&report),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}
