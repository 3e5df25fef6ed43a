mod app;
mod entry;
mod shutdown_handlers;

use std::process::ExitCode;

fn main() -> ExitCode {
    entry::run()
}
