pub mod accounts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod packages;
pub mod runner;
pub mod traits;
pub mod ui;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

use clap::Parser;
use std::process::exit;

/// Run hostprep CLI entrypoint.
pub fn run_cli() {
    // 1. Signal handling: mark cancellation so pending prompts and batches stop
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    }) {
        ui::warning(&format!("Could not install Ctrl-C handler: {}", e));
    }

    // 2. Parse & Run
    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet || args.global.format.is_machine());
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args) {
        ui::error(&format!("{}", e));
        exit(1);
    }
}
