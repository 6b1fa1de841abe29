//! calbr - calibration REPL
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::io;
use std::process::ExitCode;

use calbr::cli::{Cli, Repl};
use calbr::commands::register_builtins;
use calbr::core::logging;
use calbr::core::{Dispatcher, Registry};
use calbr::storage::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(&logging::LogOptions::resolve(
        cli.log_level.as_deref(),
        cli.json_output,
        cli.verbose,
    ));

    let no_color = !calbr::util::env::should_use_color(cli.no_color);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", calbr::render::render_error(&e, no_color));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> calbr::Result<()> {
    let settings = Settings::resolve(cli)?;
    if cli.show_config {
        print!("{}", settings.describe());
        return Ok(());
    }

    let mut registry = Registry::new();
    register_builtins(&mut registry, &settings)?;
    tracing::debug!(commands = registry.len(), "Starting session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(Dispatcher::new(registry, settings), stdin.lock(), stdout.lock()).run()
}
