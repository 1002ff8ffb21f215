//! ensure-unique: run a command at most once at a time across hosts.
//!
//! This is the main entry point for the `ensure-unique` CLI. It parses
//! arguments, sets up logging, dispatches to the command handler, and turns
//! the outcome into the process exit code.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod invocation;
pub mod locks;
pub mod logging;
pub mod runner;
pub mod token;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.global.verbose, cli.global.quiet);

    match commands::dispatch(cli.global, cli.command) {
        Ok(code) => exit_codes::to_exit_code(code),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(exit_codes::surfaced_code(err.exit_code()))
        }
    }
}
