//! Command-line drivers for treesync.
//!
//! Every binary parses its arguments, installs logging, runs one command
//! and exits with the code derived from the outcome. stdout carries exactly
//! one line: the detected filetype or the resulting root.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod styles;

use cli::Commands;

/// Runs `command` to completion and returns the process exit code.
pub async fn run(verbose: u8, command: Commands) -> i32 {
	logging::init_logging(verbose);
	let result = commands::dispatch(command).await;
	output::finish(result)
}
