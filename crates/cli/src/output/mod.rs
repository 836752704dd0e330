//! Process output: one result line on stdout, one error line on stderr.


use tracing::debug;

use crate::error::CommandError;

/// What a finished command writes and how the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
	pub stdout: Option<String>,
	pub stderr: Option<String>,
	pub exit_code: i32,
}

impl Report {
	pub fn from_result(result: treesync::Result<String>) -> Self {
		match result {
			Ok(line) => Self {
				stdout: Some(line),
				stderr: None,
				exit_code: 0,
			},
			Err(err) => {
				let cmd_error = CommandError::from(&err);
				Self {
					stdout: cmd_error.stdout.clone(),
					stderr: Some(format_error(&cmd_error)),
					exit_code: cmd_error.code.exit_code(),
				}
			}
		}
	}
}

pub fn format_error(error: &CommandError) -> String {
	format!("Error [{}]: {}", error.code, error.message)
}

/// Prints `result` and returns the exit code.
pub fn finish(result: treesync::Result<String>) -> i32 {
	let report = Report::from_result(result);
	if let Some(line) = &report.stdout {
		println!("{line}");
	}
	if let Some(line) = &report.stderr {
		eprintln!("{line}");
	}
	debug!(exit_code = report.exit_code, "done");
	report.exit_code
}
