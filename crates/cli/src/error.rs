//! Error codes and exit statuses reported by the binaries.

use std::fmt;

use treesync::{Error, ErrorKind};

/// Exit status for a usage error; clap exits with it on its own.
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
	/// The current buffer is not a supported tree view
	UnsupportedBackend,
	/// The address form cannot be opened on this platform
	TransportUnavailable,
	/// The editor never started listening
	ConnectionTimeout,
	/// The tree view never appeared
	ReadinessTimeout,
	/// The connection broke mid-operation
	SessionLost,
	/// The editor rejected a request
	EditorError,
}

impl ErrorCode {
	pub fn exit_code(self) -> i32 {
		match self {
			ErrorCode::UnsupportedBackend => 1,
			ErrorCode::TransportUnavailable => 50,
			ErrorCode::ConnectionTimeout => 51,
			ErrorCode::ReadinessTimeout => 52,
			ErrorCode::SessionLost => 53,
			ErrorCode::EditorError => 54,
		}
	}
}

impl From<ErrorKind> for ErrorCode {
	fn from(kind: ErrorKind) -> Self {
		match kind {
			ErrorKind::UnsupportedBackend => ErrorCode::UnsupportedBackend,
			ErrorKind::TransportUnavailable => ErrorCode::TransportUnavailable,
			ErrorKind::ConnectionTimeout => ErrorCode::ConnectionTimeout,
			ErrorKind::ReadinessTimeout => ErrorCode::ReadinessTimeout,
			ErrorKind::SessionLost => ErrorCode::SessionLost,
			ErrorKind::Editor => ErrorCode::EditorError,
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ErrorCode::UnsupportedBackend => write!(f, "UNSUPPORTED_BACKEND"),
			ErrorCode::TransportUnavailable => write!(f, "TRANSPORT_UNAVAILABLE"),
			ErrorCode::ConnectionTimeout => write!(f, "CONNECTION_TIMEOUT"),
			ErrorCode::ReadinessTimeout => write!(f, "READINESS_TIMEOUT"),
			ErrorCode::SessionLost => write!(f, "SESSION_LOST"),
			ErrorCode::EditorError => write!(f, "EDITOR_ERROR"),
		}
	}
}

/// A failed command, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
	/// Printed on stdout so the caller can tell what the editor was showing.
	pub stdout: Option<String>,
}

impl From<&Error> for CommandError {
	fn from(err: &Error) -> Self {
		let stdout = match err {
			Error::ReadinessTimeout { last_filetype, .. } => Some(last_filetype.clone()),
			_ => None,
		};
		Self {
			code: err.kind().into(),
			message: err.to_string(),
			stdout,
		}
	}
}
