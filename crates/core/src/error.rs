//! Error taxonomy for one synchronization run.
//!
//! Every variant is terminal for the invocation. Retrying is confined to the
//! bounded waits for connection and readiness; a broken session is never
//! retried.

use thiserror::Error;

/// Result type alias for treesync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The address form cannot be opened on this platform, or is malformed.
	#[error("transport unavailable for {address}: {reason}")]
	TransportUnavailable { address: String, reason: String },

	/// The editor never started listening within the attempt bound.
	#[error("timed out connecting to {address} after {attempts} attempts")]
	ConnectionTimeout { address: String, attempts: u32 },

	/// Opening the transport failed for a reason other than "not ready yet".
	#[error("failed to connect to {address}: {source}")]
	Connect {
		address: String,
		#[source]
		source: std::io::Error,
	},

	/// The current buffer never became a supported tree view.
	#[error("timed out waiting for NvimTree or neo-tree after {attempts} attempts (last filetype: {last_filetype:?})")]
	ReadinessTimeout { attempts: u32, last_filetype: String },

	/// The current buffer is not a supported tree view.
	#[error("unsupported filetype {filetype:?}, expected NvimTree or neo-tree")]
	UnsupportedBackend { filetype: String },

	/// The transport failed mid-operation.
	#[error("session lost: {0}")]
	SessionLost(#[source] treesync_runtime::Error),

	/// The editor rejected a request, typically a Lua error inside a plugin.
	#[error("editor rejected {method}: {message}")]
	Editor { method: String, message: String },

	/// The editor replied with a value of an unexpected shape.
	#[error("unexpected reply to {method}: {reason}")]
	Decode { method: String, reason: String },
}

/// Coarse failure class, used for exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	TransportUnavailable,
	ConnectionTimeout,
	ReadinessTimeout,
	UnsupportedBackend,
	SessionLost,
	Editor,
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::TransportUnavailable { .. } => ErrorKind::TransportUnavailable,
			Error::ConnectionTimeout { .. } | Error::Connect { .. } => ErrorKind::ConnectionTimeout,
			Error::ReadinessTimeout { .. } => ErrorKind::ReadinessTimeout,
			Error::UnsupportedBackend { .. } => ErrorKind::UnsupportedBackend,
			Error::SessionLost(_) => ErrorKind::SessionLost,
			Error::Editor { .. } | Error::Decode { .. } => ErrorKind::Editor,
		}
	}
}

impl From<treesync_runtime::Error> for Error {
	fn from(err: treesync_runtime::Error) -> Self {
		use treesync_runtime::Error as Rt;

		match err {
			Rt::InvalidAddress { address, reason } | Rt::TransportUnavailable { address, reason } => {
				Error::TransportUnavailable { address, reason }
			}
			Rt::ConnectionTimeout { address, attempts, .. } => Error::ConnectionTimeout { address, attempts },
			Rt::Connect { address, source } => Error::Connect { address, source },
			Rt::Remote { method, source } => Error::Editor {
				method,
				message: source.message,
			},
			Rt::InvalidReply { method, reason } => Error::Decode { method, reason },
			other => Error::SessionLost(other),
		}
	}
}
