//! Error types for the treesync runtime.

use thiserror::Error;
use treesync_protocol::{ProtocolError, RemoteError};

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while connecting to or talking with the editor.
#[derive(Debug, Error)]
pub enum Error {
	/// The address string is empty or otherwise unusable.
	#[error("Invalid editor address '{address}': {reason}")]
	InvalidAddress { address: String, reason: String },

	/// The address names a transport this platform cannot open.
	#[error("Transport unavailable for '{address}': {reason}")]
	TransportUnavailable { address: String, reason: String },

	/// Every connection attempt found the editor not yet listening.
	#[error("Timed out connecting to '{address}' after {attempts} attempts")]
	ConnectionTimeout {
		address: String,
		attempts: u32,
		#[source]
		last_error: Option<std::io::Error>,
	},

	/// Opening the transport failed in a way retrying will not fix.
	#[error("Failed to connect to '{address}': {source}")]
	Connect {
		address: String,
		#[source]
		source: std::io::Error,
	},

	/// The peer closed the stream while a response was outstanding.
	#[error("Connection closed by the editor")]
	ConnectionClosed,

	/// The editor answered a request with an error.
	#[error("{method} failed: {source}")]
	Remote {
		method: String,
		#[source]
		source: RemoteError,
	},

	/// The reply to `method` arrived whole but its payload could not be
	/// decoded. The stream is still in sync.
	#[error("{method} returned an undecodable reply: {reason}")]
	InvalidReply { method: String, reason: String },

	/// Wire-level encode/decode failure.
	#[error("Protocol error: {0}")]
	Protocol(#[from] ProtocolError),

	/// I/O error on an established transport.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true if the transport is unusable after this error.
	pub fn is_transport_failure(&self) -> bool {
		match self {
			Error::ConnectionClosed | Error::Io(_) => true,
			Error::Protocol(err) => !matches!(err, ProtocolError::InvalidUtf8 { .. }),
			_ => false,
		}
	}
}
