use thiserror::Error;

/// Result type alias for wire-level operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding msgpack-RPC messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
	#[error("msgpack encode failed: {0}")]
	Encode(#[from] rmp_serde::encode::Error),

	#[error("msgpack decode failed: {0}")]
	Decode(#[from] rmp_serde::decode::Error),

	/// The value decoded fine but is not a msgpack-RPC message.
	#[error("malformed message: {0}")]
	Malformed(String),

	/// A complete message carried a string that is not valid UTF-8. The
	/// frame was consumed; `response_id` is set when it was a response.
	#[error("message contains a string that is not valid UTF-8")]
	InvalidUtf8 { response_id: Option<u32> },
}
