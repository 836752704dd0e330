use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::error::{ProtocolError, Result};

const REQUEST: u8 = 0;
const RESPONSE: u8 = 1;
const NOTIFICATION: u8 = 2;

/// Request sent to (or, rarely, received from) the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
	/// Sequence number echoed back in the matching [`Response`].
	pub id: u32,
	/// API function name, e.g. `nvim_exec_lua`.
	pub method: String,
	/// Positional arguments.
	pub params: Vec<Value>,
}

/// Reply to a [`Request`]. `error` and `result` are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
	pub id: u32,
	pub error: Option<RemoteError>,
	pub result: Value,
}

/// One-way message with no reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
	pub method: String,
	pub params: Vec<Value>,
}

/// Discriminated union of msgpack-RPC messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
	Request(Request),
	Response(Response),
	Notification(Notification),
}

/// Error payload of a failed response.
///
/// Neovim sends `[kind, message]`, where kind `0` is an exception (including
/// Lua errors raised by `nvim_exec_lua`) and `1` a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
	pub kind: i64,
	pub message: String,
}

impl RemoteError {
	pub const EXCEPTION: i64 = 0;
	pub const VALIDATION: i64 = 1;

	pub fn new(kind: i64, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	/// Builds an error from whatever the peer put in the error slot.
	///
	/// Non-standard payloads are kept verbatim in `message` so nothing is lost
	/// in diagnostics.
	pub fn from_value(value: Value) -> Self {
		match value {
			Value::Array(items) => match items.as_slice() {
				[Value::Number(kind), Value::String(message)] => Self::new(kind.as_i64().unwrap_or(Self::EXCEPTION), message.clone()),
				_ => Self::new(Self::EXCEPTION, Value::Array(items).to_string()),
			},
			Value::String(message) => Self::new(Self::EXCEPTION, message),
			other => Self::new(Self::EXCEPTION, other.to_string()),
		}
	}
}

impl Message {
	/// Classifies a decoded msgpack value.
	pub fn from_value(value: Value) -> Result<Self> {
		let Value::Array(items) = value else {
			return Err(ProtocolError::Malformed(format!("expected array, got {value}")));
		};

		let tag = items
			.first()
			.and_then(Value::as_u64)
			.ok_or_else(|| ProtocolError::Malformed("missing message type tag".into()))?;

		match tag {
			t if t == u64::from(REQUEST) => {
				let [_, id, method, params] = fields(items, "request")?;
				Ok(Message::Request(Request {
					id: message_id(&id)?,
					method: method_name(method)?,
					params: param_list(params)?,
				}))
			}
			t if t == u64::from(RESPONSE) => {
				let [_, id, error, result] = fields(items, "response")?;
				Ok(Message::Response(Response {
					id: message_id(&id)?,
					error: (!error.is_null()).then(|| RemoteError::from_value(error)),
					result,
				}))
			}
			t if t == u64::from(NOTIFICATION) => {
				let [_, method, params] = fields(items, "notification")?;
				Ok(Message::Notification(Notification {
					method: method_name(method)?,
					params: param_list(params)?,
				}))
			}
			other => Err(ProtocolError::Malformed(format!("unknown message type {other}"))),
		}
	}
}

impl Serialize for Message {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Message::Request(req) => (REQUEST, req.id, &req.method, &req.params).serialize(serializer),
			Message::Response(resp) => {
				let error = resp.error.as_ref().map(|e| (e.kind, &e.message));
				(RESPONSE, resp.id, error, &resp.result).serialize(serializer)
			}
			Message::Notification(notif) => (NOTIFICATION, &notif.method, &notif.params).serialize(serializer),
		}
	}
}

fn fields<const N: usize>(items: Vec<Value>, what: &str) -> Result<[Value; N]> {
	let len = items.len();
	<[Value; N]>::try_from(items).map_err(|_| ProtocolError::Malformed(format!("{what} must have {N} elements, got {len}")))
}

fn message_id(value: &Value) -> Result<u32> {
	value
		.as_u64()
		.and_then(|id| u32::try_from(id).ok())
		.ok_or_else(|| ProtocolError::Malformed(format!("invalid message id {value}")))
}

fn method_name(value: Value) -> Result<String> {
	match value {
		Value::String(name) => Ok(name),
		other => Err(ProtocolError::Malformed(format!("invalid method name {other}"))),
	}
}

fn param_list(value: Value) -> Result<Vec<Value>> {
	match value {
		Value::Array(params) => Ok(params),
		Value::Null => Ok(Vec::new()),
		other => Err(ProtocolError::Malformed(format!("params must be an array, got {other}"))),
	}
}
