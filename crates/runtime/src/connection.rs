//! msgpack-RPC connection to a running editor
//!
//! Requests are strictly sequential: the transport stays locked from the
//! moment a request is written until its response arrives. While waiting:
//! - notifications are logged and dropped (nothing subscribes to events)
//! - responses for other ids are discarded
//! - requests from the editor are refused so it never blocks on us
//! - undecodable frames for other ids are dropped


use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::Value;
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;
use treesync_protocol::{Message, ProtocolError, RemoteError, Request, Response};

use crate::error::{Error, Result};
use crate::transport::{AsyncStream, BoxedStream, Transport};

/// msgpack-RPC connection to one editor instance.
pub struct Connection {
	/// Human-readable endpoint, used in diagnostics.
	label: String,
	/// Sequential request ID counter
	last_id: AtomicU32,
	transport: TokioMutex<Transport>,
}

impl Connection {
	pub fn new(label: impl Into<String>, stream: BoxedStream) -> Self {
		Self {
			label: label.into(),
			last_id: AtomicU32::new(0),
			transport: TokioMutex::new(Transport::from_boxed(stream)),
		}
	}

	/// Wraps an arbitrary stream, e.g. an in-memory duplex in tests.
	pub fn from_stream(label: impl Into<String>, stream: impl AsyncStream + 'static) -> Self {
		Self::new(label, Box::new(stream))
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Calls `method` with positional `params` and awaits its result.
	pub async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst);
		debug!(id, method, "sending request");

		let mut transport = self.transport.lock().await;
		transport
			.send(&Message::Request(Request {
				id,
				method: method.to_string(),
				params,
			}))
			.await?;

		loop {
			let message = match transport.recv().await {
				Ok(message) => message,
				Err(Error::Protocol(err)) if matches!(err, ProtocolError::InvalidUtf8 { .. }) => {
					if matches!(err, ProtocolError::InvalidUtf8 { response_id: Some(reply) } if reply == id) {
						debug!(id, method, error = %err, "reply could not be decoded");
						return Err(Error::InvalidReply {
							method: method.to_string(),
							reason: err.to_string(),
						});
					}
					debug!(error = %err, "dropping undecodable message");
					continue;
				}
				Err(err) => return Err(err),
			};

			match message {
				Message::Response(response) if response.id == id => {
					return match response.error {
						Some(source) => {
							debug!(id, method, error = %source, "request failed");
							Err(Error::Remote {
								method: method.to_string(),
								source,
							})
						}
						None => Ok(response.result),
					};
				}
				Message::Response(stray) => {
					debug!(id = stray.id, "discarding response for unknown request");
				}
				Message::Notification(notification) => {
					debug!(method = %notification.method, "ignoring notification");
				}
				Message::Request(inbound) => {
					debug!(id = inbound.id, method = %inbound.method, "refusing inbound request");
					let refusal = Message::Response(Response {
						id: inbound.id,
						error: Some(RemoteError::new(RemoteError::EXCEPTION, "treesync does not serve requests")),
						result: Value::Null,
					});
					transport.send(&refusal).await?;
				}
			}
		}
	}
}
