//! One live conversation with an editor instance.
//!
//! A [`Session`] owns its [`Connection`] exclusively and is dropped at the
//! end of the invocation. There is no reconnect: once the transport fails
//! every call returns [`Error::SessionLost`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use treesync_runtime::{Address, Connection, PollPolicy};

use crate::error::{Error, Result};

pub struct Session {
	address: String,
	connection: Connection,
}

impl Session {
	/// Parses `address` and connects, retrying on `policy` while the editor
	/// is not listening yet.
	pub async fn connect(address: &str, policy: PollPolicy) -> Result<Self> {
		let parsed = Address::parse(address)?;
		debug!(%parsed, attempts = policy.attempts, "connecting to editor");
		let connection = treesync_runtime::connect(&parsed, policy).await?;
		Ok(Self {
			address: address.to_string(),
			connection,
		})
	}

	/// Wraps an already open connection.
	pub fn from_connection(connection: Connection) -> Self {
		Self {
			address: connection.label().to_string(),
			connection,
		}
	}

	pub fn address(&self) -> &str {
		&self.address
	}

	/// Raw RPC call with remote and transport errors classified.
	pub async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
		Ok(self.connection.request(method, params).await?)
	}

	/// Evaluates a Vimscript expression.
	pub async fn eval<T: DeserializeOwned>(&self, expr: &str) -> Result<T> {
		let value = self.request("nvim_eval", vec![Value::from(expr)]).await?;
		decode("nvim_eval", value)
	}

	/// Runs a Lua chunk; `args` are available to it as `...`.
	pub async fn exec_lua<T: DeserializeOwned>(&self, code: &str, args: Vec<Value>) -> Result<T> {
		trace!(chunk = code.trim_start().lines().next().unwrap_or_default(), "exec_lua");
		let value = self
			.request("nvim_exec_lua", vec![Value::from(code), Value::Array(args)])
			.await?;
		decode("nvim_exec_lua", value)
	}

	/// The filetype of the current buffer in the current window.
	pub async fn filetype(&self) -> Result<String> {
		self.eval("&filetype").await
	}
}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T> {
	serde_json::from_value(value).map_err(|err| Error::Decode {
		method: method.to_string(),
		reason: err.to_string(),
	})
}
