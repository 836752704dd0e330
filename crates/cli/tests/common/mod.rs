//! Shared helpers for the binary integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;
use tempfile::TempDir;
use treesync_protocol::{FrameDecoder, Message, RemoteError, Response, encode};

/// A scripted editor listening on a Unix socket in a temp dir.
///
/// Serves a single client until it hangs up. Every request is recorded as
/// the method name, or the Lua chunk for `nvim_exec_lua`.
pub struct FakeNvim {
	_dir: TempDir,
	socket: PathBuf,
	seen: Arc<Mutex<Vec<String>>>,
}

impl FakeNvim {
	pub fn serve<F>(mut handler: F) -> Self
	where
		F: FnMut(&str, &[Value]) -> Result<Value, String> + Send + 'static,
	{
		let dir = TempDir::new().unwrap();
		let socket = dir.path().join("nvim.sock");
		let listener = UnixListener::bind(&socket).unwrap();
		let seen = Arc::new(Mutex::new(Vec::new()));
		let log = Arc::clone(&seen);

		thread::spawn(move || {
			let Ok((mut stream, _)) = listener.accept() else { return };
			let mut decoder = FrameDecoder::new();
			let mut chunk = [0u8; 4096];
			loop {
				while let Ok(Some(message)) = decoder.next_message() {
					let Message::Request(request) = message else { continue };
					let label = match (request.method.as_str(), request.params.first()) {
						("nvim_exec_lua", Some(Value::String(code))) => code.clone(),
						(method, _) => method.to_string(),
					};
					log.lock().unwrap().push(label);

					let (error, result) = match handler(&request.method, &request.params) {
						Ok(result) => (None, result),
						Err(message) => (Some(RemoteError::new(RemoteError::EXCEPTION, message)), Value::Null),
					};
					let response = Message::Response(Response {
						id: request.id,
						error,
						result,
					});
					if stream.write_all(&encode(&response).unwrap()).is_err() {
						return;
					}
				}
				match stream.read(&mut chunk) {
					Ok(0) | Err(_) => return,
					Ok(n) => decoder.extend(&chunk[..n]),
				}
			}
		});

		Self {
			_dir: dir,
			socket,
			seen,
		}
	}

	/// Answers `&filetype` with `filetype` and everything else with nil.
	pub fn with_filetype(filetype: &'static str) -> Self {
		Self::serve(move |method, _| match method {
			"nvim_eval" => Ok(Value::from(filetype)),
			_ => Ok(Value::Null),
		})
	}

	pub fn address(&self) -> String {
		self.socket.to_string_lossy().into_owned()
	}

	pub fn seen(&self) -> Vec<String> {
		self.seen.lock().unwrap().clone()
	}
}

/// Lua chunk passed to `nvim_exec_lua`, or an empty string.
pub fn lua_chunk(params: &[Value]) -> &str {
	params.first().and_then(Value::as_str).unwrap_or_default()
}

pub fn run(bin: &str, args: &[&str]) -> Output {
	run_with_env(bin, args, &[])
}

/// Runs `bin` with only the given `TREESYNC_*` variables set.
pub fn run_with_env(bin: &str, args: &[&str], envs: &[(&str, &str)]) -> Output {
	let mut command = Command::new(bin);
	command.args(args).env_remove("RUST_LOG");
	for (key, _) in std::env::vars().filter(|(key, _)| key.starts_with("TREESYNC_")) {
		command.env_remove(key);
	}
	command
		.envs(envs.iter().copied())
		.output()
		.unwrap_or_else(|err| panic!("failed to execute {bin}: {err}"))
}

pub fn stdout(output: &Output) -> String {
	String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
	String::from_utf8_lossy(&output.stderr).to_string()
}
