//! Editor endpoint addresses.
//!
//! Neovim's `--listen` accepts either a filesystem path (Unix-domain socket,
//! or a named pipe on Windows) or a `host:port` pair. The same strings show up
//! in `$NVIM` and `v:servername`, so they are parsed here without any
//! filesystem access.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Where a running editor is listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
	/// Unix-domain socket path.
	Unix(PathBuf),
	/// TCP endpoint in `host:port` form.
	Tcp(String),
	/// Windows named pipe, e.g. `\\.\pipe\nvim.1234.0`.
	NamedPipe(String),
}

const PIPE_PREFIXES: [&str; 2] = [r"\\.\pipe\", r"\\?\pipe\"];

impl Address {
	pub fn parse(raw: &str) -> Result<Self> {
		let trimmed = raw.trim();
		if trimmed.is_empty() {
			return Err(Error::InvalidAddress {
				address: raw.to_string(),
				reason: "address is empty".into(),
			});
		}

		let lowered = trimmed.to_ascii_lowercase();
		if PIPE_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
			return Ok(Address::NamedPipe(trimmed.to_string()));
		}

		if looks_like_tcp(trimmed) {
			return Ok(Address::Tcp(trimmed.to_string()));
		}

		Ok(Address::Unix(PathBuf::from(trimmed)))
	}

	/// Returns true if this platform has a transport for the address.
	pub fn is_supported(&self) -> bool {
		match self {
			Address::Unix(_) => cfg!(unix),
			Address::Tcp(_) => true,
			Address::NamedPipe(_) => cfg!(windows),
		}
	}

	pub(crate) fn transport_name(&self) -> &'static str {
		match self {
			Address::Unix(_) => "unix socket",
			Address::Tcp(_) => "tcp",
			Address::NamedPipe(_) => "named pipe",
		}
	}
}

/// `host:port` with a numeric port and a host that is not a path.
fn looks_like_tcp(raw: &str) -> bool {
	let Some((host, port)) = raw.rsplit_once(':') else {
		return false;
	};
	!host.is_empty() && !host.contains(['/', '\\']) && port.parse::<u16>().is_ok()
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Address::Unix(path) => write!(f, "{}", path.display()),
			Address::Tcp(endpoint) | Address::NamedPipe(endpoint) => f.write_str(endpoint),
		}
	}
}
