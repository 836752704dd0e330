//! Connect-with-retry for an editor that may still be starting.
//!
//! The pane manager typically launches Neovim and this engine at the same
//! time, so the listen socket may not exist yet (`NotFound`) or may exist
//! without an accepting listener (`ConnectionRefused`). Both count as "not
//! ready" and are retried on a fixed [`PollPolicy`]. The editor is never
//! spawned from here.
//!
//! Each attempt is itself bounded, so a TCP host that drops packets cannot
//! stretch one attempt to the OS connect timeout.

use std::future::Future;
use std::io::{self, ErrorKind};
use std::time::Duration;

use tracing::debug;

use crate::address::Address;
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::poll::PollPolicy;
use crate::transport;

/// Shortest time a single attempt is given before it counts as not ready.
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(1);

/// Opens a connection to `address`, retrying while the editor is not listening.
pub async fn connect(address: &Address, policy: PollPolicy) -> Result<Connection> {
	if !address.is_supported() {
		return Err(Error::TransportUnavailable {
			address: address.to_string(),
			reason: format!("{} transport is not available on this platform", address.transport_name()),
		});
	}

	let attempt_timeout = policy.interval.max(MIN_ATTEMPT_TIMEOUT);
	let mut last_error = None;
	for attempt in 1..=policy.attempts {
		match within(attempt_timeout, transport::open(address)).await {
			Ok(stream) => {
				debug!(%address, attempt, "connected to editor");
				return Ok(Connection::new(address.to_string(), stream));
			}
			Err(err) if is_not_ready(&err) => {
				debug!(%address, attempt, error = %err, "editor not listening yet");
				last_error = Some(err);
			}
			Err(err) => {
				return Err(Error::Connect {
					address: address.to_string(),
					source: err,
				});
			}
		}

		if attempt < policy.attempts {
			tokio::time::sleep(policy.interval).await;
		}
	}

	debug!(%address, attempts = policy.attempts, "gave up waiting for editor");
	Err(Error::ConnectionTimeout {
		address: address.to_string(),
		attempts: policy.attempts,
		last_error,
	})
}

/// Runs one attempt, turning an elapsed `limit` into [`ErrorKind::TimedOut`].
async fn within<T>(limit: Duration, attempt: impl Future<Output = io::Result<T>>) -> io::Result<T> {
	match tokio::time::timeout(limit, attempt).await {
		Ok(result) => result,
		Err(_) => Err(io::Error::new(
			ErrorKind::TimedOut,
			format!("no answer within {} ms", limit.as_millis()),
		)),
	}
}

fn is_not_ready(err: &io::Error) -> bool {
	matches!(
		err.kind(),
		ErrorKind::NotFound
			| ErrorKind::ConnectionRefused
			| ErrorKind::ConnectionReset
			| ErrorKind::ConnectionAborted
			| ErrorKind::TimedOut
			| ErrorKind::AddrNotAvailable
			| ErrorKind::WouldBlock
	)
}
