//! Waiting for a supported tree view to become the current buffer.
//!
//! The editor may still be loading its plugins when the session opens, so
//! the current buffer's filetype is polled until it names one of the
//! supported tree plugins. Transport failures while polling are fatal.

use tracing::debug;
use treesync_runtime::PollPolicy;

use crate::error::{Error, Result};
use crate::view::{ViewKind, ViewProbe};

/// Probes once. Fails with [`Error::UnsupportedBackend`] if the current
/// buffer is not a tree view.
pub async fn detect<P: ViewProbe + ?Sized>(probe: &P) -> Result<ViewKind> {
	match probe.view_kind().await? {
		ViewKind::Unsupported(filetype) => Err(Error::UnsupportedBackend { filetype }),
		kind => Ok(kind),
	}
}

/// Probes up to `policy.attempts` times, sleeping `policy.interval` between
/// probes, until the view kind is supported.
pub async fn await_ready<P: ViewProbe + ?Sized>(probe: &P, policy: PollPolicy) -> Result<ViewKind> {
	let mut last_filetype = String::new();

	for attempt in 1..=policy.attempts {
		match probe.view_kind().await? {
			ViewKind::Unsupported(filetype) => {
				debug!(attempt, %filetype, "tree view not ready");
				last_filetype = filetype;
			}
			kind => {
				debug!(attempt, %kind, "tree view ready");
				return Ok(kind);
			}
		}

		if attempt < policy.attempts {
			tokio::time::sleep(policy.interval).await;
		}
	}

	debug!(attempts = policy.attempts, %last_filetype, "gave up waiting for tree view");
	Err(Error::ReadinessTimeout {
		attempts: policy.attempts,
		last_filetype,
	})
}
