use std::time::Duration;

/// Bounded retry schedule: at most `attempts` tries, `interval` apart.
///
/// Shared by the connector and the readiness waiter, each with its own
/// counter. No sleep follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
	pub attempts: u32,
	pub interval: Duration,
}

impl PollPolicy {
	pub const DEFAULT_ATTEMPTS: u32 = 1000;
	pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

	pub const fn new(attempts: u32, interval: Duration) -> Self {
		Self { attempts, interval }
	}

	/// A single try with no waiting.
	pub const fn once() -> Self {
		Self::new(1, Duration::ZERO)
	}
}

impl Default for PollPolicy {
	fn default() -> Self {
		Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_INTERVAL)
	}
}
