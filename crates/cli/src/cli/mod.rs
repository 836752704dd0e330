
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use treesync::path::normalize;
use treesync::{NeoTreeOptions, NodeAction, PollPolicy, ResolveOptions};

use crate::styles::cli_styles;

/// Multi-command entry point.
#[derive(Parser, Debug)]
#[command(name = "treesync")]
#[command(about = "Keep a Neovim file-tree pane rooted at a directory of interest")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Wait for the editor and its tree view, then print the tree filetype.
	Connect(ConnectArgs),
	/// Reveal and expand a directory, restoring or replacing the root as needed.
	Enter(SyncArgs),
	/// Reveal and collapse a directory, restoring or replacing the root as needed.
	Leave(SyncArgs),
	/// Set the tree root unconditionally.
	Root(RootArgs),
}

/// `treesync-connect`
#[derive(Parser, Debug)]
#[command(name = "treesync-connect")]
#[command(about = "Wait for the editor and its tree view, then print the tree filetype")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct ConnectCli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(flatten)]
	pub args: ConnectArgs,
}

/// `treesync-enter`
#[derive(Parser, Debug)]
#[command(name = "treesync-enter")]
#[command(about = "Reveal and expand a directory in the tree pane")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct EnterCli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(flatten)]
	pub args: SyncArgs,
}

/// `treesync-leave`
#[derive(Parser, Debug)]
#[command(name = "treesync-leave")]
#[command(about = "Reveal and collapse a directory in the tree pane")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct LeaveCli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(flatten)]
	pub args: SyncArgs,
}

/// `treesync-root`
#[derive(Parser, Debug)]
#[command(name = "treesync-root")]
#[command(about = "Set the tree root unconditionally")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct RootCli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(flatten)]
	pub args: RootArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
	/// Editor address: socket path, host:port, or \\.\pipe\name
	#[arg(value_name = "SESSION_ADDRESS")]
	pub address: String,

	#[command(flatten)]
	pub poll: PollArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
	/// Editor address: socket path, host:port, or \\.\pipe\name
	#[arg(value_name = "SESSION_ADDRESS")]
	pub address: String,

	/// Directory to reveal (entered) or collapse (left)
	#[arg(value_name = "TARGET_DIR", value_parser = absolute_path)]
	pub target: PathBuf,

	/// Root to restore when the tree was re-rooted elsewhere
	#[arg(value_name = "FALLBACK_ROOT", value_parser = absolute_path)]
	pub fallback_root: PathBuf,

	#[command(flatten)]
	pub poll: PollArgs,

	#[command(flatten)]
	pub tree: TreeArgs,

	/// Times to reveal hidden entries and retry when the target is not found
	#[arg(long, value_name = "N", env = "TREESYNC_HIDDEN_RETRIES", default_value_t = ResolveOptions::DEFAULT_HIDDEN_RETRIES)]
	pub hidden_retries: u32,

	/// Collapse the whole tree before revealing an entered directory
	#[arg(long, env = "TREESYNC_COLLAPSE", value_parser = clap::builder::FalseyValueParser::new())]
	pub collapse: bool,
}

impl SyncArgs {
	pub fn resolve_options(&self, action: NodeAction) -> ResolveOptions {
		ResolveOptions {
			hidden_retries: self.hidden_retries,
			collapse_before_open: self.collapse && action == NodeAction::Open,
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct RootArgs {
	/// Editor address: socket path, host:port, or \\.\pipe\name
	#[arg(value_name = "SESSION_ADDRESS")]
	pub address: String,

	/// Directory to make the tree root
	#[arg(value_name = "NEW_ROOT", value_parser = absolute_path)]
	pub new_root: PathBuf,

	#[command(flatten)]
	pub poll: PollArgs,

	#[command(flatten)]
	pub tree: TreeArgs,
}

/// Bounds for waiting on the editor socket and on the tree view.
#[derive(Args, Debug, Clone)]
pub struct PollArgs {
	/// Connection attempts before giving up
	#[arg(long, value_name = "N", env = "TREESYNC_CONNECT_ATTEMPTS", default_value_t = PollPolicy::DEFAULT_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
	pub connect_attempts: u32,

	/// Delay between connection attempts
	#[arg(long, value_name = "MS", env = "TREESYNC_CONNECT_INTERVAL_MS", default_value_t = default_interval_ms())]
	pub connect_interval_ms: u64,

	/// Filetype probes before giving up on the tree view
	#[arg(long, value_name = "N", env = "TREESYNC_READY_ATTEMPTS", default_value_t = PollPolicy::DEFAULT_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
	pub ready_attempts: u32,

	/// Delay between filetype probes
	#[arg(long, value_name = "MS", env = "TREESYNC_READY_INTERVAL_MS", default_value_t = default_interval_ms())]
	pub ready_interval_ms: u64,
}

impl PollArgs {
	pub fn connect_policy(&self) -> PollPolicy {
		PollPolicy::new(self.connect_attempts, Duration::from_millis(self.connect_interval_ms))
	}

	pub fn ready_policy(&self) -> PollPolicy {
		PollPolicy::new(self.ready_attempts, Duration::from_millis(self.ready_interval_ms))
	}
}

/// Options shared by commands that drive the tree.
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
	/// Poll for the tree view instead of probing once
	#[arg(long)]
	pub wait: bool,

	/// How long neo-tree may take to finish navigating
	#[arg(long, value_name = "MS", env = "TREESYNC_NAVIGATE_TIMEOUT_MS", default_value_t = default_navigate_timeout_ms())]
	pub navigate_timeout_ms: u64,
}

impl TreeArgs {
	pub fn neo_tree_options(&self) -> NeoTreeOptions {
		NeoTreeOptions {
			navigate_timeout: Duration::from_millis(self.navigate_timeout_ms),
		}
	}
}

fn default_interval_ms() -> u64 {
	duration_ms(PollPolicy::DEFAULT_INTERVAL)
}

fn default_navigate_timeout_ms() -> u64 {
	duration_ms(NeoTreeOptions::DEFAULT_NAVIGATE_TIMEOUT)
}

fn duration_ms(duration: Duration) -> u64 {
	u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Accepts absolute paths only, normalized lexically.
fn absolute_path(raw: &str) -> Result<PathBuf, String> {
	let path = Path::new(raw);
	if path.is_absolute() {
		Ok(normalize(path))
	} else {
		Err(format!("'{raw}' is not an absolute path"))
	}
}
