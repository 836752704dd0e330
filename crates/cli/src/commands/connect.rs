use tracing::info;
use treesync::{Result, Session, await_ready};

use crate::cli::ConnectArgs;

/// Waits for the editor and its tree view; prints the filetype.
pub async fn run(args: ConnectArgs) -> Result<String> {
	let session = Session::connect(&args.address, args.poll.connect_policy()).await?;
	let kind = await_ready(&session, args.poll.ready_policy()).await?;
	info!(address = session.address(), %kind, "tree view ready");
	Ok(kind.to_string())
}
