//! Command implementations. Each returns the single line to print.

mod connect;
mod root;
mod sync;

use treesync::{NodeAction, PollPolicy, Result, Session, ViewKind, await_ready, detect};

use crate::cli::Commands;

pub async fn dispatch(command: Commands) -> Result<String> {
	match command {
		Commands::Connect(args) => connect::run(args).await,
		Commands::Enter(args) => sync::run(args, NodeAction::Open).await,
		Commands::Leave(args) => sync::run(args, NodeAction::Close).await,
		Commands::Root(args) => root::run(args).await,
	}
}

/// Determines the tree view, polling only when asked to.
async fn view_kind(session: &Session, wait: bool, policy: PollPolicy) -> Result<ViewKind> {
	if wait {
		await_ready(session, policy).await
	} else {
		detect(session).await
	}
}
