use tracing::info;
use treesync::{Backend, NodeAction, Result, RootResolver, Session};

use super::view_kind;
use crate::cli::SyncArgs;

/// `enter` and `leave`: resolve the root for the target and open or close it.
pub async fn run(args: SyncArgs, action: NodeAction) -> Result<String> {
	let session = Session::connect(&args.address, args.poll.connect_policy()).await?;
	let kind = view_kind(&session, args.tree.wait, args.poll.ready_policy()).await?;
	let backend = Backend::for_view(&kind, &session, args.tree.neo_tree_options())?;

	let resolver = RootResolver::new(args.resolve_options(action));
	let outcome = resolver.sync(&backend, &args.target, &args.fallback_root, action).await?;

	info!(%kind, ?action, ?outcome, "tree synchronized");
	Ok(outcome.to_string())
}
