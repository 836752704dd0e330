use treesync::resolver::change_root;
use treesync::{Backend, Result, Session};

use super::view_kind;
use crate::cli::RootArgs;

pub async fn run(args: RootArgs) -> Result<String> {
	let session = Session::connect(&args.address, args.poll.connect_policy()).await?;
	let kind = view_kind(&session, args.tree.wait, args.poll.ready_policy()).await?;
	let backend = Backend::for_view(&kind, &session, args.tree.neo_tree_options())?;

	let outcome = change_root(&backend, &args.new_root).await?;
	Ok(outcome.to_string())
}
