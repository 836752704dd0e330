//! Root resolution: which directory becomes the tree's visible root.
//!
//! Given a target directory, the tree's current root and a fallback root,
//! exactly one of three outcomes applies, checked in order:
//!
//! 1. target under the current root: keep the root, reveal the target
//! 2. target under the fallback root only: restore the fallback, then reveal
//! 3. neither: make the target itself the root
//!
//! Containment is lexical, component-wise and boundary-inclusive (see
//! [`crate::path::is_within`]).

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::backend::{TreeBackend, TreeNode};
use crate::error::Result;
use crate::path::{is_within, normalize};

/// What to do with the target node once it is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
	/// Entering a directory: expand it.
	Open,
	/// Leaving a directory: collapse it.
	Close,
}

impl NodeAction {
	pub fn expanded(self) -> bool {
		matches!(self, Self::Open)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
	/// How many times to reveal hidden entries and re-navigate when the
	/// target is not under the cursor after the first navigation.
	pub hidden_retries: u32,
	/// Collapse every directory before revealing the target on [`NodeAction::Open`].
	pub collapse_before_open: bool,
}

impl ResolveOptions {
	pub const DEFAULT_HIDDEN_RETRIES: u32 = 1;
}

impl Default for ResolveOptions {
	fn default() -> Self {
		Self {
			hidden_retries: Self::DEFAULT_HIDDEN_RETRIES,
			collapse_before_open: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootResolutionRequest {
	pub target: PathBuf,
	pub current_root: PathBuf,
	pub fallback_root: PathBuf,
}

impl RootResolutionRequest {
	/// Builds a request with all three paths lexically normalized.
	pub fn new(target: impl AsRef<Path>, current_root: impl AsRef<Path>, fallback_root: impl AsRef<Path>) -> Self {
		Self {
			target: normalize(target.as_ref()),
			current_root: normalize(current_root.as_ref()),
			fallback_root: normalize(fallback_root.as_ref()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootResolutionOutcome {
	Unchanged(PathBuf),
	RevertedToFallback(PathBuf),
	ChangedTo(PathBuf),
}

impl RootResolutionOutcome {
	/// The tree's root after resolution.
	pub fn root(&self) -> &Path {
		match self {
			Self::Unchanged(root) | Self::RevertedToFallback(root) | Self::ChangedTo(root) => root,
		}
	}
}

impl fmt::Display for RootResolutionOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.root().display())
	}
}

#[derive(Debug, Clone, Default)]
pub struct RootResolver {
	options: ResolveOptions,
}

impl RootResolver {
	pub fn new(options: ResolveOptions) -> Self {
		Self { options }
	}

	/// Reads the current root from `backend` and resolves against it.
	pub async fn sync<B: TreeBackend + ?Sized>(
		&self,
		backend: &B,
		target: &Path,
		fallback_root: &Path,
		action: NodeAction,
	) -> Result<RootResolutionOutcome> {
		let current_root = backend.current_root().await?;
		let request = RootResolutionRequest::new(target, current_root, fallback_root);
		self.resolve(backend, &request, action).await
	}

	pub async fn resolve<B: TreeBackend + ?Sized>(
		&self,
		backend: &B,
		request: &RootResolutionRequest,
		action: NodeAction,
	) -> Result<RootResolutionOutcome> {
		let RootResolutionRequest {
			target,
			current_root,
			fallback_root,
		} = request;
		debug!(
			backend = backend.name(),
			target = %target.display(),
			current_root = %current_root.display(),
			fallback_root = %fallback_root.display(),
			?action,
			"resolving root"
		);

		let outcome = if is_within(target, current_root) {
			self.reveal(backend, target, current_root, action).await?;
			RootResolutionOutcome::Unchanged(current_root.clone())
		} else if is_within(target, fallback_root) {
			backend.change_root(fallback_root).await?;
			self.reveal(backend, target, fallback_root, action).await?;
			RootResolutionOutcome::RevertedToFallback(fallback_root.clone())
		} else {
			backend.change_root(target).await?;
			RootResolutionOutcome::ChangedTo(target.clone())
		};

		if !matches!(outcome, RootResolutionOutcome::ChangedTo(_)) {
			backend.center_viewport_if_needed().await?;
		}

		info!(outcome = ?outcome, "root resolved");
		Ok(outcome)
	}

	async fn reveal<B: TreeBackend + ?Sized>(
		&self,
		backend: &B,
		target: &Path,
		root: &Path,
		action: NodeAction,
	) -> Result<()> {
		if action == NodeAction::Open && self.options.collapse_before_open {
			backend.collapse_all().await?;
		}

		// The root itself is shown as the tree header; toggling it would walk up.
		if target == root {
			backend.find_and_select(target).await?;
			return Ok(());
		}

		match self.locate(backend, target).await? {
			Some(node) => backend.set_expanded(&node, action.expanded()).await,
			None => {
				warn!(
					target = %target.display(),
					root = %root.display(),
					"target not found in tree, leaving node under cursor untouched"
				);
				Ok(())
			}
		}
	}

	/// Navigates to `target`, revealing hidden entries if the first attempt
	/// leaves the cursor elsewhere. Returns the node only if it matches.
	async fn locate<B: TreeBackend + ?Sized>(&self, backend: &B, target: &Path) -> Result<Option<TreeNode>> {
		backend.find_and_select(target).await?;
		let mut node = backend.node_under_cursor().await?;

		let mut retries = 0;
		while !is_match(node.as_ref(), target) && retries < self.options.hidden_retries {
			retries += 1;
			if !backend.reveal_hidden().await? {
				debug!(target = %target.display(), "hidden entries already visible");
				break;
			}
			debug!(target = %target.display(), retry = retries, "re-navigating with hidden entries shown");
			backend.find_and_select(target).await?;
			node = backend.node_under_cursor().await?;
		}

		Ok(node.filter(|node| node.matches(target)))
	}
}

fn is_match(node: Option<&TreeNode>, target: &Path) -> bool {
	node.is_some_and(|node| node.matches(target))
}

/// Sets the root to `path` unconditionally.
pub async fn change_root<B: TreeBackend + ?Sized>(backend: &B, path: &Path) -> Result<RootResolutionOutcome> {
	let path = normalize(path);
	backend.change_root(&path).await?;
	info!(root = %path.display(), "root changed");
	Ok(RootResolutionOutcome::ChangedTo(path))
}
