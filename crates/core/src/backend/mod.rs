//! Uniform capability set over the supported tree plugins.
//!
//! Each adapter drives its plugin through Lua chunks sent with
//! `nvim_exec_lua`. Adapters hold no state of their own: every query goes to
//! the editor, so nothing observed by one call is reused by the next.

mod neo_tree;
mod nvim_tree;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

pub use neo_tree::{NeoTree, NeoTreeOptions};
pub use nvim_tree::NvimTree;

use crate::error::{Error, ErrorKind, Result};
use crate::path::normalize;
use crate::session::Session;
use crate::view::ViewKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Directory,
	File,
	Link,
	#[serde(other)]
	Other,
}

/// Snapshot of one tree entry, valid only for the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeNode {
	pub path: PathBuf,
	pub kind: NodeKind,
	#[serde(default)]
	pub expanded: bool,
}

impl TreeNode {
	pub fn is_directory(&self) -> bool {
		self.kind == NodeKind::Directory
	}

	/// Lexical equality with `path`.
	pub fn matches(&self, path: &Path) -> bool {
		normalize(&self.path) == normalize(path)
	}
}

#[async_trait]
pub trait TreeBackend: Send + Sync {
	fn name(&self) -> &'static str;

	/// Reveals `path`, expanding ancestors, and moves the cursor onto it.
	/// Best effort: a path that cannot be shown leaves the cursor elsewhere.
	async fn find_and_select(&self, path: &Path) -> Result<()>;

	async fn current_root(&self) -> Result<PathBuf>;

	async fn change_root(&self, path: &Path) -> Result<()>;

	async fn node_under_cursor(&self) -> Result<Option<TreeNode>>;

	/// Opens or closes `node`. No-op for non-directories and for a node
	/// already in the requested state.
	async fn set_expanded(&self, node: &TreeNode, expanded: bool) -> Result<()>;

	/// Runs `normal! zz` when the cursor sits in the lower half of the window.
	/// Editor-side failures are logged and reported as `false`.
	async fn center_viewport_if_needed(&self) -> Result<bool>;

	/// Makes dot-prefixed entries visible. Returns `true` if visibility changed.
	async fn reveal_hidden(&self) -> Result<bool>;

	async fn collapse_all(&self) -> Result<()>;
}

/// Runtime-selected adapter for the detected [`ViewKind`].
pub enum Backend<'s> {
	NvimTree(NvimTree<'s>),
	NeoTree(NeoTree<'s>),
}

impl<'s> Backend<'s> {
	pub fn for_view(kind: &ViewKind, session: &'s Session, options: NeoTreeOptions) -> Result<Self> {
		match kind {
			ViewKind::NvimTree => Ok(Self::NvimTree(NvimTree::new(session))),
			ViewKind::NeoTree => Ok(Self::NeoTree(NeoTree::new(session, options))),
			ViewKind::Unsupported(filetype) => Err(Error::UnsupportedBackend {
				filetype: filetype.clone(),
			}),
		}
	}

	fn inner(&self) -> &dyn TreeBackend {
		match self {
			Self::NvimTree(backend) => backend,
			Self::NeoTree(backend) => backend,
		}
	}
}

#[async_trait]
impl TreeBackend for Backend<'_> {
	fn name(&self) -> &'static str {
		self.inner().name()
	}

	async fn find_and_select(&self, path: &Path) -> Result<()> {
		self.inner().find_and_select(path).await
	}

	async fn current_root(&self) -> Result<PathBuf> {
		self.inner().current_root().await
	}

	async fn change_root(&self, path: &Path) -> Result<()> {
		self.inner().change_root(path).await
	}

	async fn node_under_cursor(&self) -> Result<Option<TreeNode>> {
		self.inner().node_under_cursor().await
	}

	async fn set_expanded(&self, node: &TreeNode, expanded: bool) -> Result<()> {
		self.inner().set_expanded(node, expanded).await
	}

	async fn center_viewport_if_needed(&self) -> Result<bool> {
		self.inner().center_viewport_if_needed().await
	}

	async fn reveal_hidden(&self) -> Result<bool> {
		self.inner().reveal_hidden().await
	}

	async fn collapse_all(&self) -> Result<()> {
		self.inner().collapse_all().await
	}
}

const CENTER_VIEWPORT: &str = r#"
if vim.fn.winline() / vim.fn.winheight(0) > 0.5 then
	vim.cmd('normal! zz')
	return true
end
return false
"#;

/// Shared by both adapters; the check is about the window, not the plugin.
pub(crate) async fn center_viewport(session: &Session) -> Result<bool> {
	match session.exec_lua::<bool>(CENTER_VIEWPORT, Vec::new()).await {
		Ok(centered) => Ok(centered),
		Err(err) if err.kind() == ErrorKind::Editor => {
			warn!(error = %err, "could not recenter tree window");
			Ok(false)
		}
		Err(err) => Err(err),
	}
}

pub(crate) fn path_arg(path: &Path) -> serde_json::Value {
	serde_json::Value::from(path.to_string_lossy().into_owned())
}
