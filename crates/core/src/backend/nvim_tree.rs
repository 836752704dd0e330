//! nvim-tree adapter, driven through `require('nvim-tree.api')`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{TreeBackend, TreeNode, center_viewport, path_arg};
use crate::error::Result;
use crate::session::Session;

// Newer releases take an options table; older ones only a path.
const FIND_AND_SELECT: &str = r#"
local path = ...
local api = require('nvim-tree.api')
local ok = pcall(api.tree.find_file, { buf = path, open = true, focus = true })
if not ok then
	api.tree.find_file(path)
end
"#;

const CURRENT_ROOT: &str = "return require('nvim-tree.api').tree.get_nodes().absolute_path";

const CHANGE_ROOT: &str = "require('nvim-tree.api').tree.change_root(...)";

const NODE_UNDER_CURSOR: &str = r#"
local node = require('nvim-tree.api').tree.get_node_under_cursor()
if node == nil or node.absolute_path == nil then
	return nil
end
return {
	path = node.absolute_path,
	kind = node.type,
	expanded = node.open == true,
}
"#;

// `node.open.edit` toggles the directory under the cursor, so the node is
// re-read and compared before acting.
const SET_EXPANDED: &str = r#"
local path, expanded = ...
local api = require('nvim-tree.api')
local node = api.tree.get_node_under_cursor()
if node == nil or node.absolute_path ~= path or node.type ~= 'directory' then
	return false
end
if (node.open == true) == expanded then
	return false
end
api.node.open.edit()
return true
"#;

const REVEAL_HIDDEN: &str = r#"
local hiding = nil
local ok_core, core = pcall(require, 'nvim-tree.core')
local explorer = ok_core and core.get_explorer and core.get_explorer() or nil
if explorer ~= nil and explorer.filters ~= nil then
	local filters = explorer.filters
	if filters.state ~= nil then
		hiding = filters.state.dotfiles
	end
	if hiding == nil and filters.config ~= nil then
		hiding = filters.config.filter_dotfiles
	end
else
	local ok_filters, filters = pcall(require, 'nvim-tree.explorer.filters')
	if ok_filters and filters.config ~= nil then
		hiding = filters.config.filter_dotfiles
	end
end
if hiding ~= true then
	return false
end
require('nvim-tree.api').tree.toggle_hidden_filter()
return true
"#;

const COLLAPSE_ALL: &str = "require('nvim-tree.api').tree.collapse_all()";

pub struct NvimTree<'s> {
	session: &'s Session,
}

impl<'s> NvimTree<'s> {
	pub fn new(session: &'s Session) -> Self {
		Self { session }
	}
}

#[async_trait]
impl TreeBackend for NvimTree<'_> {
	fn name(&self) -> &'static str {
		"nvim-tree"
	}

	async fn find_and_select(&self, path: &Path) -> Result<()> {
		debug!(path = %path.display(), "nvim-tree find_file");
		self.session.exec_lua(FIND_AND_SELECT, vec![path_arg(path)]).await
	}

	async fn current_root(&self) -> Result<PathBuf> {
		self.session.exec_lua(CURRENT_ROOT, Vec::new()).await
	}

	async fn change_root(&self, path: &Path) -> Result<()> {
		debug!(path = %path.display(), "nvim-tree change_root");
		self.session.exec_lua(CHANGE_ROOT, vec![path_arg(path)]).await
	}

	async fn node_under_cursor(&self) -> Result<Option<TreeNode>> {
		self.session.exec_lua(NODE_UNDER_CURSOR, Vec::new()).await
	}

	async fn set_expanded(&self, node: &TreeNode, expanded: bool) -> Result<()> {
		if !node.is_directory() || node.expanded == expanded {
			return Ok(());
		}
		let toggled: bool = self
			.session
			.exec_lua(SET_EXPANDED, vec![path_arg(&node.path), Value::Bool(expanded)])
			.await?;
		debug!(path = %node.path.display(), expanded, toggled, "nvim-tree set_expanded");
		Ok(())
	}

	async fn center_viewport_if_needed(&self) -> Result<bool> {
		center_viewport(self.session).await
	}

	async fn reveal_hidden(&self) -> Result<bool> {
		self.session.exec_lua(REVEAL_HIDDEN, Vec::new()).await
	}

	async fn collapse_all(&self) -> Result<()> {
		self.session.exec_lua(COLLAPSE_ALL, Vec::new()).await
	}
}
