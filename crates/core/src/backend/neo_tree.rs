//! neo-tree adapter, driven through the `filesystem` source state.
//!
//! neo-tree renders asynchronously: `navigate` and the `focus` command return
//! before the tree reflects the change. Both are awaited inside the editor
//! with `vim.wait`, bounded by [`NeoTreeOptions::navigate_timeout`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{TreeBackend, TreeNode, center_viewport, path_arg};
use crate::error::Result;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeoTreeOptions {
	pub navigate_timeout: Duration,
}

impl NeoTreeOptions {
	pub const DEFAULT_NAVIGATE_TIMEOUT: Duration = Duration::from_millis(2000);
}

impl Default for NeoTreeOptions {
	fn default() -> Self {
		Self {
			navigate_timeout: Self::DEFAULT_NAVIGATE_TIMEOUT,
		}
	}
}

const FIND_AND_SELECT: &str = r#"
local path, timeout = ...
local manager = require('neo-tree.sources.manager')
local filesystem = require('neo-tree.sources.filesystem')
local state = manager.get_state('filesystem')
local done = false
filesystem.navigate(state, state.path, path, function()
	done = true
end)
local ok = vim.wait(timeout, function()
	return done
end, 10)
return ok
"#;

const CURRENT_ROOT: &str = "return require('neo-tree.sources.manager').get_state('filesystem').path";

const CHANGE_ROOT: &str = r#"
local dir, timeout = ...
local manager = require('neo-tree.sources.manager')
require('neo-tree.command').execute({ action = 'focus', position = 'current', dir = dir })
local ok = vim.wait(timeout, function()
	return manager.get_state('filesystem').path == dir
end, 10)
return ok
"#;

const NODE_UNDER_CURSOR: &str = r#"
local state = require('neo-tree.sources.manager').get_state('filesystem')
if state.tree == nil then
	return nil
end
local node = state.tree:get_node()
if node == nil or node.path == nil then
	return nil
end
return {
	path = node.path,
	kind = node.type,
	expanded = node.type == 'directory' and node:is_expanded() or false,
}
"#;

// `commands.open` toggles a directory node.
const SET_EXPANDED: &str = r#"
local path, expanded = ...
local state = require('neo-tree.sources.manager').get_state('filesystem')
local node = state.tree and state.tree:get_node()
if node == nil or node.type ~= 'directory' or node.path ~= path then
	return false
end
if node:is_expanded() == expanded then
	return false
end
require('neo-tree.sources.filesystem.commands').open(state)
return true
"#;

const REVEAL_HIDDEN: &str = r#"
local state = require('neo-tree.sources.manager').get_state('filesystem')
if state.filtered_items ~= nil and state.filtered_items.visible then
	return false
end
require('neo-tree.sources.filesystem.commands').toggle_hidden(state)
return true
"#;

const COLLAPSE_ALL: &str = r#"
local state = require('neo-tree.sources.manager').get_state('filesystem')
require('neo-tree.sources.filesystem.commands').close_all_nodes(state)
"#;

pub struct NeoTree<'s> {
	session: &'s Session,
	options: NeoTreeOptions,
}

impl<'s> NeoTree<'s> {
	pub fn new(session: &'s Session, options: NeoTreeOptions) -> Self {
		Self { session, options }
	}

	fn timeout_arg(&self) -> Value {
		let millis = u64::try_from(self.options.navigate_timeout.as_millis()).unwrap_or(u64::MAX);
		Value::from(millis)
	}
}

#[async_trait]
impl TreeBackend for NeoTree<'_> {
	fn name(&self) -> &'static str {
		"neo-tree"
	}

	async fn find_and_select(&self, path: &Path) -> Result<()> {
		let navigated: bool = self
			.session
			.exec_lua(FIND_AND_SELECT, vec![path_arg(path), self.timeout_arg()])
			.await?;
		if navigated {
			debug!(path = %path.display(), "neo-tree navigate finished");
		} else {
			warn!(path = %path.display(), timeout = ?self.options.navigate_timeout, "neo-tree navigate did not finish in time");
		}
		Ok(())
	}

	async fn current_root(&self) -> Result<PathBuf> {
		self.session.exec_lua(CURRENT_ROOT, Vec::new()).await
	}

	async fn change_root(&self, path: &Path) -> Result<()> {
		let settled: bool = self
			.session
			.exec_lua(CHANGE_ROOT, vec![path_arg(path), self.timeout_arg()])
			.await?;
		if !settled {
			warn!(path = %path.display(), "neo-tree root did not settle in time");
		}
		Ok(())
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
		debug!(path = %node.path.display(), expanded, toggled, "neo-tree set_expanded");
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
