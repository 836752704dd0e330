//! Test doubles for the editor and the tree plugins.
//!
//! - [`FakeEditor`]: scripted msgpack-RPC peer over an in-memory duplex
//! - [`MockTree`]: recording [`TreeBackend`] with a tiny directory model
//! - [`ScriptedProbe`]: [`ViewProbe`] returning a fixed filetype sequence

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
use tokio::task::JoinHandle;
use treesync_protocol::{FrameDecoder, Message, RemoteError, Response, encode};
use treesync_runtime::Connection;

use crate::backend::{NodeKind, TreeBackend, TreeNode};
use crate::error::{Error, Result};
use crate::path::{is_within, normalize};
use crate::session::Session;
use crate::view::ViewProbe;

/// Scripted editor answering every request through `handler`.
pub(crate) struct FakeEditor {
	session: Session,
	_peer: Option<JoinHandle<()>>,
}

impl FakeEditor {
	/// `handler` gets the method name and params; `Err` becomes an RPC error.
	pub fn start<F>(handler: F) -> Self
	where
		F: FnMut(&str, &[Value]) -> std::result::Result<Value, String> + Send + 'static,
	{
		Self::spawn(None, handler)
	}

	/// Answers the first request with `raw` bytes as-is, then defers to `handler`.
	pub fn with_raw_first_reply<F>(raw: Vec<u8>, handler: F) -> Self
	where
		F: FnMut(&str, &[Value]) -> std::result::Result<Value, String> + Send + 'static,
	{
		Self::spawn(Some(raw), handler)
	}

	fn spawn<F>(mut raw: Option<Vec<u8>>, mut handler: F) -> Self
	where
		F: FnMut(&str, &[Value]) -> std::result::Result<Value, String> + Send + 'static,
	{
		let (client, mut server) = duplex(64 * 1024);
		let peer = tokio::spawn(async move {
			let mut decoder = FrameDecoder::new();
			let mut chunk = [0u8; 4096];
			loop {
				while let Ok(Some(message)) = decoder.next_message() {
					let Message::Request(request) = message else {
						continue;
					};
					if let Some(bytes) = raw.take() {
						if server.write_all(&bytes).await.is_err() {
							return;
						}
						continue;
					}
					let (error, result) = match handler(&request.method, &request.params) {
						Ok(result) => (None, result),
						Err(message) => (Some(RemoteError::new(RemoteError::EXCEPTION, message)), Value::Null),
					};
					let response = Message::Response(Response {
						id: request.id,
						error,
						result,
					});
					let Ok(bytes) = encode(&response) else { return };
					if server.write_all(&bytes).await.is_err() {
						return;
					}
				}
				match server.read(&mut chunk).await {
					Ok(0) | Err(_) => return,
					Ok(n) => decoder.extend(&chunk[..n]),
				}
			}
		});

		Self {
			session: Session::from_connection(Connection::from_stream("fake-nvim", client)),
			_peer: Some(peer),
		}
	}

	/// An editor whose end of the stream is already closed.
	pub fn hung_up() -> Self {
		let (client, server) = duplex(1024);
		drop(server);
		Self {
			session: Session::from_connection(Connection::from_stream("fake-nvim", client)),
			_peer: None,
		}
	}

	pub fn session(&self) -> &Session {
		&self.session
	}
}

/// Every [`TreeBackend`] call made against a [`MockTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
	FindAndSelect(PathBuf),
	CurrentRoot,
	ChangeRoot(PathBuf),
	NodeUnderCursor,
	SetExpanded(PathBuf, bool),
	CenterViewport,
	RevealHidden,
	CollapseAll,
}

#[derive(Debug)]
struct TreeState {
	root: PathBuf,
	hidden_visible: bool,
	files: HashSet<PathBuf>,
	missing: HashSet<PathBuf>,
	expanded: HashSet<PathBuf>,
	cursor: Option<PathBuf>,
	calls: Vec<Call>,
}

impl TreeState {
	fn is_hidden(&self, path: &Path) -> bool {
		path.strip_prefix(&self.root)
			.map(|rel| rel.components().any(|c| c.as_os_str().to_string_lossy().starts_with('.')))
			.unwrap_or(false)
	}

	fn node(&self, path: &Path) -> TreeNode {
		TreeNode {
			path: path.to_path_buf(),
			kind: if self.files.contains(path) {
				NodeKind::File
			} else {
				NodeKind::Directory
			},
			expanded: self.expanded.contains(path),
		}
	}
}

/// In-memory tree: every path under the root exists as a directory unless
/// marked as a file or missing; dot-prefixed entries start hidden.
#[derive(Clone)]
pub(crate) struct MockTree {
	state: Arc<Mutex<TreeState>>,
}

impl MockTree {
	pub fn rooted_at(root: impl AsRef<Path>) -> Self {
		Self {
			state: Arc::new(Mutex::new(TreeState {
				root: normalize(root.as_ref()),
				hidden_visible: false,
				files: HashSet::new(),
				missing: HashSet::new(),
				expanded: HashSet::new(),
				cursor: None,
				calls: Vec::new(),
			})),
		}
	}

	pub fn with_file(self, path: impl AsRef<Path>) -> Self {
		self.lock().files.insert(path.as_ref().to_path_buf());
		self
	}

	pub fn with_missing(self, path: impl AsRef<Path>) -> Self {
		self.lock().missing.insert(path.as_ref().to_path_buf());
		self
	}

	pub fn with_expanded(self, path: impl AsRef<Path>) -> Self {
		self.lock().expanded.insert(path.as_ref().to_path_buf());
		self
	}

	pub fn with_hidden_visible(self) -> Self {
		self.lock().hidden_visible = true;
		self
	}

	/// Places the cursor on `path` without recording a call.
	pub fn with_cursor(self, path: impl AsRef<Path>) -> Self {
		self.lock().cursor = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn calls(&self) -> Vec<Call> {
		self.lock().calls.clone()
	}

	pub fn clear_calls(&self) {
		self.lock().calls.clear();
	}

	pub fn root(&self) -> PathBuf {
		self.lock().root.clone()
	}

	pub fn is_expanded(&self, path: impl AsRef<Path>) -> bool {
		self.lock().expanded.contains(path.as_ref())
	}

	pub fn hidden_visible(&self) -> bool {
		self.lock().hidden_visible
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, TreeState> {
		self.state.lock().unwrap()
	}
}

#[async_trait]
impl TreeBackend for MockTree {
	fn name(&self) -> &'static str {
		"mock"
	}

	async fn find_and_select(&self, path: &Path) -> Result<()> {
		let mut state = self.lock();
		state.calls.push(Call::FindAndSelect(path.to_path_buf()));
		let reachable = is_within(path, &state.root)
			&& !state.missing.contains(path)
			&& (state.hidden_visible || !state.is_hidden(path));
		if reachable {
			state.cursor = Some(path.to_path_buf());
		}
		Ok(())
	}

	async fn current_root(&self) -> Result<PathBuf> {
		let mut state = self.lock();
		state.calls.push(Call::CurrentRoot);
		Ok(state.root.clone())
	}

	async fn change_root(&self, path: &Path) -> Result<()> {
		let mut state = self.lock();
		state.calls.push(Call::ChangeRoot(path.to_path_buf()));
		state.root = path.to_path_buf();
		state.cursor = Some(path.to_path_buf());
		Ok(())
	}

	async fn node_under_cursor(&self) -> Result<Option<TreeNode>> {
		let mut state = self.lock();
		state.calls.push(Call::NodeUnderCursor);
		Ok(state.cursor.clone().map(|path| state.node(&path)))
	}

	async fn set_expanded(&self, node: &TreeNode, expanded: bool) -> Result<()> {
		let mut state = self.lock();
		state.calls.push(Call::SetExpanded(node.path.clone(), expanded));
		if !node.is_directory() {
			return Ok(());
		}
		if expanded {
			state.expanded.insert(node.path.clone());
		} else {
			state.expanded.remove(&node.path);
		}
		Ok(())
	}

	async fn center_viewport_if_needed(&self) -> Result<bool> {
		self.lock().calls.push(Call::CenterViewport);
		Ok(false)
	}

	async fn reveal_hidden(&self) -> Result<bool> {
		let mut state = self.lock();
		state.calls.push(Call::RevealHidden);
		let changed = !state.hidden_visible;
		state.hidden_visible = true;
		Ok(changed)
	}

	async fn collapse_all(&self) -> Result<()> {
		let mut state = self.lock();
		state.calls.push(Call::CollapseAll);
		state.expanded.clear();
		Ok(())
	}
}

/// Probe answering from a fixed script; the last entry repeats.
pub(crate) struct ScriptedProbe {
	script: Mutex<VecDeque<Option<String>>>,
	last: Mutex<Option<String>>,
	calls: Mutex<u32>,
}

impl ScriptedProbe {
	pub fn repeating(filetype: &str) -> Self {
		Self::sequence([filetype])
	}

	pub fn sequence<'a>(filetypes: impl IntoIterator<Item = &'a str>) -> Self {
		Self {
			script: Mutex::new(filetypes.into_iter().map(|ft| Some(ft.to_string())).collect()),
			last: Mutex::new(None),
			calls: Mutex::new(0),
		}
	}

	/// Answers `filetypes` in order, then fails as if the editor hung up.
	pub fn failing_after<'a>(filetypes: impl IntoIterator<Item = &'a str>) -> Self {
		let probe = Self::sequence(filetypes);
		probe.script.lock().unwrap().push_back(None);
		probe
	}

	pub fn calls(&self) -> u32 {
		*self.calls.lock().unwrap()
	}
}

#[async_trait]
impl ViewProbe for ScriptedProbe {
	async fn filetype(&self) -> Result<String> {
		*self.calls.lock().unwrap() += 1;
		let next = self.script.lock().unwrap().pop_front();
		let mut last = self.last.lock().unwrap();
		match next {
			Some(Some(filetype)) => {
				*last = Some(filetype.clone());
				Ok(filetype)
			}
			Some(None) => Err(Error::SessionLost(treesync_runtime::Error::ConnectionClosed)),
			None => last
				.clone()
				.ok_or(Error::SessionLost(treesync_runtime::Error::ConnectionClosed)),
		}
	}
}
