//! Tree-pane synchronization for Neovim file-tree sidebars.
//!
//! A short-lived client that keeps a sidebar tree view (nvim-tree or
//! neo-tree) inside a running Neovim aligned with a directory supplied from
//! outside, usually the working directory of a neighbouring tmux pane.
//!
//! One invocation runs this pipeline:
//!
//! ```text
//! Session::connect ──► readiness::await_ready ──► Backend::for_view ──► RootResolver::sync
//!   (retry open)         (poll &filetype)          (tagged dispatch)      (3-way root decision)
//! ```
//!
//! # Main Types
//!
//! - [`Session`] - msgpack-RPC session with one editor instance
//! - [`ViewKind`] - which tree plugin owns the current buffer
//! - [`TreeBackend`] - uniform capability set over both plugins
//! - [`RootResolver`] - decides between keeping, restoring, or replacing the root
//! - [`RootResolutionOutcome`] - the resulting root, printed by the CLI

pub mod backend;
pub mod error;
pub mod path;
pub mod readiness;
pub mod resolver;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{Backend, NeoTree, NeoTreeOptions, NodeKind, NvimTree, TreeBackend, TreeNode};
pub use error::{Error, ErrorKind, Result};
pub use readiness::{await_ready, detect};
pub use resolver::{NodeAction, ResolveOptions, RootResolutionOutcome, RootResolutionRequest, RootResolver};
pub use session::Session;
pub use treesync_runtime::{Address, PollPolicy};
pub use view::{ViewKind, ViewProbe};
