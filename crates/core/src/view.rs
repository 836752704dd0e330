//! Which tree plugin, if any, owns the current buffer.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::session::Session;

/// Tree view kind, derived from `&filetype` on every probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
	NvimTree,
	NeoTree,
	Unsupported(String),
}

impl ViewKind {
	pub const NVIM_TREE_FILETYPE: &'static str = "NvimTree";
	pub const NEO_TREE_FILETYPE: &'static str = "neo-tree";

	pub fn from_filetype(filetype: &str) -> Self {
		match filetype {
			Self::NVIM_TREE_FILETYPE => Self::NvimTree,
			Self::NEO_TREE_FILETYPE => Self::NeoTree,
			other => Self::Unsupported(other.to_string()),
		}
	}

	pub fn filetype(&self) -> &str {
		match self {
			Self::NvimTree => Self::NVIM_TREE_FILETYPE,
			Self::NeoTree => Self::NEO_TREE_FILETYPE,
			Self::Unsupported(filetype) => filetype,
		}
	}
}

impl fmt::Display for ViewKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.filetype())
	}
}

/// Something that can report the current buffer's filetype.
#[async_trait]
pub trait ViewProbe: Send + Sync {
	async fn filetype(&self) -> Result<String>;

	async fn view_kind(&self) -> Result<ViewKind> {
		Ok(ViewKind::from_filetype(&self.filetype().await?))
	}
}

#[async_trait]
impl ViewProbe for Session {
	async fn filetype(&self) -> Result<String> {
		Session::filetype(self).await
	}
}
