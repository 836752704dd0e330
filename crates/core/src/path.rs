//! Lexical path handling for root containment.
//!
//! Paths arrive as absolute strings from the pane manager and from the tree
//! plugins. They are compared after lexical normalization only; the
//! filesystem is never consulted, so symlinks are compared as spelled.

use std::path::{Component, Path, PathBuf};

/// Removes `.` components, resolves `..` against preceding components and
/// drops trailing separators. `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
			Component::CurDir => {}
			Component::ParentDir => match out.components().next_back() {
				Some(Component::Normal(_)) => {
					out.pop();
				}
				Some(Component::RootDir | Component::Prefix(_)) => {}
				_ => out.push(".."),
			},
			Component::Normal(part) => out.push(part),
		}
	}

	if out.as_os_str().is_empty() {
		out.push(".");
	}
	out
}

/// Returns true if `path` is `root` or lies beneath it.
///
/// Comparison is component-wise, so `/a/bc` is not within `/a/b`.
pub fn is_within(path: &Path, root: &Path) -> bool {
	normalize(path).starts_with(normalize(root))
}
