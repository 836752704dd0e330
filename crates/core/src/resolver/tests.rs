use super::*;
use crate::testing::{Call, MockTree};

fn p(path: &str) -> PathBuf {
	PathBuf::from(path)
}

fn request(target: &str, current_root: &str, fallback_root: &str) -> RootResolutionRequest {
	RootResolutionRequest::new(target, current_root, fallback_root)
}

fn change_root_calls(calls: &[Call]) -> usize {
	calls.iter().filter(|call| matches!(call, Call::ChangeRoot(_))).count()
}

#[tokio::test]
async fn target_under_current_root_keeps_root_and_opens_target() {
	let tree = MockTree::rooted_at("/home/u/proj");
	let resolver = RootResolver::default();

	let outcome = resolver
		.resolve(&tree, &request("/home/u/proj/src/lib", "/home/u/proj", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::Unchanged(p("/home/u/proj")));
	assert_eq!(
		tree.calls(),
		vec![
			Call::FindAndSelect(p("/home/u/proj/src/lib")),
			Call::NodeUnderCursor,
			Call::SetExpanded(p("/home/u/proj/src/lib"), true),
			Call::CenterViewport,
		]
	);
	assert!(tree.is_expanded("/home/u/proj/src/lib"));
}

#[tokio::test]
async fn target_under_fallback_restores_fallback_before_revealing() {
	let tree = MockTree::rooted_at("/home/u/other");
	let resolver = RootResolver::default();

	let outcome = resolver
		.resolve(&tree, &request("/home/u/proj/src", "/home/u/other", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::RevertedToFallback(p("/home/u/proj")));
	let calls = tree.calls();
	assert_eq!(change_root_calls(&calls), 1);
	assert_eq!(calls[0], Call::ChangeRoot(p("/home/u/proj")));
	assert_eq!(calls[1], Call::FindAndSelect(p("/home/u/proj/src")));
	assert_eq!(calls.last(), Some(&Call::CenterViewport));
	assert_eq!(tree.root(), p("/home/u/proj"));
}

#[tokio::test]
async fn target_outside_both_roots_becomes_root() {
	let tree = MockTree::rooted_at("/a");
	let resolver = RootResolver::default();

	let outcome = resolver.resolve(&tree, &request("/c/d", "/a", "/b"), NodeAction::Open).await.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::ChangedTo(p("/c/d")));
	assert_eq!(tree.calls(), vec![Call::ChangeRoot(p("/c/d"))]);
}

#[tokio::test]
async fn current_root_wins_when_both_contain_target() {
	let tree = MockTree::rooted_at("/home/u");
	let resolver = RootResolver::default();

	let outcome = resolver
		.resolve(&tree, &request("/home/u/proj/src", "/home/u", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::Unchanged(p("/home/u")));
	assert_eq!(change_root_calls(&tree.calls()), 0);
}

#[tokio::test]
async fn containment_is_component_wise() {
	let tree = MockTree::rooted_at("/a/b");
	let resolver = RootResolver::default();

	let outcome = resolver.resolve(&tree, &request("/a/bc", "/a/b", "/x"), NodeAction::Open).await.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::ChangedTo(p("/a/bc")));
}

#[tokio::test]
async fn target_equal_to_root_is_selected_but_not_toggled() {
	let tree = MockTree::rooted_at("/home/u/proj");
	let resolver = RootResolver::default();

	let outcome = resolver
		.resolve(&tree, &request("/home/u/proj/", "/home/u/proj", "/home/u"), NodeAction::Open)
		.await
		.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::Unchanged(p("/home/u/proj")));
	assert_eq!(
		tree.calls(),
		vec![Call::FindAndSelect(p("/home/u/proj")), Call::CenterViewport]
	);
}

#[tokio::test]
async fn close_collapses_the_child() {
	let tree = MockTree::rooted_at("/home/u/proj").with_expanded("/home/u/proj/src");
	let resolver = RootResolver::default();

	let outcome = resolver
		.resolve(&tree, &request("/home/u/proj/src", "/home/u/proj", "/home/u/proj"), NodeAction::Close)
		.await
		.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::Unchanged(p("/home/u/proj")));
	assert!(tree.calls().contains(&Call::SetExpanded(p("/home/u/proj/src"), false)));
	assert!(!tree.is_expanded("/home/u/proj/src"));
}

#[tokio::test]
async fn hidden_target_is_found_after_revealing_hidden_entries() {
	let tree = MockTree::rooted_at("/home/u/proj").with_cursor("/home/u/proj");
	let resolver = RootResolver::default();

	resolver
		.resolve(&tree, &request("/home/u/proj/.config", "/home/u/proj", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert!(tree.hidden_visible());
	assert_eq!(
		tree.calls(),
		vec![
			Call::FindAndSelect(p("/home/u/proj/.config")),
			Call::NodeUnderCursor,
			Call::RevealHidden,
			Call::FindAndSelect(p("/home/u/proj/.config")),
			Call::NodeUnderCursor,
			Call::SetExpanded(p("/home/u/proj/.config"), true),
			Call::CenterViewport,
		]
	);
}

#[tokio::test]
async fn unmatched_node_is_left_untouched() {
	let tree = MockTree::rooted_at("/home/u/proj")
		.with_cursor("/home/u/proj/docs")
		.with_missing("/home/u/proj/gone");
	let resolver = RootResolver::default();

	let outcome = resolver
		.resolve(&tree, &request("/home/u/proj/gone", "/home/u/proj", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::Unchanged(p("/home/u/proj")));
	let calls = tree.calls();
	assert!(!calls.iter().any(|call| matches!(call, Call::SetExpanded(..))));
	assert_eq!(calls.iter().filter(|call| **call == Call::RevealHidden).count(), 1);
	assert!(!tree.is_expanded("/home/u/proj/docs"));
}

#[tokio::test]
async fn no_retry_when_hidden_entries_already_visible() {
	let tree = MockTree::rooted_at("/home/u/proj")
		.with_hidden_visible()
		.with_missing("/home/u/proj/gone");
	let resolver = RootResolver::new(ResolveOptions {
		hidden_retries: 3,
		..ResolveOptions::default()
	});

	resolver
		.resolve(&tree, &request("/home/u/proj/gone", "/home/u/proj", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	let finds = tree
		.calls()
		.iter()
		.filter(|call| matches!(call, Call::FindAndSelect(_)))
		.count();
	assert_eq!(finds, 1);
}

#[tokio::test]
async fn zero_hidden_retries_never_reveals() {
	let tree = MockTree::rooted_at("/home/u/proj");
	let resolver = RootResolver::new(ResolveOptions {
		hidden_retries: 0,
		..ResolveOptions::default()
	});

	resolver
		.resolve(&tree, &request("/home/u/proj/.git", "/home/u/proj", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert!(!tree.calls().contains(&Call::RevealHidden));
	assert!(!tree.hidden_visible());
}

#[tokio::test]
async fn file_target_is_selected_without_toggling() {
	let tree = MockTree::rooted_at("/home/u/proj")
		.with_file("/home/u/proj/README.md");
	let resolver = RootResolver::default();

	resolver
		.resolve(&tree, &request("/home/u/proj/README.md", "/home/u/proj", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert!(!tree.is_expanded("/home/u/proj/README.md"));
}

#[tokio::test]
async fn collapse_before_open_runs_ahead_of_navigation() {
	let tree = MockTree::rooted_at("/home/u/proj").with_expanded("/home/u/proj/docs");
	let resolver = RootResolver::new(ResolveOptions {
		collapse_before_open: true,
		..ResolveOptions::default()
	});

	resolver
		.resolve(&tree, &request("/home/u/proj/src", "/home/u/proj", "/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();

	assert_eq!(tree.calls()[0], Call::CollapseAll);
	assert!(!tree.is_expanded("/home/u/proj/docs"));
	assert!(tree.is_expanded("/home/u/proj/src"));
}

#[tokio::test]
async fn collapse_is_skipped_on_close() {
	let tree = MockTree::rooted_at("/home/u/proj").with_expanded("/home/u/proj/docs");
	let resolver = RootResolver::new(ResolveOptions {
		collapse_before_open: true,
		..ResolveOptions::default()
	});

	resolver
		.resolve(&tree, &request("/home/u/proj/src", "/home/u/proj", "/home/u/proj"), NodeAction::Close)
		.await
		.unwrap();

	assert!(!tree.calls().contains(&Call::CollapseAll));
	assert!(tree.is_expanded("/home/u/proj/docs"));
}

#[tokio::test]
async fn sync_reads_current_root_every_time() {
	let tree = MockTree::rooted_at("/home/u/other");
	let resolver = RootResolver::default();

	let first = resolver
		.sync(&tree, Path::new("/home/u/proj/src"), Path::new("/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();
	assert_eq!(first, RootResolutionOutcome::RevertedToFallback(p("/home/u/proj")));
	assert_eq!(tree.calls()[0], Call::CurrentRoot);

	tree.clear_calls();
	let second = resolver
		.sync(&tree, Path::new("/home/u/proj/src"), Path::new("/home/u/proj"), NodeAction::Open)
		.await
		.unwrap();
	assert_eq!(second, RootResolutionOutcome::Unchanged(p("/home/u/proj")));
	assert_eq!(tree.calls()[0], Call::CurrentRoot);
	assert_eq!(change_root_calls(&tree.calls()), 0);
}

#[tokio::test]
async fn repeated_resolution_is_idempotent() {
	let tree = MockTree::rooted_at("/home/u/proj");
	let resolver = RootResolver::default();
	let req = request("/home/u/proj/src/lib", "/home/u/proj", "/home/u");

	let first = resolver.resolve(&tree, &req, NodeAction::Open).await.unwrap();
	let second = resolver.resolve(&tree, &req, NodeAction::Open).await.unwrap();

	assert_eq!(first, second);
	assert_eq!(tree.root(), p("/home/u/proj"));
	assert!(tree.is_expanded("/home/u/proj/src/lib"));
}

#[test]
fn request_paths_are_normalized() {
	let req = request("/home/u/proj/./src/../src/", "/home/u/proj/", "/home/u/proj/x/..");
	assert_eq!(req.target, p("/home/u/proj/src"));
	assert_eq!(req.current_root, p("/home/u/proj"));
	assert_eq!(req.fallback_root, p("/home/u/proj"));
}

#[tokio::test]
async fn direct_root_change_is_unconditional() {
	let tree = MockTree::rooted_at("/home/u/proj");

	let outcome = change_root(&tree, Path::new("/home/u/proj/src/")).await.unwrap();

	assert_eq!(outcome, RootResolutionOutcome::ChangedTo(p("/home/u/proj/src")));
	assert_eq!(outcome.to_string(), "/home/u/proj/src");
	assert_eq!(tree.calls(), vec![Call::ChangeRoot(p("/home/u/proj/src"))]);
}
