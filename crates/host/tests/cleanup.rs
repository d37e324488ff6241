use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cascade_host::{HostRemover, ViewTree};
use cascade_registry::{
	BridgeHandle, CleanupDelegate, CleanupEntry, CleanupError, CleanupRegistry, CleanupSender, FixedResolver, HostViewId,
	NodeTag, OwnerKey, RegisterOptions, RemovalError, ResolverChain, VisualNode, weak_node,
};
use pretty_assertions::assert_eq;

const MAIN: BridgeHandle = BridgeHandle(1);
const POPUP: BridgeHandle = BridgeHandle(2);

struct Label {
	tag: NodeTag,
	view: HostViewId,
}

impl VisualNode for Label {
	fn tag(&self) -> NodeTag {
		self.tag
	}

	fn host_id(&self) -> Option<HostViewId> {
		Some(self.view)
	}
}

/// A screen owns a host view and the labels placed inside it.
struct Screen {
	key: OwnerKey,
	view: HostViewId,
	session: BridgeHandle,
	completed: Cell<bool>,
}

impl CleanupDelegate for Screen {
	fn cleanup_key(&self) -> OwnerKey {
		self.key
	}

	fn on_cleanup_request(&self, _: CleanupSender, _: &CleanupEntry) -> bool {
		true
	}

	fn on_cleanup_complete(&self, _: &CleanupRegistry) {
		self.completed.set(true);
	}

	fn as_visual_node(self: Rc<Self>) -> Option<Rc<dyn VisualNode>> {
		Some(self)
	}

	fn as_any(&self) -> Option<&dyn Any> {
		Some(self)
	}
}

impl VisualNode for Screen {
	fn tag(&self) -> NodeTag {
		NodeTag(self.view.0)
	}

	fn host_id(&self) -> Option<HostViewId> {
		Some(self.view)
	}

	fn as_delegate(self: Rc<Self>) -> Option<Rc<dyn CleanupDelegate>> {
		Some(self)
	}
}

struct Harness {
	tree: Rc<RefCell<ViewTree>>,
	registry: CleanupRegistry,
}

impl Harness {
	fn new() -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();
		let tree = Rc::new(RefCell::new(ViewTree::new()));
		tree.borrow_mut().open_session(MAIN);
		tree.borrow_mut().open_session(POPUP);
		let resolver = ResolverChain::new(FixedResolver(MAIN)).with_typed(|screen: &Screen| Some(screen.session));
		let registry = CleanupRegistry::new(resolver, HostRemover::new(tree.clone()));
		Self { tree, registry }
	}

	fn screen(&self, key: u64, session: BridgeHandle, parent: Option<HostViewId>) -> Rc<Screen> {
		let mut tree = self.tree.borrow_mut();
		let parent = parent.or_else(|| tree.root(session)).unwrap();
		let view = tree.insert(session, parent).unwrap();
		Rc::new(Screen {
			key: OwnerKey(key),
			view,
			session,
			completed: Cell::new(false),
		})
	}

	fn label(&self, session: BridgeHandle, parent: HostViewId) -> Rc<Label> {
		let view = self.tree.borrow_mut().insert(session, parent).unwrap();
		Rc::new(Label { tag: NodeTag(view.0), view })
	}

	fn alive(&self, view: HostViewId) -> bool {
		self.tree.borrow().contains(view)
	}
}

#[test]
fn cascade_detaches_views_across_owners() {
	let mut h = Harness::new();
	let root = h.tree.borrow().root(MAIN).unwrap();
	let outer = h.screen(1, MAIN, None);
	let title = h.label(MAIN, outer.view);
	let inner = h.screen(2, MAIN, Some(root));
	let body = h.label(MAIN, inner.view);

	h.registry.register(&outer, vec![weak_node(&title), weak_node(&inner)]);
	h.registry.register(&inner, vec![weak_node(&body)]);
	assert_eq!(h.registry.bridge(), Some(MAIN));

	let outcome = h.registry.notify_cleanup(OwnerKey(1), CleanupSender::Navigation).unwrap();

	assert_eq!(outcome.report().unwrap().cascaded, vec![OwnerKey(2)]);
	for view in [outer.view, title.view, inner.view, body.view] {
		assert!(!h.alive(view), "{view:?} should be detached");
	}
	assert!(outer.completed.get());
	assert!(inner.completed.get());
	assert!(h.registry.is_empty());
	assert_eq!(h.tree.borrow().children(root), &[] as &[HostViewId]);
}

#[test]
fn views_inside_detached_subtrees_are_not_errors() {
	let mut h = Harness::new();
	let screen = h.screen(1, MAIN, None);
	let label = h.label(MAIN, screen.view);

	// Detaching the screen first releases the label's view with it.
	h.registry.register_with(
		&screen,
		RegisterOptions::new()
			.dependents(vec![weak_node(&screen), weak_node(&label)])
			.include_self(false),
	);

	let outcome = h.registry.notify_cleanup(OwnerKey(1), CleanupSender::Owner).unwrap();
	assert_eq!(outcome.report().unwrap().removed, 2);
	assert!(!h.alive(screen.view));
	assert!(!h.alive(label.view));
}

#[test]
fn unknown_host_views_are_skipped() {
	let mut h = Harness::new();
	let screen = h.screen(1, MAIN, None);
	let ghost = Rc::new(Label {
		tag: NodeTag(999),
		view: HostViewId(999),
	});
	let len_before = h.tree.borrow().len();

	h.registry.register(&screen, vec![weak_node(&ghost)]);
	let outcome = h.registry.notify_cleanup(OwnerKey(1), CleanupSender::Owner).unwrap();

	assert_eq!(outcome.report().unwrap().removed, 2);
	assert!(!h.alive(screen.view));
	assert_eq!(h.tree.borrow().len(), len_before - 1);
	assert!(screen.completed.get());
}

#[test]
fn foreign_nested_owner_is_restored() {
	let mut h = Harness::new();
	let outer = h.screen(1, MAIN, None);
	let popup = h.screen(2, POPUP, None);
	let stray = h.label(POPUP, popup.view);

	h.registry.register(&outer, vec![weak_node(&popup)]);
	h.registry.register_with(&popup, RegisterOptions::new().dependents(vec![weak_node(&stray)]));
	let popup_entry = h.registry.get_entry(OwnerKey(2)).cloned().unwrap();

	let outcome = h.registry.notify_cleanup(OwnerKey(1), CleanupSender::Owner).unwrap();

	assert_eq!(outcome.report().unwrap().restored, vec![OwnerKey(2)]);
	assert!(!h.alive(outer.view));
	assert!(h.alive(popup.view));
	assert!(h.alive(stray.view));
	assert!(!popup.completed.get());
	assert_eq!(h.registry.get_entry(OwnerKey(2)), Some(&popup_entry));
}

#[test]
fn top_level_host_rejection_surfaces() {
	let mut h = Harness::new();
	let outer = h.screen(1, MAIN, None);
	let foreign = {
		let root = h.tree.borrow().root(POPUP).unwrap();
		h.label(POPUP, root)
	};

	h.registry.register(&outer, vec![weak_node(&foreign)]);
	let before = h.registry.get_entry(OwnerKey(1)).cloned().unwrap();

	let err = h.registry.notify_cleanup(OwnerKey(1), CleanupSender::Owner).unwrap_err();
	match &err {
		CleanupError::Removal {
			key,
			source: RemovalError::Rejected { tag, .. },
		} => {
			assert_eq!(*key, OwnerKey(1));
			assert_eq!(*tag, foreign.tag);
		}
		other => panic!("unexpected error: {other}"),
	}
	assert_eq!(h.registry.get_entry(OwnerKey(1)), Some(&before));
	assert!(h.alive(outer.view));
	assert!(!outer.completed.get());
}
