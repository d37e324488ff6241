use cascade_registry::{BridgeHandle, HostViewId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::HostError;

/// The host's imperative view detachment primitive.
pub trait HostTree {
	/// Detaches `view` from its parent under `session`.
	///
	/// Returns how many views were released, the view itself included.
	fn detach(&mut self, session: BridgeHandle, view: HostViewId) -> Result<usize, HostError>;
}

struct ViewSlot {
	session: BridgeHandle,
	parent: Option<HostViewId>,
	children: SmallVec<[HostViewId; 4]>,
}

/// Headless presentation tree: one root view per session, views nested
/// below it.
///
/// View IDs come from a monotonic counter and are never reused, so a stale
/// ID always reads as unknown.
pub struct ViewTree {
	sessions: FxHashMap<BridgeHandle, HostViewId>,
	views: FxHashMap<HostViewId, ViewSlot>,
	next_view_id: u64,
}

impl Default for ViewTree {
	fn default() -> Self {
		Self::new()
	}
}

impl ViewTree {
	pub fn new() -> Self {
		Self {
			sessions: FxHashMap::default(),
			views: FxHashMap::default(),
			next_view_id: 1,
		}
	}

	/// Opens `session` and returns its root view. Reopening returns the
	/// existing root.
	pub fn open_session(&mut self, session: BridgeHandle) -> HostViewId {
		if let Some(root) = self.sessions.get(&session) {
			return *root;
		}
		let root = self.alloc(session, None);
		self.sessions.insert(session, root);
		root
	}

	/// Closes `session`, releasing every view in it. Returns the number of
	/// released views.
	pub fn close_session(&mut self, session: BridgeHandle) -> usize {
		match self.sessions.remove(&session) {
			Some(root) => self.release_subtree(root),
			None => 0,
		}
	}

	/// Creates a view under `parent` in `session`.
	pub fn insert(&mut self, session: BridgeHandle, parent: HostViewId) -> Result<HostViewId, HostError> {
		if !self.sessions.contains_key(&session) {
			return Err(HostError::UnknownSession(session));
		}
		let slot = self.views.get(&parent).ok_or(HostError::UnknownView(parent))?;
		if slot.session != session {
			return Err(HostError::ForeignView { view: parent, session });
		}

		let view = self.alloc(session, Some(parent));
		if let Some(slot) = self.views.get_mut(&parent) {
			slot.children.push(view);
		}
		Ok(view)
	}

	pub fn root(&self, session: BridgeHandle) -> Option<HostViewId> {
		self.sessions.get(&session).copied()
	}

	pub fn contains(&self, view: HostViewId) -> bool {
		self.views.contains_key(&view)
	}

	pub fn parent(&self, view: HostViewId) -> Option<HostViewId> {
		self.views.get(&view).and_then(|slot| slot.parent)
	}

	/// Children of `view` in insertion order; empty for unknown views.
	pub fn children(&self, view: HostViewId) -> &[HostViewId] {
		self.views.get(&view).map(|slot| slot.children.as_slice()).unwrap_or_default()
	}

	/// Number of live views across all sessions, roots included.
	pub fn len(&self) -> usize {
		self.views.len()
	}

	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}

	fn alloc(&mut self, session: BridgeHandle, parent: Option<HostViewId>) -> HostViewId {
		let view = HostViewId(self.next_view_id);
		self.next_view_id += 1;
		self.views.insert(
			view,
			ViewSlot {
				session,
				parent,
				children: SmallVec::new(),
			},
		);
		view
	}

	fn release_subtree(&mut self, view: HostViewId) -> usize {
		let mut stack = vec![view];
		let mut released = 0;
		while let Some(id) = stack.pop() {
			if let Some(slot) = self.views.remove(&id) {
				released += 1;
				stack.extend(slot.children);
			}
		}
		released
	}
}

impl HostTree for ViewTree {
	fn detach(&mut self, session: BridgeHandle, view: HostViewId) -> Result<usize, HostError> {
		if !self.sessions.contains_key(&session) {
			return Err(HostError::UnknownSession(session));
		}
		let slot = self.views.get(&view).ok_or(HostError::UnknownView(view))?;
		if slot.session != session {
			return Err(HostError::ForeignView { view, session });
		}
		let Some(parent) = slot.parent else {
			return Err(HostError::RootView(view));
		};

		if let Some(parent) = self.views.get_mut(&parent) {
			parent.children.retain(|child| *child != view);
		}
		let released = self.release_subtree(view);
		tracing::trace!(?session, ?view, released, "detached host view");
		Ok(released)
	}
}
