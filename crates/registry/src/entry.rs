use std::fmt;
use std::rc::Rc;

use crate::handle::WeakHandle;
use crate::node::{CleanupDelegate, OwnerKey, VisualNode};

/// Registry record for one owner.
///
/// Entries are never edited in place. Registering the same key again builds
/// a fresh entry and replaces the old one.
#[derive(Clone)]
pub struct CleanupEntry {
	key: OwnerKey,
	delegate: Option<WeakHandle<dyn CleanupDelegate>>,
	dependents: Vec<WeakHandle<dyn VisualNode>>,
	proceed_when_delegate_absent: bool,
}

impl CleanupEntry {
	pub(crate) fn new(
		key: OwnerKey,
		delegate: Option<WeakHandle<dyn CleanupDelegate>>,
		dependents: Vec<WeakHandle<dyn VisualNode>>,
		proceed_when_delegate_absent: bool,
	) -> Self {
		Self {
			key,
			delegate,
			dependents,
			proceed_when_delegate_absent,
		}
	}

	pub fn key(&self) -> OwnerKey {
		self.key
	}

	/// Returns the owning delegate if it is still alive.
	pub fn delegate(&self) -> Option<Rc<dyn CleanupDelegate>> {
		self.delegate.as_ref().and_then(WeakHandle::get)
	}

	pub fn delegate_handle(&self) -> Option<&WeakHandle<dyn CleanupDelegate>> {
		self.delegate.as_ref()
	}

	/// Dependent handles in registration order, dead ones included.
	pub fn dependents(&self) -> &[WeakHandle<dyn VisualNode>] {
		&self.dependents
	}

	/// Dependents that are still alive, in registration order.
	pub fn live_dependents(&self) -> impl Iterator<Item = Rc<dyn VisualNode>> + '_ {
		self.dependents.iter().filter_map(WeakHandle::get)
	}

	/// Whether cleanup proceeds when the delegate is gone.
	pub fn proceed_when_delegate_absent(&self) -> bool {
		self.proceed_when_delegate_absent
	}
}

/// Structural identity: same key and policy, same delegate allocation, same
/// dependent allocations in the same order.
impl PartialEq for CleanupEntry {
	fn eq(&self, other: &Self) -> bool {
		let same_delegate = match (&self.delegate, &other.delegate) {
			(Some(a), Some(b)) => a.ptr_eq(b),
			(None, None) => true,
			_ => false,
		};
		self.key == other.key
			&& self.proceed_when_delegate_absent == other.proceed_when_delegate_absent
			&& same_delegate
			&& self.dependents.len() == other.dependents.len()
			&& self
				.dependents
				.iter()
				.zip(&other.dependents)
				.all(|(a, b)| a.ptr_eq(b))
	}
}

impl fmt::Debug for CleanupEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CleanupEntry")
			.field("key", &self.key)
			.field("delegate", &self.delegate)
			.field("dependents", &self.dependents)
			.field("proceed_when_delegate_absent", &self.proceed_when_delegate_absent)
			.finish()
	}
}
