use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::entry::CleanupEntry;
use crate::registry::CleanupRegistry;

/// Stable identity of a cleanup owner.
///
/// Assigned by whoever constructs the delegate and unique among live
/// delegates. The registry uses it as its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey(pub u64);

impl fmt::Display for OwnerKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "owner#{}", self.0)
	}
}

/// Identity of a visual node, used to de-duplicate dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeTag(pub u64);

/// Host-side identifier of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostViewId(pub u64);

/// What triggered a cleanup request.
///
/// The registry never interprets the sender. It is handed to
/// [`CleanupDelegate::on_cleanup_request`] and forwarded unchanged to nested
/// owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupSender {
	/// The owner asked for its own cleanup.
	Owner,
	/// A parent owner is being cleaned up.
	Parent,
	/// The owner's screen or route was left.
	Navigation,
	/// The host session is shutting down.
	HostTeardown,
	/// The owner is being rebuilt in place.
	Reload,
	/// Host-defined trigger.
	Custom(u32),
}

/// A host-managed resource that can be detached from the presentation tree.
pub trait VisualNode {
	/// Tag used for de-duplication during cleanup.
	fn tag(&self) -> NodeTag;

	/// Host view backing this node, if it has been realized.
	fn host_id(&self) -> Option<HostViewId> {
		None
	}

	/// Capability query: returns this node as a cleanup owner if it is one.
	fn as_delegate(self: Rc<Self>) -> Option<Rc<dyn CleanupDelegate>> {
		None
	}
}

/// An owner whose dependents are tracked by the registry.
pub trait CleanupDelegate {
	/// Registry key of this owner. Must stay stable for the owner's lifetime.
	fn cleanup_key(&self) -> OwnerKey;

	/// Asks the owner whether its dependents may be detached now.
	///
	/// The answer is authoritative. Returning `false` leaves the entry
	/// registered and untouched.
	fn on_cleanup_request(&self, sender: CleanupSender, entry: &CleanupEntry) -> bool;

	/// Called after the owner's plain dependents were removed and before its
	/// entry is evicted, so `registry` still contains the owner's entry.
	fn on_cleanup_complete(&self, registry: &CleanupRegistry);

	/// Capability query: returns this owner as a visual node if it is one.
	fn as_visual_node(self: Rc<Self>) -> Option<Rc<dyn VisualNode>> {
		None
	}

	/// Type-erased access for type-specific bridge strategies.
	fn as_any(&self) -> Option<&dyn Any> {
		None
	}
}
