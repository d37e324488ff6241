use std::ptr;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::entry::CleanupEntry;
use crate::node::{CleanupDelegate, OwnerKey, VisualNode};

/// Live dependents of one entry, split by how they are cleaned up.
#[derive(Default)]
pub(super) struct Partition {
	/// Nodes detached directly by the removal executor.
	pub plain: SmallVec<[Rc<dyn VisualNode>; 8]>,
	/// Keys of dependents that are owners themselves.
	pub nested: SmallVec<[OwnerKey; 4]>,
}

/// Splits `entry`'s live dependents into plain nodes and nested owners.
///
/// Dead handles are skipped and later nodes sharing a tag with an earlier one
/// are dropped. A dependent that is the entry's own delegate stays plain so
/// the cascade never recurses into the owner it is cleaning up.
pub(super) fn partition(entry: &CleanupEntry, owner: Option<&Rc<dyn CleanupDelegate>>) -> Partition {
	let mut seen = FxHashSet::default();
	let mut out = Partition::default();

	for node in entry.live_dependents() {
		if !seen.insert(node.tag()) {
			continue;
		}
		match node.clone().as_delegate() {
			Some(nested) if !owner.is_some_and(|owner| same_allocation(owner, &nested)) => {
				out.nested.push(nested.cleanup_key());
			}
			_ => out.plain.push(node),
		}
	}

	out
}

fn same_allocation(a: &Rc<dyn CleanupDelegate>, b: &Rc<dyn CleanupDelegate>) -> bool {
	ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
