use std::cell::RefCell;
use std::rc::Rc;

use cascade_registry::{BridgeHandle, RemovalError, RemovalExecutor, VisualNode};

use crate::error::HostError;
use crate::tree::HostTree;

/// [`RemovalExecutor`] that detaches nodes through a [`HostTree`].
///
/// The tree is shared with the host so it can keep building views while the
/// registry owns the remover. Nodes without a host view are skipped, as are
/// views the host no longer knows (already detached, possibly as part of an
/// ancestor's subtree), which keeps retries of a partially applied batch
/// from failing on work that already happened.
pub struct HostRemover<H> {
	host: Rc<RefCell<H>>,
}

impl<H> HostRemover<H> {
	pub fn new(host: Rc<RefCell<H>>) -> Self {
		Self { host }
	}

	pub fn host(&self) -> &Rc<RefCell<H>> {
		&self.host
	}
}

impl<H: HostTree> RemovalExecutor for HostRemover<H> {
	fn remove_nodes(&mut self, bridge: BridgeHandle, nodes: &[Rc<dyn VisualNode>]) -> Result<(), RemovalError> {
		let mut host = self
			.host
			.try_borrow_mut()
			.map_err(|_| RemovalError::Host("host tree is already borrowed".into()))?;

		for node in nodes {
			let Some(view) = node.host_id() else {
				tracing::trace!(tag = ?node.tag(), "node has no host view");
				continue;
			};
			match host.detach(bridge, view) {
				Ok(_) => {}
				Err(HostError::UnknownView(_)) => {
					tracing::debug!(tag = ?node.tag(), ?view, "host view unknown, treating as detached");
				}
				Err(error) => {
					return Err(RemovalError::Rejected {
						tag: node.tag(),
						reason: error.to_string(),
					});
				}
			}
		}
		Ok(())
	}
}
