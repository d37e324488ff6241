use std::rc::Rc;

use crate::error::RemovalError;
use crate::node::{CleanupDelegate, VisualNode};

/// Handle to the host session that owns the presentation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BridgeHandle(pub u64);

/// Resolves the host bridge a delegate belongs to.
///
/// The registry calls this while registering until one call succeeds, then
/// caches the handle for its whole lifetime.
pub trait BridgeResolver {
	fn resolve(&self, delegate: &dyn CleanupDelegate) -> Option<BridgeHandle>;
}

impl<F> BridgeResolver for F
where
	F: Fn(&dyn CleanupDelegate) -> Option<BridgeHandle>,
{
	fn resolve(&self, delegate: &dyn CleanupDelegate) -> Option<BridgeHandle> {
		self(delegate)
	}
}

/// Resolver for hosts with a single session.
#[derive(Debug, Clone, Copy)]
pub struct FixedResolver(pub BridgeHandle);

impl BridgeResolver for FixedResolver {
	fn resolve(&self, _delegate: &dyn CleanupDelegate) -> Option<BridgeHandle> {
		Some(self.0)
	}
}

/// Tries type-specific strategies in insertion order, then a global fallback.
pub struct ResolverChain {
	strategies: Vec<Box<dyn BridgeResolver>>,
	fallback: Box<dyn BridgeResolver>,
}

impl ResolverChain {
	/// Creates a chain that only consults `fallback`.
	pub fn new(fallback: impl BridgeResolver + 'static) -> Self {
		Self {
			strategies: Vec::new(),
			fallback: Box::new(fallback),
		}
	}

	/// Adds a strategy consulted before the fallback.
	#[must_use]
	pub fn with_strategy(mut self, strategy: impl BridgeResolver + 'static) -> Self {
		self.strategies.push(Box::new(strategy));
		self
	}

	/// Adds a strategy that only applies to delegates of concrete type `D`.
	///
	/// Delegates must expose themselves through [`CleanupDelegate::as_any`]
	/// for the downcast to succeed.
	#[must_use]
	pub fn with_typed<D: 'static>(self, strategy: impl Fn(&D) -> Option<BridgeHandle> + 'static) -> Self {
		self.with_strategy(move |delegate: &dyn CleanupDelegate| -> Option<BridgeHandle> {
			let typed = delegate.as_any()?.downcast_ref::<D>()?;
			strategy(typed)
		})
	}
}

impl BridgeResolver for ResolverChain {
	fn resolve(&self, delegate: &dyn CleanupDelegate) -> Option<BridgeHandle> {
		self.strategies
			.iter()
			.find_map(|strategy| strategy.resolve(delegate))
			.or_else(|| self.fallback.resolve(delegate))
	}
}

/// Host primitive that detaches visual nodes from the presentation tree.
pub trait RemovalExecutor {
	/// Detaches every node of `nodes` under `bridge`.
	///
	/// The batch is all-or-nothing from the registry's point of view: any
	/// error leaves the owner registered so the caller can retry.
	fn remove_nodes(&mut self, bridge: BridgeHandle, nodes: &[Rc<dyn VisualNode>]) -> Result<(), RemovalError>;
}

#[cfg(test)]
mod tests {
	use std::any::Any;

	use super::*;
	use crate::entry::CleanupEntry;
	use crate::node::{CleanupSender, OwnerKey};
	use crate::registry::CleanupRegistry;

	struct Screen(u64);
	struct Widget(u64);

	impl CleanupDelegate for Screen {
		fn cleanup_key(&self) -> OwnerKey {
			OwnerKey(self.0)
		}

		fn on_cleanup_request(&self, _: CleanupSender, _: &CleanupEntry) -> bool {
			true
		}

		fn on_cleanup_complete(&self, _: &CleanupRegistry) {}

		fn as_any(&self) -> Option<&dyn Any> {
			Some(self)
		}
	}

	impl CleanupDelegate for Widget {
		fn cleanup_key(&self) -> OwnerKey {
			OwnerKey(self.0)
		}

		fn on_cleanup_request(&self, _: CleanupSender, _: &CleanupEntry) -> bool {
			true
		}

		fn on_cleanup_complete(&self, _: &CleanupRegistry) {}
	}

	#[test]
	fn typed_strategy_wins_over_fallback() {
		let chain = ResolverChain::new(FixedResolver(BridgeHandle(0))).with_typed(|screen: &Screen| Some(BridgeHandle(100 + screen.0)));
		assert_eq!(chain.resolve(&Screen(7)), Some(BridgeHandle(107)));
	}

	#[test]
	fn delegates_without_any_fall_through() {
		let chain = ResolverChain::new(FixedResolver(BridgeHandle(9))).with_typed(|_: &Widget| Some(BridgeHandle(1)));
		assert_eq!(chain.resolve(&Widget(3)), Some(BridgeHandle(9)));
	}

	#[test]
	fn strategies_are_tried_in_order() {
		let chain = ResolverChain::new(|_: &dyn CleanupDelegate| None::<BridgeHandle>)
			.with_strategy(|d: &dyn CleanupDelegate| (d.cleanup_key().0 % 2 == 0).then_some(BridgeHandle(2)))
			.with_strategy(|_: &dyn CleanupDelegate| Some(BridgeHandle(3)));
		assert_eq!(chain.resolve(&Widget(4)), Some(BridgeHandle(2)));
		assert_eq!(chain.resolve(&Widget(5)), Some(BridgeHandle(3)));
	}

	#[test]
	fn empty_chain_resolves_nothing() {
		let chain = ResolverChain::new(|_: &dyn CleanupDelegate| None::<BridgeHandle>);
		assert_eq!(chain.resolve(&Screen(1)), None);
	}
}
