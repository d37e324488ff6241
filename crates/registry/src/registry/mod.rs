use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::bridge::{BridgeHandle, BridgeResolver, RemovalExecutor};
use crate::config::RegistryConfig;
use crate::entry::CleanupEntry;
use crate::error::CleanupError;
use crate::handle::WeakHandle;
use crate::node::{CleanupDelegate, CleanupSender, OwnerKey, VisualNode};

mod partition;


use partition::partition;

/// Options for [`CleanupRegistry::register_with`].
///
/// Unset flags fall back to the registry's [`RegisterDefaults`](crate::RegisterDefaults).
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
	/// Dependents tracked in addition to the delegate's own node.
	pub dependents: Vec<WeakHandle<dyn VisualNode>>,
	/// Append the delegate's own node when it is also a visual node.
	pub include_self: Option<bool>,
	/// Proceed with cleanup when the delegate is gone.
	pub proceed_when_delegate_absent: Option<bool>,
}

impl RegisterOptions {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn dependents(mut self, dependents: Vec<WeakHandle<dyn VisualNode>>) -> Self {
		self.dependents = dependents;
		self
	}

	#[must_use]
	pub fn include_self(mut self, include_self: bool) -> Self {
		self.include_self = Some(include_self);
		self
	}

	#[must_use]
	pub fn proceed_when_delegate_absent(mut self, proceed: bool) -> Self {
		self.proceed_when_delegate_absent = Some(proceed);
		self
	}
}

/// Result of a successful [`CleanupRegistry::notify_cleanup`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
	/// No entry was registered under the key.
	NotRegistered,
	/// The delegate, or the absent-delegate policy, declined cleanup.
	Vetoed,
	/// The owner's dependents were removed and its entry evicted.
	Completed(CleanupReport),
}

impl CleanupOutcome {
	pub fn is_completed(&self) -> bool {
		matches!(self, Self::Completed(_))
	}

	pub fn report(&self) -> Option<&CleanupReport> {
		match self {
			Self::Completed(report) => Some(report),
			_ => None,
		}
	}
}

/// Summary of one completed cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
	/// Owner that was cleaned up.
	pub key: OwnerKey,
	/// Number of plain nodes handed to the removal executor.
	pub removed: usize,
	/// Nested owners whose cleanup call returned without error.
	pub cascaded: Vec<OwnerKey>,
	/// Nested owners whose cleanup failed and that are still registered.
	pub restored: Vec<OwnerKey>,
}

/// Directory of owners and the dependents detached when they go away.
///
/// One registry is constructed per host and passed to whatever triggers
/// cleanup. All operations run on the host's UI thread.
pub struct CleanupRegistry {
	entries: FxHashMap<OwnerKey, CleanupEntry>,
	bridge: Option<BridgeHandle>,
	resolver: Box<dyn BridgeResolver>,
	executor: Box<dyn RemovalExecutor>,
	config: RegistryConfig,
}

impl CleanupRegistry {
	/// Creates an empty registry with the default configuration.
	pub fn new(resolver: impl BridgeResolver + 'static, executor: impl RemovalExecutor + 'static) -> Self {
		Self::with_config(resolver, executor, RegistryConfig::default())
	}

	/// Creates an empty registry with an explicit configuration.
	pub fn with_config(
		resolver: impl BridgeResolver + 'static,
		executor: impl RemovalExecutor + 'static,
		config: RegistryConfig,
	) -> Self {
		Self {
			entries: FxHashMap::default(),
			bridge: None,
			resolver: Box::new(resolver),
			executor: Box::new(executor),
			config,
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Host bridge cached by the first successful resolution, if any.
	pub fn bridge(&self) -> Option<BridgeHandle> {
		self.bridge
	}

	/// Registers `delegate` with `dependents`, using the configured defaults
	/// for the remaining flags.
	pub fn register<D>(&mut self, delegate: &Rc<D>, dependents: Vec<WeakHandle<dyn VisualNode>>)
	where
		D: CleanupDelegate + 'static,
	{
		self.register_with(delegate, RegisterOptions::new().dependents(dependents));
	}

	/// Registers `delegate`, replacing any entry under the same key.
	///
	/// Registration never merges: the new entry holds exactly the dependents
	/// given here, plus the delegate's own node when `include_self` applies.
	pub fn register_with<D>(&mut self, delegate: &Rc<D>, options: RegisterOptions)
	where
		D: CleanupDelegate + 'static,
	{
		let delegate: Rc<dyn CleanupDelegate> = delegate.clone();
		let key = delegate.cleanup_key();
		self.ensure_bridge(&*delegate);

		let include_self = options.include_self.unwrap_or(self.config.defaults.include_self);
		let proceed = options
			.proceed_when_delegate_absent
			.unwrap_or(self.config.defaults.proceed_when_delegate_absent);

		let mut dependents = options.dependents;
		if include_self && let Some(node) = delegate.clone().as_visual_node() {
			dependents.push(WeakHandle::new(&node));
		}

		let entry = CleanupEntry::new(key, Some(WeakHandle::new(&delegate)), dependents, proceed);
		let dependents = entry.dependents().len();
		let replaced = self.entries.insert(key, entry).is_some();

		if self.config.trace.registry {
			tracing::trace!(%key, dependents, replaced, "registered cleanup owner");
		}
	}

	/// Withdraws `delegate`'s entry without notifying anyone.
	///
	/// Returns the removed entry, or `None` if the delegate was not registered.
	pub fn unregister(&mut self, delegate: &dyn CleanupDelegate) -> Option<CleanupEntry> {
		let key = delegate.cleanup_key();
		let removed = self.entries.remove(&key);
		if self.config.trace.registry {
			tracing::trace!(%key, removed = removed.is_some(), "unregistered cleanup owner");
		}
		removed
	}

	pub fn get_entry(&self, key: OwnerKey) -> Option<&CleanupEntry> {
		self.entries.get(&key)
	}

	pub fn contains(&self, key: OwnerKey) -> bool {
		self.entries.contains_key(&key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Registered keys in no particular order.
	pub fn keys(&self) -> impl Iterator<Item = OwnerKey> + '_ {
		self.entries.keys().copied()
	}

	/// Cleans up `key`'s dependents and cascades into nested owners.
	///
	/// Unknown keys and vetoed requests are successful no-ops. The only error
	/// is a removal failure for `key`'s own plain nodes, in which case the
	/// registry is left exactly as it was. Nested owners that fail are
	/// restored and reported in [`CleanupReport::restored`].
	pub fn notify_cleanup(&mut self, key: OwnerKey, sender: CleanupSender) -> Result<CleanupOutcome, CleanupError> {
		let Some(entry) = self.entries.get(&key) else {
			if self.config.trace.cleanup {
				tracing::trace!(%key, ?sender, "cleanup requested for unregistered owner");
			}
			return Ok(CleanupOutcome::NotRegistered);
		};

		let delegate = entry.delegate();
		let approved = match &delegate {
			Some(delegate) => delegate.on_cleanup_request(sender, entry),
			None => entry.proceed_when_delegate_absent(),
		};
		if !approved {
			if self.config.trace.cleanup {
				tracing::debug!(%key, ?sender, delegate_alive = delegate.is_some(), "cleanup vetoed");
			}
			return Ok(CleanupOutcome::Vetoed);
		}

		let split = partition(entry, delegate.as_ref());
		let worklist: Vec<CleanupEntry> = split
			.nested
			.iter()
			.filter_map(|nested| self.entries.get(nested).cloned())
			.collect();

		if self.config.trace.cleanup {
			tracing::debug!(
				%key,
				?sender,
				plain = split.plain.len(),
				nested = worklist.len(),
				"cleaning up owner"
			);
		}

		self.remove_plain(key, &split.plain)?;

		if let Some(delegate) = &delegate {
			delegate.on_cleanup_complete(self);
		}
		self.entries.remove(&key);

		let mut report = CleanupReport {
			key,
			removed: split.plain.len(),
			cascaded: Vec::new(),
			restored: Vec::new(),
		};
		drop(split);

		for nested in worklist {
			let nested_key = nested.key();
			match self.notify_cleanup(nested_key, sender) {
				Ok(_) => report.cascaded.push(nested_key),
				Err(error) => {
					tracing::warn!(parent = %key, nested = %nested_key, %error, "nested cleanup failed; restoring entry");
					// Later siblings must see the entry again.
					self.entries.entry(nested_key).or_insert(nested);
					report.restored.push(nested_key);
				}
			}
		}
		// A sibling may have cleaned up a restored owner after all.
		report.restored.retain(|restored| self.entries.contains_key(restored));

		if self.config.trace.cleanup {
			tracing::trace!(%key, cascaded = report.cascaded.len(), restored = report.restored.len(), "cleanup completed");
		}

		Ok(CleanupOutcome::Completed(report))
	}

	fn ensure_bridge(&mut self, delegate: &dyn CleanupDelegate) {
		if self.bridge.is_some() {
			return;
		}
		self.bridge = self.resolver.resolve(delegate);
		if self.config.trace.registry {
			tracing::trace!(key = %delegate.cleanup_key(), bridge = ?self.bridge, "resolved host bridge");
		}
	}

	fn remove_plain(&mut self, key: OwnerKey, plain: &[Rc<dyn VisualNode>]) -> Result<(), CleanupError> {
		let Some(bridge) = self.bridge else {
			return Err(CleanupError::BridgeUnresolved { key });
		};
		if plain.is_empty() {
			return Ok(());
		}
		self.executor
			.remove_nodes(bridge, plain)
			.map_err(|source| CleanupError::Removal { key, source })
	}
}
