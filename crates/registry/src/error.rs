//! Error types for cleanup and configuration.

use crate::node::{NodeTag, OwnerKey};

/// Failure reported by a [`RemovalExecutor`](crate::RemovalExecutor).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemovalError {
	/// The host refused to detach one node of the batch.
	#[error("host rejected node {tag:?}: {reason}")]
	Rejected { tag: NodeTag, reason: String },

	/// The host could not process the batch at all.
	#[error("host removal failed: {0}")]
	Host(String),
}

/// The one checked failure of [`notify_cleanup`](crate::CleanupRegistry::notify_cleanup).
///
/// Only reported for the owner the caller asked about. Failures deeper in
/// the cascade are absorbed and the affected entries restored. Either way the
/// caller should treat it as "retry later".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleanupError {
	/// No host bridge has been resolved for this registry yet.
	#[error("no host bridge resolved while cleaning up {key}")]
	BridgeUnresolved { key: OwnerKey },

	/// The removal executor failed for the owner's own dependents.
	#[error("removing dependents of {key} failed: {source}")]
	Removal {
		key: OwnerKey,
		#[source]
		source: RemovalError,
	},
}

impl CleanupError {
	/// Owner whose cleanup failed.
	pub fn key(&self) -> OwnerKey {
		match self {
			Self::BridgeUnresolved { key } | Self::Removal { key, .. } => *key,
		}
	}
}

/// Errors raised while loading a [`RegistryConfig`](crate::RegistryConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// TOML syntax or schema error.
	#[error("invalid registry config: {0}")]
	Toml(#[from] toml::de::Error),
}
