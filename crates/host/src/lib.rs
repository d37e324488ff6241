//! Host side of the cleanup registry.
//!
//! [`HostRemover`] is the [`RemovalExecutor`](cascade_registry::RemovalExecutor)
//! a host plugs into a [`CleanupRegistry`](cascade_registry::CleanupRegistry):
//! it maps each node's [`HostViewId`](cascade_registry::HostViewId) onto the
//! host's [`HostTree::detach`] primitive under the resolved bridge.
//! [`ViewTree`] is a headless host tree usable in tests and embedders without
//! a real presentation layer.

/// Host error types.
pub mod error;
/// Removal executor backed by a host tree.
pub mod remover;
/// In-memory host view tree.
pub mod tree;

pub use error::HostError;
pub use remover::HostRemover;
pub use tree::{HostTree, ViewTree};
