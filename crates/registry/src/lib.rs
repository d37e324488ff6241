//! Cascading cleanup registry.
//!
//! Tracks, per owner, the visual nodes that must be detached from the host
//! presentation tree when the owner goes away. Cleanup is cooperative: the
//! owner is asked before anything is removed, dependents that are owners
//! themselves are cleaned up recursively, and nested owners whose cleanup
//! failed are restored so a later request can retry them.
//!
//! The registry never owns the resources it tracks. Delegates and nodes are
//! held through [`WeakHandle`]s, and everything host-specific (which session a
//! delegate lives in, how a view is detached) is supplied through the
//! [`BridgeResolver`] and [`RemovalExecutor`] seams.
//!
//! # Threading
//!
//! The registry is built on `Rc`/`Weak` and is therefore `!Send`. It belongs
//! to the host's UI thread.

/// Host bridge handles, bridge resolution and the removal seam.
pub mod bridge;
/// Registry configuration.
pub mod config;
/// Owner entries.
pub mod entry;
/// Error types.
pub mod error;
/// Non-owning handles.
pub mod handle;
/// Identity types and capability traits.
pub mod node;
/// The cleanup registry and its cascade algorithm.
pub mod registry;

pub use bridge::{BridgeHandle, BridgeResolver, FixedResolver, RemovalExecutor, ResolverChain};
pub use config::{RegisterDefaults, RegistryConfig, TraceFlags};
pub use entry::CleanupEntry;
pub use error::{CleanupError, ConfigError, RemovalError};
pub use handle::{WeakHandle, weak_delegate, weak_node};
pub use node::{CleanupDelegate, CleanupSender, HostViewId, NodeTag, OwnerKey, VisualNode};
pub use registry::{CleanupOutcome, CleanupRegistry, CleanupReport, RegisterOptions};
