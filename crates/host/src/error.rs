use cascade_registry::{BridgeHandle, HostViewId};

/// Errors raised by a [`HostTree`](crate::HostTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
	/// No session is open for the bridge.
	#[error("no open session for bridge {0:?}")]
	UnknownSession(BridgeHandle),

	/// The view does not exist, or was already detached.
	#[error("unknown view {0:?}")]
	UnknownView(HostViewId),

	/// The view belongs to a different session than the one asked.
	#[error("view {view:?} does not belong to bridge {session:?}")]
	ForeignView { view: HostViewId, session: BridgeHandle },

	/// Session roots cannot be detached; close the session instead.
	#[error("view {0:?} is a session root")]
	RootView(HostViewId),
}
