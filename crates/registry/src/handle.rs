use std::fmt;
use std::ptr;
use std::rc::{Rc, Weak};

use crate::node::{CleanupDelegate, VisualNode};

/// Non-owning reference to a delegate or visual node.
///
/// The handle never keeps its target alive. Once the real owner drops the
/// last `Rc`, [`WeakHandle::get`] yields `None`; that is the normal state of
/// a torn-down resource, not an error.
pub struct WeakHandle<T: ?Sized> {
	inner: Weak<T>,
}

impl<T: ?Sized> WeakHandle<T> {
	/// Creates a handle observing `target`.
	pub fn new(target: &Rc<T>) -> Self {
		Self {
			inner: Rc::downgrade(target),
		}
	}

	/// Returns the target if it is still alive.
	pub fn get(&self) -> Option<Rc<T>> {
		self.inner.upgrade()
	}

	/// Returns true while the target is alive.
	pub fn is_alive(&self) -> bool {
		self.inner.strong_count() > 0
	}

	/// Returns true if both handles observe the same allocation.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		ptr::addr_eq(self.inner.as_ptr(), other.inner.as_ptr())
	}

	/// Returns true if this handle observes `target`.
	pub fn points_to(&self, target: &Rc<T>) -> bool {
		ptr::addr_eq(self.inner.as_ptr(), Rc::as_ptr(target))
	}
}

impl<T: ?Sized> Clone for WeakHandle<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T: ?Sized> fmt::Debug for WeakHandle<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakHandle")
			.field("addr", &self.inner.as_ptr().cast::<()>())
			.field("alive", &self.is_alive())
			.finish()
	}
}

impl<T: ?Sized> From<&Rc<T>> for WeakHandle<T> {
	fn from(target: &Rc<T>) -> Self {
		Self::new(target)
	}
}

/// Creates a dependent handle from a concrete node.
pub fn weak_node<N: VisualNode + 'static>(node: &Rc<N>) -> WeakHandle<dyn VisualNode> {
	let node: Rc<dyn VisualNode> = node.clone();
	WeakHandle::new(&node)
}

/// Creates a delegate handle from a concrete delegate.
pub fn weak_delegate<D: CleanupDelegate + 'static>(delegate: &Rc<D>) -> WeakHandle<dyn CleanupDelegate> {
	let delegate: Rc<dyn CleanupDelegate> = delegate.clone();
	WeakHandle::new(&delegate)
}
