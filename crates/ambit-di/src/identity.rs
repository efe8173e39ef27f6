//! Identity tokens for dependencies and resolvers
//!
//! Dependencies and resolvers are keyed by identity, never by name. Each
//! identity is minted from a process-wide counter, so two tokens compare equal
//! only when one was cloned from the other.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a [`Dependency`](crate::Dependency).
///
/// Returned by [`Dependency::id`](crate::Dependency::id) and by the caller
/// introspection functions in [`scope`](crate::scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyId(u64);

impl DependencyId {
	pub(crate) fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}

	/// Raw numeric value, useful for log correlation.
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for DependencyId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "dep#{}", self.0)
	}
}

/// Identity of a [`Resolver`](crate::Resolver).
///
/// Singleton caches are keyed by this id, so rebinding a dependency to a
/// different resolver starts a fresh cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolverId(u64);

impl ResolverId {
	pub(crate) fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for ResolverId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "fn#{}", self.0)
	}
}
