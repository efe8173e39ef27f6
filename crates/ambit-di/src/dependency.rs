//! Dependencies: identity-bound, lazily resolved value providers

use crate::identity::DependencyId;
use crate::resolver::Resolver;
use crate::scope;
use crate::DiResult;
use std::fmt;

/// A zero-argument value provider identified by reference, not by name.
///
/// Resolution looks the dependency up in the ambient container. When the
/// container has no binding yet, the default resolver is seeded there first,
/// so later rebinding always finds the function currently in charge.
///
/// Clones share the identity of the original. Dependencies are usually
/// declared once, for example in a `static` behind `once_cell::sync::Lazy`.
///
/// # Examples
///
/// ```
/// use ambit_di::{Dependency, run};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let counter = Arc::new(AtomicUsize::new(0));
/// let next = {
///     let counter = Arc::clone(&counter);
///     Dependency::new(move || counter.fetch_add(1, Ordering::SeqCst))
/// };
///
/// let values = run(|_| [next.resolve().unwrap(), next.resolve().unwrap()]);
/// assert_eq!(values, [0, 1]);
/// ```
pub struct Dependency<T> {
	id: DependencyId,
	name: Option<&'static str>,
	default: Resolver<T>,
}

impl<T: 'static> Dependency<T> {
	/// Creates a transient dependency: every resolution calls `f` again.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
	{
		Self::from_resolver(Resolver::new(f))
	}

	/// Creates a dependency with a diagnostic name shown in logs.
	pub fn named<F>(name: &'static str, f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
	{
		Self {
			name: Some(name),
			..Self::new(f)
		}
	}

	/// Creates a dependency whose default is memoized once per container.
	///
	/// Shorthand for `Dependency::from_resolver(singleton(f))`.
	pub fn singleton<F>(f: F) -> Self
	where
		T: Clone + Send + Sync,
		F: Fn() -> T + Send + Sync + 'static,
	{
		Self::from_resolver(Resolver::new(f).singleton())
	}

	/// Creates a dependency around an existing resolver.
	pub fn from_resolver(default: Resolver<T>) -> Self {
		Self {
			id: DependencyId::next(),
			name: None,
			default,
		}
	}

	/// Sets the diagnostic name.
	pub fn with_name(mut self, name: &'static str) -> Self {
		self.name = Some(name);
		self
	}

	/// Resolves the dependency through the ambient container.
	///
	/// Fails with [`DiError::ScopeRequired`](crate::DiError::ScopeRequired)
	/// outside [`run`](crate::run). While the bound function runs, this
	/// dependency sits on the caller stack; it is popped on every exit path,
	/// including unwinding.
	pub fn resolve(&self) -> DiResult<T> {
		let frame = scope::current_frame("Dependency::resolve")?;
		let resolver = frame.container().bound_or_seed(self);
		let _caller = frame.push_caller(self.id);
		resolver.call()
	}

	/// Whether this dependency requested the one currently resolving.
	///
	/// Fails outside [`run`](crate::run), like [`caller`](crate::caller).
	pub fn is_caller(&self) -> DiResult<bool> {
		Ok(scope::caller()? == Some(self.id))
	}
}

impl<T> Dependency<T> {
	pub fn id(&self) -> DependencyId {
		self.id
	}

	pub fn name(&self) -> Option<&'static str> {
		self.name
	}

	/// The resolver supplied at creation.
	pub fn default_resolver(&self) -> &Resolver<T> {
		&self.default
	}
}

impl<T> Clone for Dependency<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			name: self.name,
			default: self.default.clone(),
		}
	}
}

impl<T> PartialEq for Dependency<T> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl<T> Eq for Dependency<T> {}

impl<T> fmt::Debug for Dependency<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dependency")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("default", &self.default)
			.finish()
	}
}
