//! Resolution functions and rebinding targets

use crate::identity::ResolverId;
use crate::{DiResult, Dependency};
use std::fmt;
use std::sync::Arc;

type ResolveFn<T> = dyn Fn() -> DiResult<T> + Send + Sync;

/// A zero-argument resolution function with its own identity.
///
/// Cloning a `Resolver` keeps its identity; constructing a new one from the
/// same closure does not. Singleton caches are keyed by this identity.
///
/// # Examples
///
/// ```
/// use ambit_di::{Resolver, run};
///
/// let answer = Resolver::new(|| 42);
/// let same = answer.clone();
/// assert_eq!(answer.id(), same.id());
///
/// let value = run(|_| answer.call()).unwrap();
/// assert_eq!(value, 42);
/// ```
pub struct Resolver<T> {
	id: ResolverId,
	func: Arc<ResolveFn<T>>,
}

impl<T: 'static> Resolver<T> {
	/// Wraps a plain closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
	{
		Self::from_fallible(move || Ok(f()))
	}

	pub(crate) fn from_fallible<F>(f: F) -> Self
	where
		F: Fn() -> DiResult<T> + Send + Sync + 'static,
	{
		Self::with_id(ResolverId::next(), f)
	}

	pub(crate) fn with_id<F>(id: ResolverId, f: F) -> Self
	where
		F: Fn() -> DiResult<T> + Send + Sync + 'static,
	{
		Self {
			id,
			func: Arc::new(f),
		}
	}

	/// Wraps this resolver so its result is memoized once per container.
	///
	/// See [`singleton`](crate::singleton()).
	pub fn singleton(self) -> Resolver<T>
	where
		T: Clone + Send + Sync,
	{
		crate::singleton::memoize(self)
	}

	/// Identity used for singleton caching.
	pub fn id(&self) -> ResolverId {
		self.id
	}

	/// Invokes the function.
	///
	/// Plain resolvers only fail when the closure itself resolves a
	/// dependency outside a scope; singleton resolvers always need one.
	pub fn call(&self) -> DiResult<T> {
		(self.func)()
	}
}

impl<T> Clone for Resolver<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			func: Arc::clone(&self.func),
		}
	}
}

impl<T> fmt::Debug for Resolver<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Resolver").field("id", &self.id).finish()
	}
}

/// What a dependency gets rebound to.
///
/// Rebinding to another [`Dependency`] aliases whatever that dependency is
/// bound to in the same container at rebind time, falling back to its default.
#[derive(Debug)]
pub enum Binding<T> {
	/// A plain resolution function
	Function(Resolver<T>),
	/// The current binding of another dependency
	Dependency(Dependency<T>),
}

impl<T> From<Resolver<T>> for Binding<T> {
	fn from(resolver: Resolver<T>) -> Self {
		Self::Function(resolver)
	}
}

impl<T> From<&Resolver<T>> for Binding<T> {
	fn from(resolver: &Resolver<T>) -> Self {
		Self::Function(resolver.clone())
	}
}

impl<T> From<Dependency<T>> for Binding<T> {
	fn from(dependency: Dependency<T>) -> Self {
		Self::Dependency(dependency)
	}
}

impl<T> From<&Dependency<T>> for Binding<T> {
	fn from(dependency: &Dependency<T>) -> Self {
		Self::Dependency(dependency.clone())
	}
}
