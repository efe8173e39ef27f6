//! Containers: per-scope bindings and singleton state
//!
//! A [`Container`] owns two identity-keyed maps:
//!
//! - **bindings**: `DependencyId -> Resolver`, lazily seeded with each
//!   dependency's default the first time it resolves in this container.
//! - **singletons**: `ResolverId -> value`, the cache behind
//!   [`singleton`](crate::singleton()) resolvers.
//!
//! Forking a container copies the bindings and shares the singleton cache.

use crate::identity::{DependencyId, ResolverId};
use crate::policy::{Open, Permits};
use crate::resolver::{Binding, Resolver};
use crate::scope::{self, Rebinder};
use crate::Dependency;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Slot = Arc<dyn Any + Send + Sync>;

/// Shared state behind a [`Container`] handle.
pub(crate) struct ContainerState {
	name: Option<Arc<str>>,
	bindings: RwLock<HashMap<DependencyId, Slot>>,
	singletons: Arc<RwLock<HashMap<ResolverId, Slot>>>,
}

impl ContainerState {
	fn new(name: Option<Arc<str>>) -> Self {
		Self {
			name,
			bindings: RwLock::new(HashMap::new()),
			singletons: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	fn fork(&self, name: Option<Arc<str>>) -> Self {
		Self {
			name: name.or_else(|| self.name.clone()),
			bindings: RwLock::new(self.bindings.read().clone()),
			singletons: Arc::clone(&self.singletons),
		}
	}

	pub(crate) fn label(&self) -> &str {
		self.name.as_deref().unwrap_or("<anonymous>")
	}

	pub(crate) fn binding<T: 'static>(&self, id: DependencyId) -> Option<Resolver<T>> {
		self.bindings
			.read()
			.get(&id)
			.and_then(|slot| slot.downcast_ref::<Resolver<T>>())
			.cloned()
	}

	/// Returns the resolver bound to `dependency`, seeding its default first
	/// when nothing is bound yet.
	pub(crate) fn bound_or_seed<T: 'static>(&self, dependency: &Dependency<T>) -> Resolver<T> {
		if let Some(resolver) = self.binding::<T>(dependency.id()) {
			return resolver;
		}

		let mut bindings = self.bindings.write();
		let slot = bindings.entry(dependency.id()).or_insert_with(|| {
			tracing::debug!(
				dependency = %dependency.id(),
				name = dependency.name().unwrap_or("<unnamed>"),
				container = self.label(),
				"seeding default binding"
			);
			Arc::new(dependency.default_resolver().clone())
		});
		slot.downcast_ref::<Resolver<T>>()
			.cloned()
			.unwrap_or_else(|| dependency.default_resolver().clone())
	}

	pub(crate) fn set_binding<T: 'static>(&self, id: DependencyId, resolver: Resolver<T>) {
		tracing::debug!(
			dependency = %id,
			resolver = %resolver.id(),
			container = self.label(),
			"rebinding dependency"
		);
		self.bindings.write().insert(id, Arc::new(resolver));
	}

	/// Turns a [`Binding`] into the resolver it denotes in this container.
	pub(crate) fn resolve_binding<T: 'static>(&self, binding: Binding<T>) -> Resolver<T> {
		match binding {
			Binding::Function(resolver) => resolver,
			Binding::Dependency(other) => self
				.binding::<T>(other.id())
				.unwrap_or_else(|| other.default_resolver().clone()),
		}
	}

	pub(crate) fn remove_binding(&self, id: DependencyId) -> bool {
		self.bindings.write().remove(&id).is_some()
	}

	pub(crate) fn is_bound(&self, id: DependencyId) -> bool {
		self.bindings.read().contains_key(&id)
	}

	pub(crate) fn cached<T: Clone + 'static>(&self, id: ResolverId) -> Option<T> {
		self.singletons
			.read()
			.get(&id)
			.and_then(|slot| slot.downcast_ref::<T>())
			.cloned()
	}

	/// Stores `value` under `id` unless a value is already present, and
	/// returns whichever value ends up cached.
	pub(crate) fn cache<T: Clone + Send + Sync + 'static>(&self, id: ResolverId, value: T) -> T {
		let mut singletons = self.singletons.write();
		let slot = singletons.entry(id).or_insert_with(|| Arc::new(value.clone()));
		slot.downcast_ref::<T>().cloned().unwrap_or(value)
	}
}

/// Storage for one logical scope: rebindings and singleton state.
///
/// `P` is a compile-time rebind policy (see [`policy`](crate::policy)); it
/// has no runtime representation.
///
/// # Examples
///
/// ```
/// use ambit_di::{Container, Dependency, Resolver};
///
/// let greeting = Dependency::new(|| "hello");
///
/// let container = Container::new();
/// container.bind(&greeting, Resolver::new(|| "bonjour"));
///
/// let value = container.run(|_| greeting.resolve()).unwrap();
/// assert_eq!(value, "bonjour");
/// ```
pub struct Container<P = Open> {
	state: Arc<ContainerState>,
	_policy: PhantomData<fn() -> P>,
}

impl Container<Open> {
	/// Creates an empty, unrestricted container.
	pub fn new() -> Self {
		Self::from_state(ContainerState::new(None))
	}

	/// Starts building a container.
	///
	/// # Examples
	///
	/// ```
	/// use ambit_di::Container;
	///
	/// let base = Container::new();
	/// let container = Container::builder().name("request").base(&base).build();
	/// assert_eq!(container.name(), Some("request"));
	/// ```
	pub fn builder() -> ContainerBuilder<Open> {
		ContainerBuilder::new()
	}
}

impl<P> Container<P> {
	fn from_state(state: ContainerState) -> Self {
		Self {
			state: Arc::new(state),
			_policy: PhantomData,
		}
	}

	pub(crate) fn state(&self) -> &Arc<ContainerState> {
		&self.state
	}

	/// Optional label used in log records.
	pub fn name(&self) -> Option<&str> {
		self.state.name.as_deref()
	}

	/// Creates a new container from this one.
	///
	/// Bindings are copied, so rebinding the fork never affects `self`. The
	/// singleton cache is shared, so values cached before or after the fork
	/// are visible to both until a side rebinds to a different resolver.
	pub fn fork(&self) -> Self {
		Self::from_state(self.state.fork(None))
	}

	/// Runs `body` with this container as the ambient container.
	///
	/// Equivalent to [`run_in`](crate::run_in).
	pub fn run<R>(&self, body: impl FnOnce(&Rebinder<'_, P>) -> R) -> R {
		scope::run_in(self, body)
	}

	/// Binds `dependency` in this container without entering a scope.
	///
	/// Has the same semantics as [`Rebinder::rebind`].
	pub fn bind<T: 'static>(&self, dependency: &Dependency<T>, binding: impl Into<Binding<T>>)
	where
		P: Permits<T>,
	{
		let resolver = self.state.resolve_binding(binding.into());
		self.state.set_binding(dependency.id(), resolver);
	}

	/// Binds `dependency` to a closure.
	pub fn bind_with<T, F>(&self, dependency: &Dependency<T>, f: F)
	where
		T: 'static,
		F: Fn() -> T + Send + Sync + 'static,
		P: Permits<T>,
	{
		self.bind(dependency, Resolver::new(f));
	}

	/// Drops the binding for `dependency`; its default is seeded again on
	/// next resolution. Returns whether a binding existed.
	pub fn unbind<T>(&self, dependency: &Dependency<T>) -> bool {
		self.state.remove_binding(dependency.id())
	}

	/// Whether `dependency` has a binding here, either rebound or seeded.
	pub fn is_bound<T>(&self, dependency: &Dependency<T>) -> bool {
		self.state.is_bound(dependency.id())
	}

	/// Number of bindings currently held.
	pub fn binding_count(&self) -> usize {
		self.state.bindings.read().len()
	}

	/// Number of singleton values in the (possibly shared) cache.
	pub fn cached_count(&self) -> usize {
		self.state.singletons.read().len()
	}

	/// Whether `self` and `other` share one singleton cache.
	pub fn shares_singletons_with<Q>(&self, other: &Container<Q>) -> bool {
		Arc::ptr_eq(&self.state.singletons, &other.state.singletons)
	}
}

impl Default for Container<Open> {
	fn default() -> Self {
		Self::new()
	}
}

impl<P> fmt::Debug for Container<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("name", &self.state.label())
			.field("bindings", &self.binding_count())
			.field("cached", &self.cached_count())
			.finish()
	}
}

/// Builder for [`Container`].
pub struct ContainerBuilder<P = Open> {
	name: Option<Arc<str>>,
	base: Option<Arc<ContainerState>>,
	_policy: PhantomData<fn() -> P>,
}

impl ContainerBuilder<Open> {
	fn new() -> Self {
		Self {
			name: None,
			base: None,
			_policy: PhantomData,
		}
	}
}

impl<P> ContainerBuilder<P> {
	/// Label for log records.
	pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Forks `base`: copies its bindings and shares its singleton cache.
	pub fn base<Q>(mut self, base: &Container<Q>) -> Self {
		self.base = Some(Arc::clone(base.state()));
		self
	}

	/// Switches the rebind policy of the container being built.
	pub fn policy<Q>(self) -> ContainerBuilder<Q> {
		ContainerBuilder {
			name: self.name,
			base: self.base,
			_policy: PhantomData,
		}
	}

	pub fn build(self) -> Container<P> {
		let state = match self.base {
			Some(base) => base.fork(self.name),
			None => ContainerState::new(self.name),
		};
		Container::from_state(state)
	}
}
