//! Ambient scope management
//!
//! Each thread has a single ambient slot holding the active scope frame: the
//! container installed by [`run`]/[`run_in`] and the stack of dependencies
//! currently resolving inside that run.
//!
//! ## Discipline
//!
//! - Entering a scope saves the previous frame and installs a new one.
//! - Leaving restores the saved frame, on return and on unwind (RAII guard).
//! - Nested runs, including runs over the same container, each get their own
//!   caller stack.
//!
//! Threads never see each other's ambient slot, so containers may be shared
//! between threads while every thread keeps its own scope nesting.

use crate::container::{Container, ContainerState};
use crate::identity::DependencyId;
use crate::policy::{Open, Permits};
use crate::resolver::{Binding, Resolver};
use crate::{DiError, DiResult, Dependency};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// State for one `run` invocation.
pub(crate) struct ScopeFrame {
	container: Arc<ContainerState>,
	callers: RefCell<Vec<DependencyId>>,
}

impl ScopeFrame {
	pub(crate) fn container(&self) -> &ContainerState {
		&self.container
	}

	/// Records `id` as resolving until the returned guard drops.
	pub(crate) fn push_caller(self: &Rc<Self>, id: DependencyId) -> CallerGuard {
		let depth = {
			let mut callers = self.callers.borrow_mut();
			callers.push(id);
			callers.len()
		};
		tracing::trace!(dependency = %id, depth, "resolving dependency");
		CallerGuard {
			frame: Rc::clone(self),
			id,
		}
	}
}

thread_local! {
	/// Ambient slot. `None` outside any `run`.
	static ACTIVE: RefCell<Option<Rc<ScopeFrame>>> = const { RefCell::new(None) };
}

/// RAII guard: pops the caller stack entry on drop.
#[derive(Debug)]
pub(crate) struct CallerGuard {
	frame: Rc<ScopeFrame>,
	id: DependencyId,
}

impl Drop for CallerGuard {
	fn drop(&mut self) {
		let mut callers = self.frame.callers.borrow_mut();
		if let Some(pos) = callers.iter().rposition(|id| *id == self.id) {
			callers.remove(pos);
		}
	}
}

impl std::fmt::Debug for ScopeFrame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ScopeFrame")
			.field("container", &self.container.label())
			.field("callers", &self.callers.borrow())
			.finish()
	}
}

/// RAII guard: restores the previous ambient frame on drop.
struct ScopeGuard {
	previous: Option<Rc<ScopeFrame>>,
	container: Arc<ContainerState>,
}

impl Drop for ScopeGuard {
	fn drop(&mut self) {
		let previous = self.previous.take();
		let _ = ACTIVE.try_with(move |slot| {
			*slot.borrow_mut() = previous;
		});
		tracing::debug!(container = self.container.label(), "leaving scope");
	}
}

fn enter(container: &Arc<ContainerState>) -> ScopeGuard {
	let frame = Rc::new(ScopeFrame {
		container: Arc::clone(container),
		callers: RefCell::new(Vec::new()),
	});
	let previous = ACTIVE.with(|slot| slot.borrow_mut().replace(frame));
	tracing::debug!(
		container = container.label(),
		nested = previous.is_some(),
		"entering scope"
	);
	ScopeGuard {
		previous,
		container: Arc::clone(container),
	}
}

/// Returns the active frame, or `ScopeRequired` naming `operation`.
pub(crate) fn current_frame(operation: &'static str) -> DiResult<Rc<ScopeFrame>> {
	ACTIVE
		.try_with(|slot| slot.borrow().clone())
		.ok()
		.flatten()
		.ok_or_else(|| DiError::scope_required(operation))
}

/// Runs `body` inside a fresh, empty container.
///
/// # Examples
///
/// ```
/// use ambit_di::{Dependency, run};
///
/// let port = Dependency::new(|| 8080u16);
///
/// let port = run(|_| port.resolve()).unwrap();
/// assert_eq!(port, 8080);
/// ```
pub fn run<R>(body: impl FnOnce(&Rebinder<'_, Open>) -> R) -> R {
	run_in(&Container::new(), body)
}

/// Runs `body` with `container` as the ambient container.
///
/// The previously active container, if any, is restored when `body`
/// returns or unwinds. `body` receives a [`Rebinder`] bound to `container`.
pub fn run_in<P, R>(container: &Container<P>, body: impl FnOnce(&Rebinder<'_, P>) -> R) -> R {
	let _guard = enter(container.state());
	body(&Rebinder { container })
}

/// Whether the current thread is inside a `run`.
pub fn is_active() -> bool {
	ACTIVE
		.try_with(|slot| slot.borrow().is_some())
		.unwrap_or(false)
}

/// Returns the dependency that requested the one currently resolving.
///
/// This is the second-to-last entry of the caller stack; `None` when fewer
/// than two dependencies are resolving.
///
/// # Examples
///
/// ```
/// use ambit_di::{Dependency, caller, run};
/// use once_cell::sync::Lazy;
///
/// static LOGGER: Lazy<Dependency<String>> = Lazy::new(|| {
///     Dependency::new(|| match caller().unwrap() {
///         Some(id) if id == SERVICE.id() => "service-logger".to_string(),
///         _ => "root-logger".to_string(),
///     })
/// });
/// static SERVICE: Lazy<Dependency<String>> = Lazy::new(|| {
///     Dependency::new(|| LOGGER.resolve().unwrap())
/// });
///
/// let (direct, nested) = run(|_| (LOGGER.resolve().unwrap(), SERVICE.resolve().unwrap()));
/// assert_eq!(direct, "root-logger");
/// assert_eq!(nested, "service-logger");
/// ```
pub fn caller() -> DiResult<Option<DependencyId>> {
	let frame = current_frame("caller")?;
	let callers = frame.callers.borrow();
	Ok(callers.iter().rev().nth(1).copied())
}

/// Returns the live resolution chain, outermost dependency first.
pub fn resolution_path() -> DiResult<Vec<DependencyId>> {
	let frame = current_frame("resolution_path")?;
	let path = frame.callers.borrow().clone();
	Ok(path)
}

/// Rebinding handle passed to the body of [`run`]/[`run_in`].
///
/// The handle is bound to the container it was created for, even while a
/// nested run has another container active, and it only accepts types the
/// container's policy permits. It cannot escape `body`:
///
/// ```compile_fail
/// use ambit_di::{Dependency, run};
///
/// let dep = Dependency::new(|| 1);
/// let container = run(|rebind| rebind.container());
/// container.bind_with(&dep, || 2);
/// ```
pub struct Rebinder<'a, P = Open> {
	container: &'a Container<P>,
}

impl<'a, P> Rebinder<'a, P> {
	/// The container this handle rebinds.
	pub fn container(&self) -> &'a Container<P> {
		self.container
	}

	/// Replaces the function governing `dependency` in this container.
	///
	/// Passing a [`Resolver`] binds that function. Passing another
	/// [`Dependency`] binds whatever that dependency is currently bound to in
	/// this container, or its default when it has no binding yet.
	///
	/// Singleton state is untouched: a different resolver gets a fresh cache
	/// slot, rebinding to the same resolver keeps its cached value.
	///
	/// # Examples
	///
	/// ```
	/// use ambit_di::{Dependency, Resolver, run};
	///
	/// let db_url = Dependency::new(|| "postgres://prod".to_string());
	///
	/// let url = run(|rebind| {
	///     rebind.rebind(&db_url, Resolver::new(|| "sqlite::memory:".to_string()));
	///     db_url.resolve()
	/// })
	/// .unwrap();
	/// assert_eq!(url, "sqlite::memory:");
	/// ```
	pub fn rebind<T: 'static>(&self, dependency: &Dependency<T>, binding: impl Into<Binding<T>>)
	where
		P: Permits<T>,
	{
		self.container.bind(dependency, binding);
	}

	/// Rebinds `dependency` to a closure.
	pub fn rebind_with<T, F>(&self, dependency: &Dependency<T>, f: F)
	where
		T: 'static,
		F: Fn() -> T + Send + Sync + 'static,
		P: Permits<T>,
	{
		self.rebind(dependency, Resolver::new(f));
	}

	/// Drops the binding for `dependency` in this container.
	pub fn unbind<T>(&self, dependency: &Dependency<T>) -> bool {
		self.container.unbind(dependency)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_no_scope_outside_run() {
		// Act
		let result = caller();

		// Assert
		assert!(!is_active());
		assert_eq!(
			result,
			Err(DiError::ScopeRequired {
				operation: "caller"
			})
		);
	}

	#[rstest]
	fn test_run_installs_and_restores_frame() {
		// Act
		let inside = run(|_| is_active());

		// Assert
		assert!(inside);
		assert!(!is_active());
	}

	#[rstest]
	fn test_nested_run_restores_outer_container() {
		// Arrange
		let outer = Container::builder().name("outer").build();
		let inner = Container::builder().name("inner").build();
		let label = || current_frame("test").unwrap().container().label().to_owned();

		// Act
		let labels = outer.run(|_| {
			let before = label();
			let nested = inner.run(|_| label());
			let after = label();
			(before, nested, after)
		});

		// Assert
		assert_eq!(
			labels,
			("outer".to_string(), "inner".to_string(), "outer".to_string())
		);
	}

	#[rstest]
	fn test_panic_restores_previous_frame() {
		// Arrange
		let outer = Container::builder().name("outer").build();

		// Act
		let label_after_panic = outer.run(|_| {
			let result = std::panic::catch_unwind(|| {
				let _: () = run(|_| panic!("boom"));
			});
			assert!(result.is_err());
			current_frame("test").unwrap().container().label().to_owned()
		});

		// Assert
		assert_eq!(label_after_panic, "outer");
		assert!(!is_active());
	}

	#[rstest]
	fn test_caller_guard_pops_on_drop() {
		run(|_| {
			// Arrange
			let frame = current_frame("test").unwrap();
			let first = DependencyId::next();
			let second = DependencyId::next();

			// Act
			let outer_guard = frame.push_caller(first);
			let inner_guard = frame.push_caller(second);
			let during = resolution_path().unwrap();
			let caller_during = caller().unwrap();
			drop(inner_guard);
			let caller_after = caller().unwrap();
			drop(outer_guard);

			// Assert
			assert_eq!(during, vec![first, second]);
			assert_eq!(caller_during, Some(first));
			assert_eq!(caller_after, None);
			assert!(resolution_path().unwrap().is_empty());
		});
	}

	#[rstest]
	fn test_nested_run_same_container_has_own_caller_stack() {
		// Arrange
		let container = Container::new();

		// Act
		let inner_path = container.run(|_| {
			let frame = current_frame("test").unwrap();
			let _guard = frame.push_caller(DependencyId::next());
			container.run(|_| resolution_path().unwrap())
		});

		// Assert
		assert!(inner_path.is_empty());
	}

	#[rstest]
	fn test_rebinder_targets_its_own_container_during_nested_run() {
		// Arrange
		let dep = Dependency::new(|| "default");
		let outer = Container::builder().name("outer").build();
		let inner = Container::builder().name("inner").build();

		// Act
		let (active, resolved) = outer.run(|rebind| {
			inner.run(|_| {
				rebind.rebind_with(&dep, || "outer-only");
				let active = current_frame("test").unwrap().container().label().to_owned();
				(active, dep.resolve().unwrap())
			})
		});

		// Assert
		assert_eq!(active, "inner");
		assert_eq!(resolved, "default");
		assert!(outer.is_bound(&dep));
		assert_eq!(outer.run(|_| dep.resolve().unwrap()), "outer-only");
	}
}
