//! Per-container memoization

use crate::identity::ResolverId;
use crate::resolver::Resolver;
use crate::scope;

/// Wraps `f` so it runs at most once per container.
///
/// The returned resolver has its own identity, which keys the cached value
/// in the ambient container's singleton cache. The same wrapper therefore
/// yields independent values in unrelated containers, and a shared value in
/// a container and its forks.
///
/// Calling the wrapper outside [`run`](crate::run) fails with
/// [`DiError::ScopeRequired`](crate::DiError::ScopeRequired).
///
/// # Examples
///
/// ```
/// use ambit_di::{Dependency, run, singleton};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let counter = Arc::new(AtomicUsize::new(0));
/// let config = {
///     let counter = Arc::clone(&counter);
///     Dependency::from_resolver(singleton(move || counter.fetch_add(1, Ordering::SeqCst)))
/// };
///
/// let same = run(|_| [config.resolve().unwrap(), config.resolve().unwrap()]);
/// assert_eq!(same, [0, 0]);
///
/// let fresh = run(|_| config.resolve().unwrap());
/// assert_eq!(fresh, 1);
/// ```
pub fn singleton<T, F>(f: F) -> Resolver<T>
where
	T: Clone + Send + Sync + 'static,
	F: Fn() -> T + Send + Sync + 'static,
{
	memoize(Resolver::new(f))
}

pub(crate) fn memoize<T>(inner: Resolver<T>) -> Resolver<T>
where
	T: Clone + Send + Sync + 'static,
{
	let id = ResolverId::next();
	Resolver::with_id(id, move || {
		let frame = scope::current_frame("singleton")?;
		let container = frame.container();
		if let Some(value) = container.cached::<T>(id) {
			tracing::trace!(resolver = %id, container = container.label(), "singleton cache hit");
			return Ok(value);
		}

		let value = inner.call()?;
		tracing::debug!(resolver = %id, container = container.label(), "singleton computed");
		Ok(container.cache(id, value))
	})
}
