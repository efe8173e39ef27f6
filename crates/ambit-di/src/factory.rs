//! Constructor-backed resolvers

use crate::resolver::Resolver;

/// Returns a resolver that builds a fresh `T` through its `Default` impl.
///
/// A `Default` impl may itself resolve dependencies, which makes the type
/// usable directly as a dependency's default.
///
/// # Examples
///
/// ```
/// use ambit_di::{Dependency, factory, run};
/// use once_cell::sync::Lazy;
///
/// static TIMEOUT: Lazy<Dependency<u64>> = Lazy::new(|| Dependency::new(|| 30));
///
/// struct Client {
///     timeout: u64,
/// }
///
/// impl Default for Client {
///     fn default() -> Self {
///         Self {
///             timeout: TIMEOUT.resolve().unwrap_or(10),
///         }
///     }
/// }
///
/// let client = Dependency::from_resolver(factory::<Client>());
/// let timeout = run(|rebind| {
///     rebind.rebind_with(&TIMEOUT, || 5);
///     client.resolve().unwrap().timeout
/// });
/// assert_eq!(timeout, 5);
/// ```
pub fn factory<T: Default + 'static>() -> Resolver<T> {
	Resolver::new(T::default)
}
