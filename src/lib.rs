//! # Ambit
//!
//! Dependency injection built on closures and an ambient execution scope
//! instead of a container-object API.
//!
//! Dependencies are plain values wrapping zero-argument factories. They
//! resolve lazily against whichever container is active on the current
//! thread, can be memoized per container, and can be rebound locally
//! without touching global state.
//!
//! ## Feature Flags
//!
//! - `di` (default) - the resolution engine from `ambit-di`
//!
//! ## Quick Start
//!
//! ```
//! use ambit::{Dependency, run};
//!
//! let answer = Dependency::new(|| 42);
//! let value = run(|rebind| {
//!     rebind.rebind_with(&answer, || 7);
//!     answer.resolve()
//! })
//! .unwrap();
//! assert_eq!(value, 7);
//! ```

#[cfg(feature = "di")]
pub use ambit_di as di;

#[cfg(feature = "di")]
pub use ambit_di::{
	Binding, Container, ContainerBuilder, Dependency, DependencyId, DiError, DiResult, Open,
	Permits, Rebinder, Resolver, ResolverId, caller, factory, is_active, permit, resolution_path,
	run, run_in, singleton,
};
