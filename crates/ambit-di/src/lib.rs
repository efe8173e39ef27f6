//! # Ambit Dependency Injection
//!
//! Closure-based dependency injection over an ambient, per-thread scope.
//!
//! ## Features
//!
//! - **Identity-keyed**: dependencies are values, not string keys; typos and
//!   key collisions cannot happen
//! - **Lazy**: nothing resolves until asked, and every resolution goes
//!   through the active container
//! - **Scoped singletons**: [`singleton`] memoizes once per container, not
//!   once per process
//! - **Local overrides**: rebinding affects one container only, and forks
//!   copy bindings while sharing singleton state
//! - **Caller introspection**: a dependency can ask which dependency
//!   requested it via [`caller`]
//! - **Typed rebind policies**: containers may restrict, at compile time,
//!   which types can be rebound (see [`policy`])
//!
//! ## Example
//!
//! ```
//! use ambit_di::{Dependency, Resolver, run};
//! use once_cell::sync::Lazy;
//!
//! static DATABASE_URL: Lazy<Dependency<String>> =
//!     Lazy::new(|| Dependency::named("database_url", || "postgres://prod".to_string()));
//!
//! static REPOSITORY: Lazy<Dependency<String>> = Lazy::new(|| {
//!     Dependency::singleton(|| format!("repo({})", DATABASE_URL.resolve().unwrap()))
//! });
//!
//! // Production wiring
//! let repo = run(|_| REPOSITORY.resolve()).unwrap();
//! assert_eq!(repo, "repo(postgres://prod)");
//!
//! // Test wiring: rebinding only affects this run's container
//! let repo = run(|rebind| {
//!     rebind.rebind(&DATABASE_URL, Resolver::new(|| "sqlite::memory:".to_string()));
//!     REPOSITORY.resolve()
//! })
//! .unwrap();
//! assert_eq!(repo, "repo(sqlite::memory:)");
//! ```
//!
//! ## Containers
//!
//! [`run`] uses a fresh container every time. To keep singleton state or
//! bindings across runs, build a [`Container`] and run inside it:
//!
//! ```
//! use ambit_di::{Container, Dependency};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! static BUILDS: AtomicUsize = AtomicUsize::new(0);
//! let pool = Dependency::singleton(|| BUILDS.fetch_add(1, Ordering::SeqCst));
//!
//! let app = Container::builder().name("app").build();
//! let request = app.fork();
//!
//! let from_app = app.run(|_| pool.resolve()).unwrap();
//! let from_request = request.run(|_| pool.resolve()).unwrap();
//! assert_eq!(from_app, from_request);
//! assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
//! ```

pub mod container;
pub mod dependency;
pub mod error;
pub mod factory;
pub mod identity;
pub mod policy;
pub mod resolver;
pub mod scope;
pub mod singleton;

pub use container::{Container, ContainerBuilder};
pub use dependency::Dependency;
pub use error::{DiError, DiResult};
pub use factory::factory;
pub use identity::{DependencyId, ResolverId};
pub use policy::{Open, Permits};
pub use resolver::{Binding, Resolver};
pub use scope::{Rebinder, caller, is_active, resolution_path, run, run_in};
pub use singleton::singleton;
