//! Compile-time rebind policies
//!
//! A container's policy parameter restricts which value types may be
//! rebound through it. Checks happen entirely in the type system; a policy
//! has no runtime representation.
//!
//! - [`Open`] (the default) permits every type.
//! - A custom policy is any type; [`permit!`](crate::permit) implements
//!   [`Permits`] for an allow-list of value types. Types left off the list
//!   are denied.
//!
//! # Examples
//!
//! ```
//! use ambit_di::{Container, Dependency, permit};
//!
//! #[derive(Clone)]
//! struct Clock(u64);
//! struct Mailer;
//!
//! /// Tests may fake the clock but never the mailer.
//! struct TestPolicy;
//! permit!(TestPolicy: Clock);
//!
//! let clock = Dependency::new(|| Clock(0));
//! let container = Container::builder().policy::<TestPolicy>().build();
//! container.bind_with(&clock, || Clock(42));
//!
//! let now = container.run(|_| clock.resolve()).unwrap();
//! assert_eq!(now.0, 42);
//! ```
//!
//! Rebinding a type the policy does not permit is a compile error:
//!
//! ```compile_fail
//! use ambit_di::{Container, Dependency, permit};
//!
//! struct Clock;
//! struct Mailer;
//! struct TestPolicy;
//! permit!(TestPolicy: Clock);
//!
//! let mailer = Dependency::new(|| Mailer);
//! let container = Container::builder().policy::<TestPolicy>().build();
//! container.bind_with(&mailer, || Mailer);
//! ```

/// Marks `T` as rebindable under the implementing policy.
pub trait Permits<T: ?Sized> {}

/// Policy that permits every type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Open;

impl<T: ?Sized> Permits<T> for Open {}

/// Implements [`Permits`] for each listed type.
///
/// ```
/// use ambit_di::{Permits, permit};
///
/// struct ReadOnly;
/// permit!(ReadOnly: String, u32);
///
/// fn assert_permits<P: Permits<T>, T>() {}
/// assert_permits::<ReadOnly, String>();
/// assert_permits::<ReadOnly, u32>();
/// ```
#[macro_export]
macro_rules! permit {
	($policy:ty : $($permitted:ty),+ $(,)?) => {
		$(
			impl $crate::Permits<$permitted> for $policy {}
		)+
	};
}
