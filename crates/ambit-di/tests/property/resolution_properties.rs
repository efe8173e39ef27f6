//! Property-based tests for resolution semantics
//!
//! Uses proptest to check invariants that must hold for any number of
//! resolutions, containers and rebinding sequences.

use ambit_di::{Container, Dependency, caller, run, singleton};
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting() -> (Arc<AtomicUsize>, impl Fn() -> usize + Send + Sync + 'static) {
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	(calls, move || counter.fetch_add(1, Ordering::SeqCst))
}

proptest! {
	/// Transient dependencies call their function once per resolution.
	#[test]
	fn transient_resolutions_are_all_distinct(resolutions in 1usize..32) {
		let (calls, next) = counting();
		let dep = Dependency::new(next);

		let values: Vec<usize> = run(|_| (0..resolutions).map(|_| dep.resolve().unwrap()).collect());

		prop_assert_eq!(values, (0..resolutions).collect::<Vec<_>>());
		prop_assert_eq!(calls.load(Ordering::SeqCst), resolutions);
	}

	/// Singleton dependencies compute once per container, however often
	/// they resolve.
	#[test]
	fn singleton_computes_once_per_container(
		containers in 1usize..8,
		resolutions in 1usize..16,
	) {
		let (calls, next) = counting();
		let dep = Dependency::from_resolver(singleton(next));

		for expected in 0..containers {
			let container = Container::new();
			for _ in 0..resolutions {
				prop_assert_eq!(container.run(|_| dep.resolve().unwrap()), expected);
			}
		}
		prop_assert_eq!(calls.load(Ordering::SeqCst), containers);
	}

	/// The last rebinding in a container wins, and other containers keep
	/// the default.
	#[test]
	fn last_rebind_wins(values in proptest::collection::vec(any::<i64>(), 1..10)) {
		let dep = Dependency::new(|| i64::MIN);
		let container = Container::new();

		for value in &values {
			let value = *value;
			container.bind_with(&dep, move || value);
		}

		let last = *values.last().unwrap();
		prop_assert_eq!(container.run(|_| dep.resolve().unwrap()), last);
		prop_assert_eq!(run(|_| dep.resolve().unwrap()), i64::MIN);
	}

	/// In a chain of nested dependencies every link observes its parent as
	/// caller, and the outermost link observes none.
	#[test]
	fn caller_is_always_immediate_parent(depth in 1usize..12) {
		let mut chain: Vec<Dependency<Vec<Option<ambit_di::DependencyId>>>> =
			vec![Dependency::new(|| vec![caller().unwrap()])];
		for _ in 1..depth {
			let inner = chain.last().unwrap().clone();
			chain.push(Dependency::new(move || {
				let mut seen = inner.resolve().unwrap();
				seen.push(caller().unwrap());
				seen
			}));
		}

		let seen = run(|_| chain.last().unwrap().resolve().unwrap());

		// seen[0] is reported by the innermost link, seen[depth - 1] by the outermost
		let mut expected: Vec<_> = chain.iter().skip(1).map(|dep| Some(dep.id())).collect();
		expected.push(None);
		prop_assert_eq!(seen, expected);
	}
}
