//! Resolution errors

/// Errors raised by the resolution engine.
///
/// Failures inside user resolvers are not wrapped: they travel in the resolved
/// value itself (for example `Dependency<Result<Db, DbError>>`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiError {
	/// An operation that reads the ambient container ran outside `run`.
	#[error(
		"`{operation}` requires an active scope.\nWrap the call in `ambit_di::run` or `Container::run`."
	)]
	ScopeRequired {
		/// Name of the operation that needed a scope
		operation: &'static str,
	},
}

impl DiError {
	pub(crate) fn scope_required(operation: &'static str) -> Self {
		Self::ScopeRequired { operation }
	}
}

/// Result alias used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;
