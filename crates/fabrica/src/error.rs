//! Error types for the factory engine.
//!
//! All failures surface as [`FactoryError`]. Errors fall into three classes
//! (see [`ErrorKind`]): definition errors are fatal to the suite and surface
//! at registration or first build, resolution errors abort a single build,
//! and persistence errors are reported separately so callers can distinguish
//! a bad fixture definition from a bad downstream store.

use thiserror::Error;

use crate::instance::BuiltInstance;

/// Errors that can occur during factory registration, building, or persistence.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// A factory with the same name is already registered.
	#[error("Duplicate factory: {0}")]
	DuplicateFactory(String),

	/// An attribute name appears more than once in a definition or trait.
	#[error("Duplicate attribute `{attribute}` in factory `{factory}`")]
	DuplicateAttribute {
		/// Factory that declares the attribute twice.
		factory: String,
		/// The repeated attribute name.
		attribute: String,
	},

	/// The parent chain of a definition forms a cycle.
	#[error("Cyclic factory inheritance: {path}")]
	CyclicInheritance {
		/// Inheritance path, formatted "a -> b -> a".
		path: String,
	},

	/// An association references a sibling attribute that is not resolved yet.
	#[error(
		"Attribute `{attribute}` of factory `{factory}` references sibling `{needs}` before it is resolved"
	)]
	DependencyOrder {
		/// Factory whose definition is out of order.
		factory: String,
		/// The association attribute being resolved.
		attribute: String,
		/// The sibling attribute it needs.
		needs: String,
	},

	/// No factory is registered under the requested name.
	#[error("Unknown factory: {0}")]
	UnknownFactory(String),

	/// A build request named a trait the factory does not define.
	#[error("Unknown trait `{trait_name}` for factory `{factory}`")]
	UnknownTrait {
		/// Factory the trait was requested on.
		factory: String,
		/// The missing trait name.
		trait_name: String,
	},

	/// Building an association transitively requested the same factory again.
	#[error("Circular association detected: {path}")]
	CircularAssociation {
		/// Build path, formatted "article -> author -> article".
		path: String,
	},

	/// The association graph recursed past the maximum build depth.
	#[error("Maximum build depth exceeded: {0}")]
	DepthExceeded(usize),

	/// The persistence hook failed.
	#[error("Persistence failed: {message}")]
	Persistence {
		/// Description of the downstream failure.
		message: String,
		/// The built instance, attached under the `ReturnUnpersisted` policy.
		instance: Option<Box<BuiltInstance>>,
	},

	/// A create request ran without a configured persister.
	#[error("No persister configured for factory `{0}`")]
	NoPersister(String),

	/// A built instance could not be deserialized into the target model type.
	#[error("Model hydration failed for `{model}`: {message}")]
	Hydration {
		/// Model identifier of the instance.
		model: String,
		/// Underlying deserialization error.
		message: String,
	},
}

/// Classification of a [`FactoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Bad fixture definition; fail fast, no retry.
	Definition,
	/// Aborts the current build only.
	Resolution,
	/// Downstream store failure; registry state is unaffected.
	Persistence,
}

impl FactoryError {
	/// Returns the error class this error belongs to.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::DuplicateFactory(_)
			| Self::DuplicateAttribute { .. }
			| Self::CyclicInheritance { .. }
			| Self::DependencyOrder { .. } => ErrorKind::Definition,
			Self::UnknownFactory(_)
			| Self::UnknownTrait { .. }
			| Self::CircularAssociation { .. }
			| Self::DepthExceeded(_)
			| Self::Hydration { .. } => ErrorKind::Resolution,
			Self::Persistence { .. } | Self::NoPersister(_) => ErrorKind::Persistence,
		}
	}

	/// Creates a persistence error without an attached instance.
	pub fn persistence(message: impl Into<String>) -> Self {
		Self::Persistence {
			message: message.into(),
			instance: None,
		}
	}

	/// Returns the built instance attached to a persistence error, if any.
	///
	/// Only populated when a create request ran with
	/// [`PersistPolicy::ReturnUnpersisted`](crate::engine::PersistPolicy).
	pub fn into_instance(self) -> Option<BuiltInstance> {
		match self {
			Self::Persistence { instance, .. } => instance.map(|boxed| *boxed),
			_ => None,
		}
	}

	pub(crate) fn with_instance(self, built: BuiltInstance) -> Self {
		match self {
			Self::Persistence { message, .. } => Self::Persistence {
				message,
				instance: Some(Box::new(built)),
			},
			other => other,
		}
	}
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
