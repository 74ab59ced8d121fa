//! Convenience re-exports for common usage.
//!
//! This module provides a single import for the most commonly used items
//! from the fabrica crate.
//!
//! # Example
//!
//! ```ignore
//! use fabrica::prelude::*;
//!
//! register_factory(
//!     FactoryDefinition::new("user", "auth.User")
//!         .attribute("email", AttributeSpec::sequence("user{n}@test.com")),
//! )?;
//! let user = build("user")?;
//! ```

// Error types
pub use crate::error::{ErrorKind, FactoryError, FactoryResult};

// Definition types
pub use crate::factory::{
	AssociationSpec, AttributeSpec, Cardinality, FactoryDefinition, FakerKind, OverrideValue,
	SequenceSpec, TraitSpec,
};

// Registry functions and handles
pub use crate::factory::{
	FactoryRegistry, clear_factories, get_factory, has_factory, register_factory, register_trait,
	replace_factory,
};

// Build engine
pub use crate::engine::{
	BuildEngine, BuildRequest, BuildStrategy, PersistPolicy, attributes_for, build, build_many,
	build_with, create, create_many, create_with,
};

// Instances and persistence
pub use crate::instance::BuiltInstance;
pub use crate::persist::{
	MemoryPersister, Persister, clear_default_persister, set_default_persister,
};

// Sequences
pub use crate::sequence::SequenceRegistry;
