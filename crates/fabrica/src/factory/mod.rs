//! Factory definitions, attribute specs, and the process-wide registry.

pub mod definition;
pub mod faker;
pub mod registry;
pub mod spec;

pub use definition::{Callback, FactoryDefinition, TraitSpec};
pub use faker::FakerKind;
pub use registry::{
	FactoryRegistry, clear_factories, factory_count, factory_names, get_factory, has_factory,
	lookup, register_factory, register_trait, replace_factory,
};
pub use spec::{
	AssociationSpec, AttributeSpec, Cardinality, GeneratorFn, OverrideValue, SequenceSpec,
};
