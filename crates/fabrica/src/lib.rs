//! Test-data factories for Rust test suites.
//!
//! `fabrica` builds fully- or partially-populated model instances from
//! declarative factory definitions, in the manner of Factory Boy:
//!
//! - **Factories**: named, registered definitions with ordered default
//!   attributes
//! - **Sequences**: per-attribute monotonic counters for unique values
//! - **Traits**: named partial overrides stacked on top of the defaults
//! - **Associations**: attributes built by other factories, nested graphs
//!   included
//! - **Create strategy**: hand the built tree to an injectable persistence
//!   hook
//!
//! # Quick Start
//!
//! Register factories once, at suite initialization:
//!
//! ```ignore
//! use fabrica::prelude::*;
//!
//! register_factory(
//!     FactoryDefinition::new("address", "shop.Address")
//!         .attribute("street", AttributeSpec::faker(FakerKind::StreetName))
//!         .attribute("city", AttributeSpec::faker(FakerKind::CityName)),
//! )?;
//!
//! register_factory(
//!     FactoryDefinition::new("customer", "shop.Customer")
//!         .attribute("name", AttributeSpec::faker(FakerKind::Name))
//!         .attribute("email", AttributeSpec::sequence("customer{n}@test.com"))
//!         .attribute("address", AttributeSpec::association("address"))
//!         .trait_def(
//!             "vip",
//!             TraitSpec::new().attribute("tier", AttributeSpec::constant("gold")),
//!         ),
//! )?;
//! ```
//!
//! Build instances per test:
//!
//! ```ignore
//! let customer = fabrica::build("customer")?;                 // defaults
//! let vip = fabrica::build_with(
//!     BuildRequest::new("customer")
//!         .with_trait("vip")
//!         .with_override("name", "Ada"),
//! )?;
//! let saved = fabrica::create("customer").await?;             // persisted
//! let batch = fabrica::build_many("customer", 10)?;
//! ```
//!
//! Overrides always win over traits, and traits over defaults; sequence
//! counters survive across builds until [`sequence::reset_all`] is called
//! between test cases.
//!
//! # Architecture
//!
//! - [`FactoryDefinition`](factory::FactoryDefinition) and
//!   [`TraitSpec`](factory::TraitSpec) - declarative specs, registered in the
//!   process-wide [`factory::registry`]
//! - [`AttributeSpec`](factory::AttributeSpec) - tagged attribute variants
//!   (constant, generator, sequence, faker, association)
//! - [`sequence`] - process-wide monotonic counters
//! - [`engine`] - merge, resolution, assembly, and persistence orchestration
//! - [`BuiltInstance`](instance::BuiltInstance) - the build result, with
//!   transitively created association instances for cleanup bookkeeping
//! - [`Persister`](persist::Persister) - the injectable persistence
//!   capability used by create builds

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod engine;
pub mod error;
pub mod factory;
pub mod instance;
pub mod persist;
pub mod prelude;
pub mod sequence;

// Re-export commonly used items at crate root
pub use engine::{
	BuildEngine, BuildRequest, BuildStrategy, PersistPolicy, attributes_for, build, build_many,
	build_with, create, create_many, create_with,
};
pub use error::{ErrorKind, FactoryError, FactoryResult};
pub use factory::{
	AssociationSpec, AttributeSpec, FactoryDefinition, FactoryRegistry, FakerKind, TraitSpec,
	register_factory, register_trait, replace_factory,
};
pub use instance::BuiltInstance;
pub use persist::{MemoryPersister, Persister, set_default_persister};
pub use sequence::SequenceRegistry;
