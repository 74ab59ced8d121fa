//! Process-wide factory registry.
//!
//! Definitions are registered once at suite initialization and looked up per
//! build. The registry is read-mostly after setup; registration of an
//! existing name is first-writer-wins, with the loser receiving a duplicate
//! error. Cyclic parent chains are rejected at registration time.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{FactoryError, FactoryResult};

use super::definition::{FactoryDefinition, TraitSpec};

/// Global factory registry.
static FACTORIES: Lazy<RwLock<HashMap<String, Arc<FactoryDefinition>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers a factory definition.
///
/// # Errors
///
/// Returns `DuplicateFactory` if the name is already registered (use
/// [`replace_factory`] for an explicit override), `DuplicateAttribute` if the
/// definition repeats an attribute name, and `CyclicInheritance` if the
/// parent chain loops back on itself.
pub fn register_factory(definition: FactoryDefinition) -> FactoryResult<()> {
	definition.validate()?;
	check_parent_chain(&definition)?;
	let name = definition.name().to_string();
	let mut factories = FACTORIES.write();
	if factories.contains_key(&name) {
		return Err(FactoryError::DuplicateFactory(name));
	}
	factories.insert(name.clone(), Arc::new(definition));
	tracing::debug!(factory = %name, "registered factory");
	Ok(())
}

/// Registers a factory definition, replacing any existing registration.
pub fn replace_factory(definition: FactoryDefinition) -> FactoryResult<()> {
	definition.validate()?;
	check_parent_chain(&definition)?;
	let name = definition.name().to_string();
	FACTORIES.write().insert(name.clone(), Arc::new(definition));
	tracing::debug!(factory = %name, "replaced factory");
	Ok(())
}

/// Attaches a named trait to an already-registered factory.
///
/// A trait with the same name replaces the previous one.
pub fn register_trait(
	factory: &str,
	name: impl Into<String>,
	spec: TraitSpec,
) -> FactoryResult<()> {
	let mut factories = FACTORIES.write();
	let entry = factories
		.get(factory)
		.ok_or_else(|| FactoryError::UnknownFactory(factory.to_string()))?;
	let mut definition = (**entry).clone();
	definition.add_trait(name.into(), spec);
	definition.validate()?;
	factories.insert(factory.to_string(), Arc::new(definition));
	Ok(())
}

/// Looks up a factory definition.
///
/// # Errors
///
/// Returns `UnknownFactory` if no definition is registered under the name.
pub fn lookup(name: &str) -> FactoryResult<Arc<FactoryDefinition>> {
	get_factory(name).ok_or_else(|| FactoryError::UnknownFactory(name.to_string()))
}

/// Gets a factory definition, if registered.
pub fn get_factory(name: &str) -> Option<Arc<FactoryDefinition>> {
	FACTORIES.read().get(name).cloned()
}

/// Checks if a factory is registered.
pub fn has_factory(name: &str) -> bool {
	FACTORIES.read().contains_key(name)
}

/// Returns all registered factory names.
pub fn factory_names() -> Vec<String> {
	FACTORIES.read().keys().cloned().collect()
}

/// Returns the number of registered factories.
pub fn factory_count() -> usize {
	FACTORIES.read().len()
}

/// Clears all registered factories.
///
/// This is primarily useful for testing.
pub fn clear_factories() {
	FACTORIES.write().clear();
}

/// Walks the parent chain of a definition being registered and fails on a
/// cycle. Parents that are not registered yet terminate the walk; the cycle
/// they might close is detected when its last edge is registered.
fn check_parent_chain(definition: &FactoryDefinition) -> FactoryResult<()> {
	let mut path = vec![definition.name().to_string()];
	let mut next = definition.parent_name().map(str::to_string);

	while let Some(current) = next {
		if path.contains(&current) {
			path.push(current);
			return Err(FactoryError::CyclicInheritance {
				path: path.join(" -> "),
			});
		}
		let parent = match get_factory(&current) {
			Some(parent) => parent,
			None => break,
		};
		path.push(current);
		next = parent.parent_name().map(str::to_string);
	}
	Ok(())
}

/// Factory registry handle for scoped operations.
#[derive(Debug, Default)]
pub struct FactoryRegistry;

impl FactoryRegistry {
	/// Creates a new registry handle.
	pub fn new() -> Self {
		Self
	}

	/// Registers a factory definition.
	pub fn register(&self, definition: FactoryDefinition) -> FactoryResult<()> {
		register_factory(definition)
	}

	/// Registers a definition, replacing any existing registration.
	pub fn replace(&self, definition: FactoryDefinition) -> FactoryResult<()> {
		replace_factory(definition)
	}

	/// Attaches a named trait to a registered factory.
	pub fn register_trait(
		&self,
		factory: &str,
		name: impl Into<String>,
		spec: TraitSpec,
	) -> FactoryResult<()> {
		register_trait(factory, name, spec)
	}

	/// Looks up a factory definition.
	pub fn lookup(&self, name: &str) -> FactoryResult<Arc<FactoryDefinition>> {
		lookup(name)
	}

	/// Gets a factory definition, if registered.
	pub fn get(&self, name: &str) -> Option<Arc<FactoryDefinition>> {
		get_factory(name)
	}

	/// Checks if a factory is registered.
	pub fn has(&self, name: &str) -> bool {
		has_factory(name)
	}

	/// Returns all registered factory names.
	pub fn names(&self) -> Vec<String> {
		factory_names()
	}

	/// Returns the number of registered factories.
	pub fn len(&self) -> usize {
		factory_count()
	}

	/// Returns true if no factories are registered.
	pub fn is_empty(&self) -> bool {
		factory_count() == 0
	}

	/// Clears all registered factories (primarily for testing).
	pub fn clear(&self) {
		clear_factories()
	}
}
