//! The build engine.
//!
//! Orchestrates a build request: fetches the definition, merges the parent
//! chain, traits, and explicit overrides, resolves every remaining attribute
//! in declaration order (recursing into associated factories), assembles the
//! [`BuiltInstance`], and on the create path hands the instance tree to the
//! persistence hook.
//!
//! A build proceeds through `Resolving -> Applying overrides -> (optional)
//! Persisting -> Done`. Resolution errors abort the whole build with no
//! partial instance; persistence errors are reported separately and never
//! touch registry state.

mod request;
mod resolver;

pub use request::{BuildRequest, BuildStrategy, PersistPolicy};

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{FactoryError, FactoryResult};
use crate::factory::definition::FactoryDefinition;
use crate::factory::registry;
use crate::factory::spec::{AssociationSpec, AttributeSpec, Cardinality, OverrideValue};
use crate::instance::BuiltInstance;
use crate::persist;

use resolver::BuildStack;

/// Builds one instance of the named factory with defaults only.
pub fn build(factory: &str) -> FactoryResult<BuiltInstance> {
	build_with(BuildRequest::new(factory))
}

/// Builds one instance per the request, in memory only.
pub fn build_with(request: BuildRequest) -> FactoryResult<BuiltInstance> {
	tracing::debug!(factory = %request.factory, "building instance");
	let mut stack = BuildStack::new();
	build_internal(&request, &mut stack)
}

/// Builds `count` instances of the named factory, in order.
pub fn build_many(factory: &str, count: usize) -> FactoryResult<Vec<BuiltInstance>> {
	let mut instances = Vec::with_capacity(count);
	for _ in 0..count {
		instances.push(build(factory)?);
	}
	Ok(instances)
}

/// Resolves the named factory's non-association attributes without building
/// an instance.
///
/// Associations are skipped entirely, so no nested factories run and no
/// cycle is possible. Explicit overrides still win.
pub fn attributes_for(request: BuildRequest) -> FactoryResult<Map<String, Value>> {
	let definition = registry::lookup(&request.factory)?;
	let chain = parent_chain(&definition)?;
	let merged = merged_attributes(&chain, &request)?;
	let mut stack = BuildStack::new();
	let (attributes, _children) = resolve_all(&definition, &merged, &request, &mut stack, true)?;
	Ok(attributes)
}

/// Builds and persists one instance of the named factory.
pub async fn create(factory: &str) -> FactoryResult<BuiltInstance> {
	create_with(BuildRequest::new(factory)).await
}

/// Builds one instance per the request and persists the instance tree.
///
/// Children persist before their parents, each through its own factory's
/// persister or the global default. No registry locks are held across hook
/// calls. On failure the error carries the instance when the request's
/// policy is [`PersistPolicy::ReturnUnpersisted`].
pub async fn create_with(request: BuildRequest) -> FactoryResult<BuiltInstance> {
	let request = request.with_strategy(BuildStrategy::Create);
	tracing::debug!(factory = %request.factory, "creating instance");
	let mut stack = BuildStack::new();
	let mut instance = build_internal(&request, &mut stack)?;

	match persist_node(&mut instance).await {
		Ok(()) => Ok(instance),
		Err(error) => {
			tracing::warn!(factory = %request.factory, %error, "persistence failed");
			match request.persist_policy {
				PersistPolicy::Atomic => Err(error),
				PersistPolicy::ReturnUnpersisted => Err(error.with_instance(instance)),
			}
		}
	}
}

/// Builds and persists `count` instances of the named factory, in order.
pub async fn create_many(factory: &str, count: usize) -> FactoryResult<Vec<BuiltInstance>> {
	let mut instances = Vec::with_capacity(count);
	for _ in 0..count {
		instances.push(create(factory).await?);
	}
	Ok(instances)
}

fn build_internal(request: &BuildRequest, stack: &mut BuildStack) -> FactoryResult<BuiltInstance> {
	let definition = registry::lookup(&request.factory)?;
	stack.enter(&request.factory)?;
	let result = assemble(&definition, request, stack);
	stack.leave(&request.factory);
	result
}

fn assemble(
	definition: &Arc<FactoryDefinition>,
	request: &BuildRequest,
	stack: &mut BuildStack,
) -> FactoryResult<BuiltInstance> {
	let chain = parent_chain(definition)?;
	let merged = merged_attributes(&chain, request)?;
	let (attributes, children) = resolve_all(definition, &merged, request, stack, false)?;

	let mut instance =
		BuiltInstance::new(definition.name(), definition.model(), attributes, children);
	for callback in definition.after_build_callbacks() {
		callback(&mut instance);
	}
	tracing::trace!(factory = %definition.name(), "assembled instance");
	Ok(instance)
}

/// Collects the definition and its ancestors, child first.
fn parent_chain(definition: &Arc<FactoryDefinition>) -> FactoryResult<Vec<Arc<FactoryDefinition>>> {
	let mut chain = vec![definition.clone()];
	let mut seen: HashSet<String> = HashSet::from([definition.name().to_string()]);
	let mut current = definition.clone();

	while let Some(parent_name) = current.parent_name() {
		let parent = registry::lookup(parent_name)?;
		if !seen.insert(parent.name().to_string()) {
			let mut path: Vec<&str> = chain.iter().map(|def| def.name()).collect();
			path.push(parent_name);
			return Err(FactoryError::CyclicInheritance {
				path: path.join(" -> "),
			});
		}
		chain.push(parent.clone());
		current = parent;
	}
	Ok(chain)
}

/// Merges attribute specs: parent chain oldest first, then the base
/// definition, then each requested trait in order. Same-named attributes are
/// replaced in place, keeping their original position.
fn merged_attributes(
	chain: &[Arc<FactoryDefinition>],
	request: &BuildRequest,
) -> FactoryResult<Vec<(String, AttributeSpec)>> {
	let mut merged: Vec<(String, AttributeSpec)> = Vec::new();
	for definition in chain.iter().rev() {
		for (name, spec) in definition.attributes() {
			upsert(&mut merged, name, spec.clone());
		}
	}

	for trait_name in &request.traits {
		let trait_spec = chain
			.iter()
			.find_map(|definition| definition.trait_spec(trait_name))
			.ok_or_else(|| FactoryError::UnknownTrait {
				factory: request.factory.clone(),
				trait_name: trait_name.clone(),
			})?;
		for (name, spec) in trait_spec.attributes() {
			upsert(&mut merged, name, spec.clone());
		}
	}
	Ok(merged)
}

fn upsert(merged: &mut Vec<(String, AttributeSpec)>, name: &str, spec: AttributeSpec) {
	if let Some(entry) = merged.iter_mut().find(|(existing, _)| existing == name) {
		entry.1 = spec;
	} else {
		merged.push((name.to_string(), spec));
	}
}

/// Resolves the merged attributes in declaration order.
///
/// Explicit overrides seed the resolved map up front, bypassing resolution
/// for their keys; every resolved attribute becomes visible to later
/// association sibling references in the same pass.
fn resolve_all(
	definition: &Arc<FactoryDefinition>,
	merged: &[(String, AttributeSpec)],
	request: &BuildRequest,
	stack: &mut BuildStack,
	skip_associations: bool,
) -> FactoryResult<(Map<String, Value>, Vec<BuiltInstance>)> {
	let mut resolved = request.overrides.clone();
	let mut children = Vec::new();

	for (name, spec) in merged {
		if request.overrides.contains_key(name) {
			continue;
		}
		let value = match spec {
			AttributeSpec::Association(_) if skip_associations => continue,
			AttributeSpec::Association(assoc) => resolve_association(
				definition.name(),
				name,
				assoc,
				&resolved,
				request,
				stack,
				&mut children,
			)?,
			other => resolver::resolve_value(definition.name(), name, other),
		};
		resolved.insert(name.clone(), value);
	}
	Ok((resolved, children))
}

/// Resolves an association attribute by recursively building its factory.
fn resolve_association(
	parent_factory: &str,
	attribute: &str,
	assoc: &AssociationSpec,
	resolved: &Map<String, Value>,
	request: &BuildRequest,
	stack: &mut BuildStack,
	children: &mut Vec<BuiltInstance>,
) -> FactoryResult<Value> {
	let mut child_request =
		BuildRequest::new(&assoc.factory).with_strategy(request.strategy);
	for trait_name in &assoc.traits {
		child_request = child_request.with_trait(trait_name.clone());
	}
	for (name, override_value) in &assoc.overrides {
		let value = match override_value {
			OverrideValue::Literal(value) => value.clone(),
			OverrideValue::Sibling(sibling) => resolved
				.get(sibling)
				.cloned()
				.ok_or_else(|| FactoryError::DependencyOrder {
					factory: parent_factory.to_string(),
					attribute: attribute.to_string(),
					needs: sibling.clone(),
				})?,
		};
		child_request = child_request.with_override(name.clone(), value);
	}

	match assoc.cardinality {
		Cardinality::One => {
			let instance = build_internal(&child_request, stack)?;
			let value = instance.value();
			children.push(instance);
			Ok(value)
		}
		Cardinality::Many(count) => {
			let mut values = Vec::with_capacity(count);
			for _ in 0..count {
				let instance = build_internal(&child_request, stack)?;
				values.push(instance.value());
				children.push(instance);
			}
			Ok(Value::Array(values))
		}
	}
}

/// Persists an instance tree post-order: children first, then the node
/// itself, through the node factory's persister or the global default.
fn persist_node(
	instance: &mut BuiltInstance,
) -> Pin<Box<dyn Future<Output = FactoryResult<()>> + Send + '_>> {
	Box::pin(async move {
		for child in instance.children_mut() {
			persist_node(child).await?;
		}

		let definition = registry::lookup(instance.factory())?;
		let persister = definition
			.persister_ref()
			.cloned()
			.or_else(persist::default_persister)
			.ok_or_else(|| FactoryError::NoPersister(instance.factory().to_string()))?;

		let pk = persister.persist(instance).await?;
		instance.mark_persisted(pk);
		for callback in definition.after_create_callbacks() {
			callback(instance);
		}
		Ok(())
	})
}

/// Build engine handle for scoped operations.
#[derive(Debug, Default)]
pub struct BuildEngine;

impl BuildEngine {
	/// Creates a new engine handle.
	pub fn new() -> Self {
		Self
	}

	/// Builds one instance of the named factory with defaults only.
	pub fn build(&self, factory: &str) -> FactoryResult<BuiltInstance> {
		build(factory)
	}

	/// Builds one instance per the request, in memory only.
	pub fn build_with(&self, request: BuildRequest) -> FactoryResult<BuiltInstance> {
		build_with(request)
	}

	/// Builds `count` instances of the named factory, in order.
	pub fn build_many(&self, factory: &str, count: usize) -> FactoryResult<Vec<BuiltInstance>> {
		build_many(factory, count)
	}

	/// Resolves non-association attributes without building an instance.
	pub fn attributes_for(&self, request: BuildRequest) -> FactoryResult<Map<String, Value>> {
		attributes_for(request)
	}

	/// Builds and persists one instance of the named factory.
	pub async fn create(&self, factory: &str) -> FactoryResult<BuiltInstance> {
		create(factory).await
	}

	/// Builds one instance per the request and persists the instance tree.
	pub async fn create_with(&self, request: BuildRequest) -> FactoryResult<BuiltInstance> {
		create_with(request).await
	}

	/// Builds and persists `count` instances of the named factory.
	pub async fn create_many(
		&self,
		factory: &str,
		count: usize,
	) -> FactoryResult<Vec<BuiltInstance>> {
		create_many(factory, count).await
	}
}
