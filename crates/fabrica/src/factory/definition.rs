//! Factory definitions.
//!
//! A [`FactoryDefinition`] is the declarative spec for one model type: its
//! ordered default attributes, named traits, optional parent factory, build
//! callbacks, and optional per-factory persister. Definitions are built
//! fluently and handed to the registry once, at suite initialization.

use std::fmt;
use std::sync::Arc;

use crate::error::{FactoryError, FactoryResult};
use crate::instance::BuiltInstance;
use crate::persist::Persister;

use super::spec::AttributeSpec;

/// A callback run against a freshly built (or created) instance.
pub type Callback = Arc<dyn Fn(&mut BuiltInstance) + Send + Sync>;

/// Declarative specification for building one model type.
///
/// # Example
///
/// ```ignore
/// let definition = FactoryDefinition::new("customer", "shop.Customer")
///     .attribute("name", AttributeSpec::faker(FakerKind::Name))
///     .attribute("email", AttributeSpec::sequence("customer{n}@test.com"))
///     .attribute("address", AttributeSpec::association("address"))
///     .trait_def(
///         "vip",
///         TraitSpec::new().attribute("tier", AttributeSpec::constant("gold")),
///     );
/// register_factory(definition)?;
/// ```
#[derive(Clone)]
pub struct FactoryDefinition {
	name: String,
	model: String,
	parent: Option<String>,
	attributes: Vec<(String, AttributeSpec)>,
	traits: Vec<(String, TraitSpec)>,
	after_build: Vec<Callback>,
	after_create: Vec<Callback>,
	persister: Option<Arc<dyn Persister>>,
}

impl FactoryDefinition {
	/// Creates a definition for the named factory and model identifier.
	pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			model: model.into(),
			parent: None,
			attributes: Vec::new(),
			traits: Vec::new(),
			after_build: Vec::new(),
			after_create: Vec::new(),
			persister: None,
		}
	}

	/// Declares a parent factory whose attributes this definition inherits.
	///
	/// Attribute merging walks the parent chain oldest-first; attributes
	/// declared here shadow same-named parent attributes.
	pub fn parent(mut self, name: impl Into<String>) -> Self {
		self.parent = Some(name.into());
		self
	}

	/// Declares an attribute. Declaration order is resolution order.
	pub fn attribute(mut self, name: impl Into<String>, spec: AttributeSpec) -> Self {
		self.attributes.push((name.into(), spec));
		self
	}

	/// Declares a named trait.
	pub fn trait_def(mut self, name: impl Into<String>, spec: TraitSpec) -> Self {
		self.traits.push((name.into(), spec));
		self
	}

	/// Adds a callback run after every build, before the instance is returned.
	pub fn after_build<F>(mut self, callback: F) -> Self
	where
		F: Fn(&mut BuiltInstance) + Send + Sync + 'static,
	{
		self.after_build.push(Arc::new(callback));
		self
	}

	/// Adds a callback run after an instance is persisted on the create path.
	pub fn after_create<F>(mut self, callback: F) -> Self
	where
		F: Fn(&mut BuiltInstance) + Send + Sync + 'static,
	{
		self.after_create.push(Arc::new(callback));
		self
	}

	/// Sets the persister used for this factory's create builds.
	pub fn persister(mut self, persister: Arc<dyn Persister>) -> Self {
		self.persister = Some(persister);
		self
	}

	/// Returns the factory name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the model identifier.
	pub fn model(&self) -> &str {
		&self.model
	}

	/// Returns the parent factory name, if any.
	pub fn parent_name(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	/// Returns the declared attributes in declaration order.
	pub fn attributes(&self) -> &[(String, AttributeSpec)] {
		&self.attributes
	}

	/// Returns the named trait, if declared on this definition.
	pub fn trait_spec(&self, name: &str) -> Option<&TraitSpec> {
		self.traits
			.iter()
			.find(|(trait_name, _)| trait_name == name)
			.map(|(_, spec)| spec)
	}

	/// Returns the declared trait names.
	pub fn trait_names(&self) -> Vec<&str> {
		self.traits.iter().map(|(name, _)| name.as_str()).collect()
	}

	pub(crate) fn after_build_callbacks(&self) -> &[Callback] {
		&self.after_build
	}

	pub(crate) fn after_create_callbacks(&self) -> &[Callback] {
		&self.after_create
	}

	pub(crate) fn persister_ref(&self) -> Option<&Arc<dyn Persister>> {
		self.persister.as_ref()
	}

	pub(crate) fn add_trait(&mut self, name: String, spec: TraitSpec) {
		if let Some(entry) = self
			.traits
			.iter_mut()
			.find(|(trait_name, _)| *trait_name == name)
		{
			entry.1 = spec;
		} else {
			self.traits.push((name, spec));
		}
	}

	/// Checks the definition's invariants: attribute names must be unique
	/// within the definition and within each of its traits.
	pub(crate) fn validate(&self) -> FactoryResult<()> {
		check_unique(&self.name, &self.attributes)?;
		for (_, trait_spec) in &self.traits {
			check_unique(&self.name, &trait_spec.attributes)?;
		}
		Ok(())
	}
}

fn check_unique(factory: &str, attributes: &[(String, AttributeSpec)]) -> FactoryResult<()> {
	for (index, (name, _)) in attributes.iter().enumerate() {
		if attributes[..index].iter().any(|(seen, _)| seen == name) {
			return Err(FactoryError::DuplicateAttribute {
				factory: factory.to_string(),
				attribute: name.clone(),
			});
		}
	}
	Ok(())
}

impl fmt::Debug for FactoryDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryDefinition")
			.field("name", &self.name)
			.field("model", &self.model)
			.field("parent", &self.parent)
			.field("attributes", &self.attributes)
			.field("traits", &self.trait_names())
			.finish()
	}
}

/// A named partial override bundle applied on top of a factory's defaults.
///
/// Traits carry attributes only; they cannot redefine the model type.
#[derive(Clone, Default)]
pub struct TraitSpec {
	attributes: Vec<(String, AttributeSpec)>,
}

impl TraitSpec {
	/// Creates an empty trait.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares an attribute override.
	pub fn attribute(mut self, name: impl Into<String>, spec: AttributeSpec) -> Self {
		self.attributes.push((name.into(), spec));
		self
	}

	/// Returns the trait's attributes in declaration order.
	pub fn attributes(&self) -> &[(String, AttributeSpec)] {
		&self.attributes
	}
}

impl fmt::Debug for TraitSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names: Vec<&str> = self
			.attributes
			.iter()
			.map(|(name, _)| name.as_str())
			.collect();
		f.debug_struct("TraitSpec").field("attributes", &names).finish()
	}
}
