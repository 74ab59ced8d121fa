//! Built instance representation.
//!
//! A build produces a [`BuiltInstance`]: the resolved attribute values as a
//! JSON object, plus the association instances the build created along the
//! way. Typed models are obtained through [`BuiltInstance::to_model`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{FactoryError, FactoryResult};

/// The result of building a factory.
///
/// Holds the resolved attributes and the association instances this build
/// directly created (its children). Children of children are reachable via
/// [`transitive`](Self::transitive), which callers use for cleanup
/// bookkeeping after persisted builds.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltInstance {
	factory: String,
	model: String,
	attributes: Map<String, Value>,
	children: Vec<BuiltInstance>,
	persisted: bool,
	pk: Option<Value>,
}

impl BuiltInstance {
	pub(crate) fn new(
		factory: impl Into<String>,
		model: impl Into<String>,
		attributes: Map<String, Value>,
		children: Vec<BuiltInstance>,
	) -> Self {
		Self {
			factory: factory.into(),
			model: model.into(),
			attributes,
			children,
			persisted: false,
			pk: None,
		}
	}

	/// Returns the name of the factory that built this instance.
	pub fn factory(&self) -> &str {
		&self.factory
	}

	/// Returns the model identifier (e.g., "shop.Customer").
	pub fn model(&self) -> &str {
		&self.model
	}

	/// Returns the resolved attribute map.
	pub fn attributes(&self) -> &Map<String, Value> {
		&self.attributes
	}

	/// Returns a single attribute value by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Sets an attribute value.
	///
	/// Intended for `after_build` / `after_create` callbacks that patch the
	/// instance before it is handed back to the caller.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.attributes.insert(name.into(), value.into());
	}

	/// Returns the instance as a JSON object value.
	pub fn value(&self) -> Value {
		Value::Object(self.attributes.clone())
	}

	/// Deserializes the instance into a typed model.
	///
	/// # Example
	///
	/// ```ignore
	/// let customer: Customer = fabrica::build("customer")?.to_model()?;
	/// ```
	pub fn to_model<T: DeserializeOwned>(&self) -> FactoryResult<T> {
		serde_json::from_value(self.value()).map_err(|err| FactoryError::Hydration {
			model: self.model.clone(),
			message: err.to_string(),
		})
	}

	/// Returns the association instances this build directly created.
	pub fn children(&self) -> &[BuiltInstance] {
		&self.children
	}

	pub(crate) fn children_mut(&mut self) -> &mut [BuiltInstance] {
		&mut self.children
	}

	/// Returns every association instance this build transitively created,
	/// depth-first, children before their own descendants.
	pub fn transitive(&self) -> Vec<&BuiltInstance> {
		let mut collected = Vec::new();
		for child in &self.children {
			collected.push(child);
			collected.extend(child.transitive());
		}
		collected
	}

	/// Returns true once the instance has been handed to a persister.
	pub fn persisted(&self) -> bool {
		self.persisted
	}

	/// Returns the primary key the persister reported, if any.
	pub fn pk(&self) -> Option<&Value> {
		self.pk.as_ref()
	}

	pub(crate) fn mark_persisted(&mut self, pk: Value) {
		self.persisted = true;
		self.pk = Some(pk);
	}
}
