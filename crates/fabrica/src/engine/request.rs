//! Build requests.

use serde_json::{Map, Value};

/// Whether a build only constructs an in-memory instance or also persists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStrategy {
	/// Construct an in-memory instance only.
	#[default]
	Build,
	/// Construct the instance and hand the tree to the persistence hook.
	Create,
}

/// What a create build does with the instance when persistence fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistPolicy {
	/// Surface the error and return no instance.
	#[default]
	Atomic,
	/// Surface the error with the built instance attached, so callers can
	/// still reach (and clean up) a partially persisted graph.
	ReturnUnpersisted,
}

/// A request to build one instance of a named factory.
///
/// Traits apply in request order: later traits override earlier ones and the
/// base defaults. Explicit overrides have the highest precedence and bypass
/// attribute resolution entirely.
///
/// # Example
///
/// ```ignore
/// let request = BuildRequest::new("article")
///     .with_trait("published")
///     .with_override("title", "Hi");
/// let article = fabrica::build_with(request)?;
/// ```
#[derive(Debug, Clone)]
pub struct BuildRequest {
	pub(crate) factory: String,
	pub(crate) traits: Vec<String>,
	pub(crate) overrides: Map<String, Value>,
	pub(crate) strategy: BuildStrategy,
	pub(crate) persist_policy: PersistPolicy,
}

impl BuildRequest {
	/// Creates a request for the named factory with no traits or overrides.
	pub fn new(factory: impl Into<String>) -> Self {
		Self {
			factory: factory.into(),
			traits: Vec::new(),
			overrides: Map::new(),
			strategy: BuildStrategy::default(),
			persist_policy: PersistPolicy::default(),
		}
	}

	/// Appends a trait to apply.
	pub fn with_trait(mut self, name: impl Into<String>) -> Self {
		self.traits.push(name.into());
		self
	}

	/// Appends several traits, in order.
	pub fn with_traits<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.traits.extend(names.into_iter().map(Into::into));
		self
	}

	/// Overrides an attribute with an explicit value.
	pub fn with_override(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
		self.overrides.insert(attribute.into(), value.into());
		self
	}

	/// Merges a map of attribute overrides.
	pub fn with_overrides(mut self, overrides: Map<String, Value>) -> Self {
		self.overrides.extend(overrides);
		self
	}

	/// Sets the build strategy.
	pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
		self.strategy = strategy;
		self
	}

	/// Sets the persistence failure policy for create builds.
	pub fn with_persist_policy(mut self, policy: PersistPolicy) -> Self {
		self.persist_policy = policy;
		self
	}

	/// Returns the factory name.
	pub fn factory(&self) -> &str {
		&self.factory
	}

	/// Returns the traits to apply, in order.
	pub fn traits(&self) -> &[String] {
		&self.traits
	}

	/// Returns the explicit overrides.
	pub fn overrides(&self) -> &Map<String, Value> {
		&self.overrides
	}

	/// Returns the build strategy.
	pub fn strategy(&self) -> BuildStrategy {
		self.strategy
	}

	/// Returns the persistence failure policy.
	pub fn persist_policy(&self) -> PersistPolicy {
		self.persist_policy
	}
}
