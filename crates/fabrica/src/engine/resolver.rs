//! Attribute resolution and build-stack cycle detection.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{FactoryError, FactoryResult};
use crate::factory::spec::AttributeSpec;
use crate::sequence;

/// Maximum association nesting depth for one build.
pub(crate) const MAX_BUILD_DEPTH: usize = 32;

/// Tracks the factories active in the current build, detecting circular
/// associations in O(1) and reporting the cycle path in build order.
pub(crate) struct BuildStack {
	active: HashSet<String>,
	path: Vec<String>,
}

impl BuildStack {
	pub(crate) fn new() -> Self {
		Self {
			active: HashSet::new(),
			path: Vec::new(),
		}
	}

	/// Pushes a factory onto the stack.
	///
	/// Fails with `CircularAssociation` if the factory is already being
	/// built, or `DepthExceeded` past [`MAX_BUILD_DEPTH`].
	pub(crate) fn enter(&mut self, factory: &str) -> FactoryResult<()> {
		if self.path.len() >= MAX_BUILD_DEPTH {
			return Err(FactoryError::DepthExceeded(MAX_BUILD_DEPTH));
		}
		if self.active.contains(factory) {
			return Err(FactoryError::CircularAssociation {
				path: self.cycle_path(factory),
			});
		}
		self.active.insert(factory.to_string());
		self.path.push(factory.to_string());
		Ok(())
	}

	/// Pops a factory off the stack.
	pub(crate) fn leave(&mut self, factory: &str) {
		self.active.remove(factory);
		if let Some(position) = self.path.iter().rposition(|name| name == factory) {
			self.path.remove(position);
		}
	}

	/// Formats the cycle as "article -> author -> article", starting at the
	/// first occurrence of the repeated factory.
	fn cycle_path(&self, factory: &str) -> String {
		let start = self
			.path
			.iter()
			.position(|name| name == factory)
			.unwrap_or(0);
		let mut names: Vec<&str> = self.path[start..].iter().map(String::as_str).collect();
		names.push(factory);
		names.join(" -> ")
	}
}

/// Resolves a non-association attribute to a concrete value.
///
/// Counter-backed variants advance the (factory, attribute) sequence exactly
/// once; constants and faker variants have no counter side effect.
pub(crate) fn resolve_value(factory: &str, attribute: &str, spec: &AttributeSpec) -> Value {
	match spec {
		AttributeSpec::Constant(value) => value.clone(),
		AttributeSpec::Generator(generate) => generate(sequence::next(factory, attribute)),
		AttributeSpec::Sequence(seq) => {
			seq.value_for(sequence::next_with_seed(factory, attribute, seq.seed()))
		}
		AttributeSpec::Faker(kind) => kind.generate(),
		AttributeSpec::Association(_) => {
			unreachable!("associations are resolved by the build engine")
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_enter_detects_direct_cycle() {
		let mut stack = BuildStack::new();
		stack.enter("article").unwrap();

		let result = stack.enter("article");
		assert!(matches!(
			result,
			Err(FactoryError::CircularAssociation { path }) if path == "article -> article"
		));
	}

	#[rstest]
	fn test_cycle_path_spans_intermediate_factories() {
		let mut stack = BuildStack::new();
		stack.enter("article").unwrap();
		stack.enter("author").unwrap();

		let result = stack.enter("article");
		assert!(matches!(
			result,
			Err(FactoryError::CircularAssociation { path }) if path == "article -> author -> article"
		));
	}

	#[rstest]
	fn test_leave_allows_reentry() {
		let mut stack = BuildStack::new();
		stack.enter("article").unwrap();
		stack.leave("article");
		assert!(stack.enter("article").is_ok());
	}

	#[rstest]
	fn test_depth_cap() {
		let mut stack = BuildStack::new();
		for index in 0..MAX_BUILD_DEPTH {
			stack.enter(&format!("factory_{index}")).unwrap();
		}

		let result = stack.enter("one_more");
		assert!(matches!(result, Err(FactoryError::DepthExceeded(_))));
	}

	#[rstest]
	fn test_resolve_constant_ignores_counters() {
		let spec = AttributeSpec::constant("fixed");
		assert_eq!(resolve_value("res_unit.const", "name", &spec), json!("fixed"));
		assert_eq!(resolve_value("res_unit.const", "name", &spec), json!("fixed"));
	}

	#[rstest]
	fn test_resolve_sequence_advances_counter() {
		let spec = AttributeSpec::sequence("user{n}@test.com");
		assert_eq!(
			resolve_value("res_unit.seq", "email", &spec),
			json!("user1@test.com")
		);
		assert_eq!(
			resolve_value("res_unit.seq", "email", &spec),
			json!("user2@test.com")
		);
	}

	#[rstest]
	fn test_resolve_generator_receives_counter() {
		let spec = AttributeSpec::generator(|n| json!(n * 100));
		assert_eq!(resolve_value("res_unit.generated", "code", &spec), json!(100));
		assert_eq!(resolve_value("res_unit.generated", "code", &spec), json!(200));
	}
}
