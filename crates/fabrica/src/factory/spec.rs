//! Attribute specifications.
//!
//! Every attribute of a factory definition is one tagged [`AttributeSpec`]
//! variant. Resolution is interpreted from the variant, which keeps it total:
//! constants clone, counter-backed variants advance their sequence exactly
//! once, faker variants sample random data, and associations recurse into the
//! build engine.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::faker::FakerKind;

/// A generator function mapping a counter value to an attribute value.
pub type GeneratorFn = Arc<dyn Fn(u64) -> Value + Send + Sync>;

/// Specification for a single attribute of a factory definition.
#[derive(Clone)]
pub enum AttributeSpec {
	/// A fixed value, cloned into every build.
	Constant(Value),

	/// A function of the running per-(factory, attribute) counter value.
	Generator(GeneratorFn),

	/// A counter-backed sequence value.
	Sequence(SequenceSpec),

	/// Random fake data, drawn fresh on every build.
	Faker(FakerKind),

	/// A value built by another factory.
	Association(AssociationSpec),
}

impl AttributeSpec {
	/// A fixed value.
	pub fn constant(value: impl Into<Value>) -> Self {
		Self::Constant(value.into())
	}

	/// A function of the attribute's counter value.
	///
	/// # Example
	///
	/// ```ignore
	/// AttributeSpec::generator(|n| Value::from(n * 100))
	/// ```
	pub fn generator<F>(generate: F) -> Self
	where
		F: Fn(u64) -> Value + Send + Sync + 'static,
	{
		Self::Generator(Arc::new(generate))
	}

	/// A sequence pattern with a `{n}` placeholder.
	///
	/// # Example
	///
	/// ```ignore
	/// AttributeSpec::sequence("user{n}@test.com")
	/// ```
	pub fn sequence(pattern: impl Into<String>) -> Self {
		Self::Sequence(SequenceSpec::pattern(pattern))
	}

	/// A fully-specified sequence.
	pub fn sequence_spec(spec: SequenceSpec) -> Self {
		Self::Sequence(spec)
	}

	/// Random fake data of the given kind.
	pub fn faker(kind: FakerKind) -> Self {
		Self::Faker(kind)
	}

	/// A singular association built by the named factory.
	pub fn association(factory: impl Into<String>) -> Self {
		Self::Association(AssociationSpec::new(factory))
	}

	/// A fully-specified association.
	pub fn association_spec(spec: AssociationSpec) -> Self {
		Self::Association(spec)
	}

	/// Returns true for association variants.
	pub fn is_association(&self) -> bool {
		matches!(self, Self::Association(_))
	}
}

impl fmt::Debug for AttributeSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
			Self::Generator(_) => f.write_str("Generator(..)"),
			Self::Sequence(spec) => f.debug_tuple("Sequence").field(spec).finish(),
			Self::Faker(kind) => f.debug_tuple("Faker").field(kind).finish(),
			Self::Association(spec) => f.debug_tuple("Association").field(spec).finish(),
		}
	}
}

/// Specification for a counter-backed sequence attribute.
///
/// The counter starts at the seed (default 1) and advances by one per
/// resolution. The value is either an interpreted pattern, where every `{n}`
/// is replaced by the counter value, or an arbitrary mapping function.
#[derive(Clone)]
pub struct SequenceSpec {
	kind: SequenceKind,
	seed: u64,
}

#[derive(Clone)]
enum SequenceKind {
	Pattern(String),
	Mapped(GeneratorFn),
}

impl SequenceSpec {
	/// A pattern sequence: `"user{n}@test.com"` yields `user1@test.com`,
	/// `user2@test.com`, ...
	pub fn pattern(pattern: impl Into<String>) -> Self {
		Self {
			kind: SequenceKind::Pattern(pattern.into()),
			seed: crate::sequence::DEFAULT_SEED,
		}
	}

	/// A mapped sequence: an arbitrary function of the counter value.
	pub fn mapped<F>(map: F) -> Self
	where
		F: Fn(u64) -> Value + Send + Sync + 'static,
	{
		Self {
			kind: SequenceKind::Mapped(Arc::new(map)),
			seed: crate::sequence::DEFAULT_SEED,
		}
	}

	/// Sets the counter's starting value.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	/// Returns the counter's starting value.
	pub fn seed(&self) -> u64 {
		self.seed
	}

	pub(crate) fn value_for(&self, n: u64) -> Value {
		match &self.kind {
			SequenceKind::Pattern(pattern) => {
				Value::String(pattern.replace("{n}", &n.to_string()))
			}
			SequenceKind::Mapped(map) => map(n),
		}
	}
}

impl fmt::Debug for SequenceSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			SequenceKind::Pattern(pattern) => f
				.debug_struct("SequenceSpec")
				.field("pattern", pattern)
				.field("seed", &self.seed)
				.finish(),
			SequenceKind::Mapped(_) => f
				.debug_struct("SequenceSpec")
				.field("mapped", &"..")
				.field("seed", &self.seed)
				.finish(),
		}
	}
}

/// Whether an association produces one instance or an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
	/// A single associated instance, embedded as an object.
	One,
	/// An ordered list of the given length, embedded as an array.
	Many(usize),
}

/// An override applied to an association's nested build.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
	/// A literal value.
	Literal(Value),
	/// The resolved value of a sibling attribute of the parent build.
	///
	/// The sibling must be declared (or overridden) before the association;
	/// otherwise the build fails with a dependency-order error.
	Sibling(String),
}

/// Specification for an association attribute.
#[derive(Debug, Clone)]
pub struct AssociationSpec {
	pub(crate) factory: String,
	pub(crate) traits: Vec<String>,
	pub(crate) overrides: Vec<(String, OverrideValue)>,
	pub(crate) cardinality: Cardinality,
}

impl AssociationSpec {
	/// A singular association built by the named factory.
	pub fn new(factory: impl Into<String>) -> Self {
		Self {
			factory: factory.into(),
			traits: Vec::new(),
			overrides: Vec::new(),
			cardinality: Cardinality::One,
		}
	}

	/// Applies a named trait to the nested build.
	pub fn with_trait(mut self, name: impl Into<String>) -> Self {
		self.traits.push(name.into());
		self
	}

	/// Overrides a nested attribute with a literal value.
	pub fn with_override(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
		self.overrides
			.push((attribute.into(), OverrideValue::Literal(value.into())));
		self
	}

	/// Overrides a nested attribute with a sibling attribute's resolved value.
	pub fn with_sibling(
		mut self,
		attribute: impl Into<String>,
		sibling: impl Into<String>,
	) -> Self {
		self.overrides
			.push((attribute.into(), OverrideValue::Sibling(sibling.into())));
		self
	}

	/// Makes the association list-valued with the given count.
	pub fn many(mut self, count: usize) -> Self {
		self.cardinality = Cardinality::Many(count);
		self
	}

	/// Returns the target factory name.
	pub fn factory(&self) -> &str {
		&self.factory
	}

	/// Returns the cardinality.
	pub fn cardinality(&self) -> Cardinality {
		self.cardinality
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_sequence_pattern_interpolation() {
		let spec = SequenceSpec::pattern("user{n}@test.com");
		assert_eq!(spec.value_for(1), json!("user1@test.com"));
		assert_eq!(spec.value_for(42), json!("user42@test.com"));
	}

	#[rstest]
	fn test_sequence_pattern_without_placeholder() {
		let spec = SequenceSpec::pattern("static");
		assert_eq!(spec.value_for(9), json!("static"));
	}

	#[rstest]
	fn test_sequence_mapped() {
		let spec = SequenceSpec::mapped(|n| Value::from(n * 10));
		assert_eq!(spec.value_for(3), json!(30));
	}

	#[rstest]
	fn test_sequence_seed_default_and_override() {
		assert_eq!(SequenceSpec::pattern("x{n}").seed(), 1);
		assert_eq!(SequenceSpec::pattern("x{n}").with_seed(100).seed(), 100);
	}

	#[rstest]
	fn test_association_builder() {
		let spec = AssociationSpec::new("comment")
			.with_trait("approved")
			.with_override("body", "hi")
			.with_sibling("article_id", "id")
			.many(3);

		assert_eq!(spec.factory(), "comment");
		assert_eq!(spec.traits, vec!["approved".to_string()]);
		assert_eq!(spec.cardinality(), Cardinality::Many(3));
		assert_eq!(
			spec.overrides[1],
			(
				"article_id".to_string(),
				OverrideValue::Sibling("id".to_string())
			)
		);
	}

	#[rstest]
	fn test_attribute_spec_debug_hides_closures() {
		let spec = AttributeSpec::generator(|n| Value::from(n));
		assert_eq!(format!("{:?}", spec), "Generator(..)");
	}
}
