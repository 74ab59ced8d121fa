//! Process-wide sequence counters.
//!
//! Sequence-backed attributes draw from a monotonic counter keyed by
//! (factory, attribute). Counters live for the lifetime of the process and
//! are reset only by explicit harness action, typically between test cases.
//! Increments are atomic: concurrent builds of the same factory never observe
//! duplicate or skipped values.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Default starting value for a counter without an explicit seed.
pub const DEFAULT_SEED: u64 = 1;

struct Counter {
	value: AtomicU64,
	seed: u64,
}

impl Counter {
	fn new(seed: u64) -> Self {
		Self {
			value: AtomicU64::new(seed),
			seed,
		}
	}
}

/// Global counter map keyed by (factory name, attribute name).
static COUNTERS: Lazy<RwLock<HashMap<(String, String), Arc<Counter>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the next value for the counter, creating it at [`DEFAULT_SEED`].
pub fn next(factory: &str, attribute: &str) -> u64 {
	next_with_seed(factory, attribute, DEFAULT_SEED)
}

/// Returns the next value for the counter, creating it at `seed` on first use.
///
/// The returned value is the counter's current value; the counter advances by
/// one as a side effect. The seed only applies when the counter does not
/// exist yet.
pub fn next_with_seed(factory: &str, attribute: &str, seed: u64) -> u64 {
	let key = (factory.to_string(), attribute.to_string());
	if let Some(counter) = COUNTERS.read().get(&key) {
		return counter.value.fetch_add(1, Ordering::SeqCst);
	}
	let mut counters = COUNTERS.write();
	let counter = counters
		.entry(key)
		.or_insert_with(|| Arc::new(Counter::new(seed)));
	counter.value.fetch_add(1, Ordering::SeqCst)
}

/// Resets matching counters to their seed.
///
/// `factory` and `attribute` act as filters: `reset(Some("user"), None)`
/// resets every counter of the `user` factory, `reset(None, None)` resets
/// everything.
pub fn reset(factory: Option<&str>, attribute: Option<&str>) {
	let counters = COUNTERS.read();
	for ((factory_name, attribute_name), counter) in counters.iter() {
		let factory_matches = factory.is_none_or(|name| name == factory_name);
		let attribute_matches = attribute.is_none_or(|name| name == attribute_name);
		if factory_matches && attribute_matches {
			counter.value.store(counter.seed, Ordering::SeqCst);
		}
	}
}

/// Resets every counter to its seed.
pub fn reset_all() {
	reset(None, None);
}

/// Removes every counter.
///
/// Unlike [`reset_all`], forgotten counters are recreated at whatever seed
/// their next use specifies.
pub fn clear() {
	COUNTERS.write().clear();
}

/// Returns the number of live counters.
pub fn counter_count() -> usize {
	COUNTERS.read().len()
}

/// Sequence registry handle for scoped operations.
#[derive(Debug, Default)]
pub struct SequenceRegistry;

impl SequenceRegistry {
	/// Creates a new registry handle.
	pub fn new() -> Self {
		Self
	}

	/// Returns the next value for the counter.
	pub fn next(&self, factory: &str, attribute: &str) -> u64 {
		next(factory, attribute)
	}

	/// Returns the next value, seeding the counter on first use.
	pub fn next_with_seed(&self, factory: &str, attribute: &str, seed: u64) -> u64 {
		next_with_seed(factory, attribute, seed)
	}

	/// Resets matching counters to their seed.
	pub fn reset(&self, factory: Option<&str>, attribute: Option<&str>) {
		reset(factory, attribute)
	}

	/// Resets every counter to its seed.
	pub fn reset_all(&self) {
		reset_all()
	}

	/// Removes every counter.
	pub fn clear(&self) {
		clear()
	}

	/// Returns the number of live counters.
	pub fn len(&self) -> usize {
		counter_count()
	}

	/// Returns true if no counters exist.
	pub fn is_empty(&self) -> bool {
		counter_count() == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_next_starts_at_default_seed() {
		assert_eq!(next("seq_unit.default", "email"), 1);
		assert_eq!(next("seq_unit.default", "email"), 2);
		assert_eq!(next("seq_unit.default", "email"), 3);
	}

	#[rstest]
	fn test_counters_are_independent_per_key() {
		assert_eq!(next("seq_unit.independent", "a"), 1);
		assert_eq!(next("seq_unit.independent", "b"), 1);
		assert_eq!(next("seq_unit.independent", "a"), 2);
	}

	#[rstest]
	fn test_custom_seed_applies_on_first_use() {
		assert_eq!(next_with_seed("seq_unit.seeded", "code", 100), 100);
		assert_eq!(next_with_seed("seq_unit.seeded", "code", 100), 101);
	}

	#[rstest]
	fn test_reset_restores_seed() {
		assert_eq!(next_with_seed("seq_unit.reset", "n", 10), 10);
		assert_eq!(next_with_seed("seq_unit.reset", "n", 10), 11);
		reset(Some("seq_unit.reset"), Some("n"));
		assert_eq!(next_with_seed("seq_unit.reset", "n", 10), 10);
	}

	#[rstest]
	fn test_reset_filters_by_factory() {
		next("seq_unit.filter_a", "x");
		next("seq_unit.filter_b", "x");
		reset(Some("seq_unit.filter_a"), None);
		assert_eq!(next("seq_unit.filter_a", "x"), 1);
		assert_eq!(next("seq_unit.filter_b", "x"), 2);
	}

	#[rstest]
	fn test_concurrent_increments_are_unique() {
		let handles: Vec<_> = (0..8)
			.map(|_| {
				std::thread::spawn(|| {
					(0..100)
						.map(|_| next("seq_unit.concurrent", "n"))
						.collect::<Vec<u64>>()
				})
			})
			.collect();

		let mut values: Vec<u64> = handles
			.into_iter()
			.flat_map(|handle| handle.join().unwrap())
			.collect();
		values.sort_unstable();
		values.dedup();
		assert_eq!(values.len(), 800);
	}
}
