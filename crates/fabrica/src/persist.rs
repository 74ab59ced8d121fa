//! Persistence capability for create builds.
//!
//! The engine never assumes a storage technology. A [`Persister`] is injected
//! per factory (via the definition builder) or globally (via
//! [`set_default_persister`]); create builds hand each instance of the built
//! tree to the matching persister and record the primary key it returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::FactoryResult;
use crate::instance::BuiltInstance;

/// Capability for persisting built instances.
///
/// The hook is a black-box blocking call from the engine's point of view: no
/// timeout is imposed and no locks are held while it runs. Implementations
/// return the primary key of the stored record.
#[async_trait]
pub trait Persister: Send + Sync {
	/// Persists a single built instance, returning its primary key.
	async fn persist(&self, instance: &BuiltInstance) -> FactoryResult<Value>;
}

/// Global default persister, used by factories without their own.
static DEFAULT_PERSISTER: Lazy<RwLock<Option<Arc<dyn Persister>>>> =
	Lazy::new(|| RwLock::new(None));

/// Installs the global default persister.
pub fn set_default_persister(persister: Arc<dyn Persister>) {
	*DEFAULT_PERSISTER.write() = Some(persister);
}

/// Returns the global default persister, if one is installed.
pub fn default_persister() -> Option<Arc<dyn Persister>> {
	DEFAULT_PERSISTER.read().clone()
}

/// Removes the global default persister.
pub fn clear_default_persister() {
	*DEFAULT_PERSISTER.write() = None;
}

/// In-memory persister.
///
/// Stores every persisted instance as (model identifier, attribute object)
/// and assigns sequential integer primary keys. Intended for tests that need
/// to observe what a create build would have written.
#[derive(Debug, Default)]
pub struct MemoryPersister {
	records: RwLock<Vec<(String, Value)>>,
	next_pk: AtomicU64,
}

impl MemoryPersister {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self {
			records: RwLock::new(Vec::new()),
			next_pk: AtomicU64::new(1),
		}
	}

	/// Returns a copy of every stored (model, fields) record, in insert order.
	pub fn records(&self) -> Vec<(String, Value)> {
		self.records.read().clone()
	}

	/// Returns the stored records for one model identifier.
	pub fn records_for(&self, model: &str) -> Vec<Value> {
		self.records
			.read()
			.iter()
			.filter(|(stored_model, _)| stored_model == model)
			.map(|(_, fields)| fields.clone())
			.collect()
	}

	/// Returns the number of stored records.
	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	/// Returns true if nothing has been stored.
	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}

	/// Removes every stored record.
	pub fn clear(&self) {
		self.records.write().clear();
	}
}

#[async_trait]
impl Persister for MemoryPersister {
	async fn persist(&self, instance: &BuiltInstance) -> FactoryResult<Value> {
		let pk = self.next_pk.fetch_add(1, Ordering::SeqCst);
		self.records
			.write()
			.push((instance.model().to_string(), instance.value()));
		Ok(Value::from(pk))
	}
}
