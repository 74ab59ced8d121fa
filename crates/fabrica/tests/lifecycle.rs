//! Registry lifecycle: suite setup, reset between test cases, teardown.
//!
//! These phases mutate the process-wide registries (clears, the global
//! default persister), so they run as one sequential test in their own
//! binary, isolated from the other integration suites.

use std::sync::Arc;

use fabrica::prelude::*;
use fabrica::sequence;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn test_registry_lifecycle() {
	let registry = FactoryRegistry::new();
	let sequences = SequenceRegistry::new();

	// Suite setup: register and build.
	registry
		.register(
			FactoryDefinition::new("life.user", "auth.User")
				.attribute("email", AttributeSpec::sequence("life{n}@test.com")),
		)
		.unwrap();
	assert!(registry.has("life.user"));

	let first = build("life.user").unwrap();
	let second = build("life.user").unwrap();
	assert_eq!(first.get("email"), Some(&json!("life1@test.com")));
	assert_eq!(second.get("email"), Some(&json!("life2@test.com")));

	// Between test cases: counters reset to their seed, definitions stay.
	sequences.reset_all();
	let fresh = build("life.user").unwrap();
	assert_eq!(fresh.get("email"), Some(&json!("life1@test.com")));

	// Trait registration after the fact.
	registry
		.register_trait(
			"life.user",
			"admin",
			TraitSpec::new().attribute("role", AttributeSpec::constant("admin")),
		)
		.unwrap();
	let admin = build_with(BuildRequest::new("life.user").with_trait("admin")).unwrap();
	assert_eq!(admin.get("role"), Some(&json!("admin")));

	// Global default persister: installed, used, removed.
	let store = Arc::new(MemoryPersister::new());
	set_default_persister(store.clone());
	let created = create("life.user").await.unwrap();
	assert!(created.persisted());
	assert_eq!(store.len(), 1);

	clear_default_persister();
	let result = create("life.user").await;
	assert!(matches!(result, Err(FactoryError::NoPersister(_))));

	// Redefinition requires the explicit replace path.
	let duplicate = registry.register(FactoryDefinition::new("life.user", "auth.User"));
	assert!(matches!(duplicate, Err(FactoryError::DuplicateFactory(_))));
	registry
		.replace(
			FactoryDefinition::new("life.user", "auth.Member")
				.attribute("email", AttributeSpec::constant("fixed@test.com")),
		)
		.unwrap();
	assert_eq!(registry.lookup("life.user").unwrap().model(), "auth.Member");

	// Teardown: clearing the registry forgets every definition.
	registry.clear();
	assert!(registry.is_empty());
	assert!(matches!(
		build("life.user"),
		Err(FactoryError::UnknownFactory(_))
	));

	// Counters can be dropped wholesale as well.
	sequence::clear();
	assert!(sequences.is_empty());
}
