//! Shared test fixtures: domain models and the factory suite.
//!
//! Factories are registered exactly once per test binary. Tests that assert
//! absolute sequence values must register their own uniquely-named factories
//! instead of using the shared suite, since counters are shared across the
//! whole binary.

#![allow(dead_code)]

use std::sync::Once;

use fabrica::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Address {
	pub street: String,
	pub house_number: String,
	pub zip_code: String,
	pub city: String,
	pub country: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Customer {
	pub first_name: String,
	pub last_name: String,
	pub email_address: String,
	pub address: Address,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Order {
	pub reference: String,
	pub customer: Customer,
}

static INIT: Once = Once::new();

/// Registers the shared factory suite. Idempotent.
pub fn setup() {
	INIT.call_once(|| {
		register_suite();
	});
}

fn register_suite() {
	register_factory(
		FactoryDefinition::new("address", "shop.Address")
			.attribute("street", AttributeSpec::faker(FakerKind::StreetName))
			.attribute("house_number", AttributeSpec::sequence("{n}"))
			.attribute("zip_code", AttributeSpec::faker(FakerKind::ZipCode))
			.attribute("city", AttributeSpec::faker(FakerKind::CityName))
			.attribute("country", AttributeSpec::constant("Netherlands")),
	)
	.unwrap();

	register_factory(
		FactoryDefinition::new("customer", "shop.Customer")
			.attribute("first_name", AttributeSpec::faker(FakerKind::FirstName))
			.attribute("last_name", AttributeSpec::faker(FakerKind::LastName))
			.attribute(
				"email_address",
				AttributeSpec::sequence("customer{n}@test.com"),
			)
			.attribute("address", AttributeSpec::association("address"))
			.trait_def(
				"vip",
				TraitSpec::new().attribute("tier", AttributeSpec::constant("gold")),
			)
			.trait_def(
				"basic",
				TraitSpec::new().attribute("tier", AttributeSpec::constant("bronze")),
			),
	)
	.unwrap();

	register_factory(
		FactoryDefinition::new("product", "shop.Product")
			.attribute("name", AttributeSpec::faker(FakerKind::Word))
			.attribute("description", AttributeSpec::faker(FakerKind::Sentence))
			.attribute("brand", AttributeSpec::faker(FakerKind::CompanyName))
			.attribute("price", AttributeSpec::constant(9.99)),
	)
	.unwrap();

	register_factory(
		FactoryDefinition::new("product_order", "shop.ProductOrder")
			.attribute("amount", AttributeSpec::constant(2))
			.attribute("product", AttributeSpec::association("product")),
	)
	.unwrap();

	register_factory(
		FactoryDefinition::new("order", "shop.Order")
			.attribute("reference", AttributeSpec::sequence("ORD-{n}"))
			.attribute("date", AttributeSpec::faker(FakerKind::DateTime))
			.attribute("customer", AttributeSpec::association("customer"))
			.attribute(
				"lines",
				AttributeSpec::association_spec(AssociationSpec::new("product_order").many(2)),
			),
	)
	.unwrap();

	register_factory(
		FactoryDefinition::new("article", "blog.Article")
			.attribute("title", AttributeSpec::sequence("Article {n}"))
			.attribute("content", AttributeSpec::faker(FakerKind::Paragraph))
			.attribute("author", AttributeSpec::faker(FakerKind::Name)),
	)
	.unwrap();

	// Inheritance pair: the child shadows `role`, inherits everything else.
	register_factory(
		FactoryDefinition::new("base_user", "auth.User")
			.attribute("username", AttributeSpec::faker(FakerKind::Username))
			.attribute("role", AttributeSpec::constant("member"))
			.trait_def(
				"suspended",
				TraitSpec::new().attribute("active", AttributeSpec::constant(false)),
			),
	)
	.unwrap();
	register_factory(
		FactoryDefinition::new("admin_user", "auth.User")
			.parent("base_user")
			.attribute("role", AttributeSpec::constant("admin")),
	)
	.unwrap();

	// Deliberate association cycle for the circular-detection tests.
	register_factory(
		FactoryDefinition::new("cyclic_article", "blog.Article")
			.attribute("title", AttributeSpec::constant("Cycles"))
			.attribute("author", AttributeSpec::association("cyclic_author")),
	)
	.unwrap();
	register_factory(
		FactoryDefinition::new("cyclic_author", "blog.Author")
			.attribute("name", AttributeSpec::constant("Ouroboros"))
			.attribute("favorite", AttributeSpec::association("cyclic_article")),
	)
	.unwrap();
}
