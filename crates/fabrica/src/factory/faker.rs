//! Fake data generators.
//!
//! [`FakerKind`] enumerates the supported generators; `generate` samples a
//! fresh value. Faker attributes do not touch sequence counters, so two
//! builds may (rarely) produce the same value — use a sequence when
//! uniqueness matters.

use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::address::en::{CityName, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{FreeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use serde_json::Value;
use uuid::Uuid;

/// A fake data generator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakerKind {
	/// A full person name.
	Name,
	/// A first name.
	FirstName,
	/// A last name.
	LastName,
	/// An internet username.
	Username,
	/// An email address.
	Email,
	/// A single lorem word.
	Word,
	/// A lorem sentence.
	Sentence,
	/// A lorem paragraph.
	Paragraph,
	/// A street name.
	StreetName,
	/// A city name.
	CityName,
	/// A postal code.
	ZipCode,
	/// A company name.
	CompanyName,
	/// A phone number.
	PhoneNumber,
	/// A random v4 UUID string.
	Uuid,
	/// An RFC 3339 timestamp.
	DateTime,
}

impl FakerKind {
	/// Samples a fresh value.
	pub fn generate(&self) -> Value {
		match self {
			Self::Name => Value::String(Name().fake()),
			Self::FirstName => Value::String(FirstName().fake()),
			Self::LastName => Value::String(LastName().fake()),
			Self::Username => Value::String(Username().fake()),
			Self::Email => Value::String(FreeEmail().fake()),
			Self::Word => Value::String(Word().fake()),
			Self::Sentence => Value::String(Sentence(3..8).fake()),
			Self::Paragraph => Value::String(Paragraph(2..4).fake()),
			Self::StreetName => Value::String(StreetName().fake()),
			Self::CityName => Value::String(CityName().fake()),
			Self::ZipCode => Value::String(ZipCode().fake()),
			Self::CompanyName => Value::String(CompanyName().fake()),
			Self::PhoneNumber => Value::String(PhoneNumber().fake()),
			Self::Uuid => Value::String(Uuid::new_v4().to_string()),
			Self::DateTime => {
				let timestamp: DateTime<Utc> = fake::faker::chrono::en::DateTime().fake();
				Value::String(timestamp.to_rfc3339())
			}
		}
	}
}
