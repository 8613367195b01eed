//! Shared fixtures for sift-paging integration tests.
//!
//! The library schema: authors with a to-one publisher, a to-many list of
//! books and an element collection of genres.

#![allow(dead_code)]

use std::sync::Arc;

use sift_paging::memory::{MemoryExecutor, MemoryStore, row};
use sift_paging::prelude::*;

pub fn library_schema() -> Arc<Schema> {
	Arc::new(
		Schema::new()
			.entity(
				EntityDescriptor::new("Author", "author")
					.field(FieldDescriptor::basic("name", FieldType::Text))
					.field(FieldDescriptor::basic("born", FieldType::Int))
					.field(FieldDescriptor::basic("prolific", FieldType::Bool))
					.field(FieldDescriptor::basic(
						"status",
						FieldType::Enum(EnumType::new("Status", ["ACTIVE", "RETIRED"])),
					))
					.field(FieldDescriptor::to_one("publisher", "Publisher", "publisher_id"))
					.field(FieldDescriptor::to_many("books", "Book", "author_id"))
					.field(FieldDescriptor::element_collection(
						"genres",
						"author_genre",
						"author_id",
						"genre",
						FieldType::Text,
					)),
			)
			.entity(
				EntityDescriptor::new("Publisher", "publisher")
					.field(FieldDescriptor::basic("name", FieldType::Text))
					.field(FieldDescriptor::basic("country", FieldType::Text)),
			)
			.entity(
				EntityDescriptor::new("Book", "book")
					.field(FieldDescriptor::basic("title", FieldType::Text))
					.field(FieldDescriptor::basic("pages", FieldType::Int))
					.field(FieldDescriptor::to_one("author", "Author", "author_id")),
			),
	)
}

fn author(
	id: i64,
	name: &str,
	born: Option<i32>,
	prolific: Option<bool>,
	status: &str,
	publisher: Option<i64>,
) -> Row {
	row([
		("id", Value::from(id)),
		("name", Value::from(name)),
		("born", Value::Int(born)),
		("prolific", Value::Bool(prolific)),
		("status", Value::from(status)),
		("publisher_id", Value::BigInt(publisher)),
	])
}

fn book(id: i64, title: &str, pages: i32, author: i64) -> Row {
	row([
		("id", Value::from(id)),
		("title", Value::from(title)),
		("pages", Value::from(pages)),
		("author_id", Value::from(author)),
	])
}

fn genre(author: i64, genre: &str) -> Row {
	row([("author_id", Value::from(author)), ("genre", Value::from(genre))])
}

/// Five authors, two publishers, seven books.
///
/// | id | name      | born | prolific | status  | publisher | books | genres          |
/// |----|-----------|------|----------|---------|-----------|-------|-----------------|
/// | 1  | Le Guin   | 1929 | true     | ACTIVE  | Ace (US)  | 2     | fantasy, scifi  |
/// | 2  | Herbert   | 1920 | false    | RETIRED | Ace (US)  | 1     | scifi           |
/// | 3  | Austen    | 1775 | false    | RETIRED | Gollancz  | 1     | romance         |
/// | 4  | Pratchett | 1948 | true     | ACTIVE  | Gollancz  | 3     | fantasy, comedy |
/// | 5  | Anonymous | null | null     | ACTIVE  | null      | 0     |                 |
pub fn library_store() -> Arc<MemoryStore> {
	let store = MemoryStore::new();
	store.extend(
		"publisher",
		[
			row([
				("id", Value::from(1i64)),
				("name", Value::from("Gollancz")),
				("country", Value::from("UK")),
			]),
			row([
				("id", Value::from(2i64)),
				("name", Value::from("Ace")),
				("country", Value::from("US")),
			]),
		],
	);
	store.extend(
		"author",
		[
			author(1, "Le Guin", Some(1929), Some(true), "ACTIVE", Some(2)),
			author(2, "Herbert", Some(1920), Some(false), "RETIRED", Some(2)),
			author(3, "Austen", Some(1775), Some(false), "RETIRED", Some(1)),
			author(4, "Pratchett", Some(1948), Some(true), "ACTIVE", Some(1)),
			author(5, "Anonymous", None, None, "ACTIVE", None),
		],
	);
	store.extend(
		"book",
		[
			book(10, "A Wizard of Earthsea", 183, 1),
			book(11, "The Dispossessed", 387, 1),
			book(12, "Dune", 412, 2),
			book(13, "Emma", 474, 3),
			book(14, "Mort", 272, 4),
			book(15, "Guards! Guards!", 288, 4),
			book(16, "Small Gods", 284, 4),
		],
	);
	store.extend(
		"author_genre",
		[
			genre(1, "fantasy"),
			genre(1, "scifi"),
			genre(2, "scifi"),
			genre(3, "romance"),
			genre(4, "fantasy"),
			genre(4, "comedy"),
		],
	);
	Arc::new(store)
}

pub fn library_service(capabilities: BackendCapabilities) -> PageService<MemoryExecutor> {
	PageService::new(
		library_schema(),
		capabilities,
		MemoryExecutor::new(library_store()),
	)
}

/// Fixture author identities newest first, with the value of `field`.
pub fn author_values(field: &str) -> Vec<(i64, Value)> {
	let store = library_store();
	let mut authors: Vec<(i64, Value)> = store
		.rows("author")
		.iter()
		.filter_map(|row| {
			let id = row.get("id").and_then(Value::as_i64)?;
			Some((id, row.get(field).cloned().unwrap_or(Value::Int(None))))
		})
		.collect();
	authors.sort_by(|a, b| b.0.cmp(&a.0));
	authors
}

/// Root identities of a page, in result order.
pub fn ids(page: &PartialResultList<Row>) -> Vec<i64> {
	page.iter()
		.filter_map(|row| row.get("id").and_then(Value::as_i64))
		.collect()
}
