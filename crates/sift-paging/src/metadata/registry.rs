//! Relationship metadata cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::schema::{Relation, Schema};
use crate::error::Result;

/// Kind of relationship found at a dotted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
	ToOne,
	ToMany,
	ElementCollection,
}

impl RelationKind {
	/// Whether traversing the relationship can multiply the owner's rows.
	pub fn is_multi_valued(self) -> bool {
		matches!(self, Self::ToMany | Self::ElementCollection)
	}
}

/// Relationship kinds of every reachable dotted path of one entity.
///
/// Paths are collected by walking relationships transitively. A branch stops
/// when it would revisit an entity already on the current walk, so cyclic
/// models terminate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMetadata {
	entity: String,
	relations: HashMap<String, RelationKind>,
}

impl EntityMetadata {
	/// Walk the schema from `entity` and record every relationship path.
	pub fn compute(schema: &Schema, entity: &str) -> Result<Self> {
		let mut relations = HashMap::new();
		let mut visiting = HashSet::new();
		collect(schema, entity, "", &mut visiting, &mut relations)?;
		Ok(Self {
			entity: entity.to_string(),
			relations,
		})
	}

	pub fn entity(&self) -> &str {
		&self.entity
	}

	/// Relationship kind at exactly `path`, if `path` is a relationship.
	pub fn relation_kind(&self, path: &str) -> Option<RelationKind> {
		self.relations.get(path).copied()
	}

	pub fn is_element_collection(&self, path: &str) -> bool {
		self.relation_kind(path) == Some(RelationKind::ElementCollection)
	}

	pub fn is_to_one(&self, path: &str) -> bool {
		self.relation_kind(path) == Some(RelationKind::ToOne)
	}

	pub fn is_to_many(&self, path: &str) -> bool {
		self.relation_kind(path) == Some(RelationKind::ToMany)
	}

	/// Whether `path` or any of its prefixes crosses a to-many or element
	/// collection relationship.
	pub fn is_multi_valued(&self, path: &str) -> bool {
		path.match_indices('.')
			.map(|(idx, _)| &path[..idx])
			.chain(std::iter::once(path))
			.any(|prefix| self.relation_kind(prefix).is_some_and(RelationKind::is_multi_valued))
	}

	/// Number of recorded relationship paths.
	pub fn len(&self) -> usize {
		self.relations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.relations.is_empty()
	}
}

fn collect(
	schema: &Schema,
	entity: &str,
	prefix: &str,
	visiting: &mut HashSet<String>,
	relations: &mut HashMap<String, RelationKind>,
) -> Result<()> {
	let descriptor = schema.get(entity)?;
	visiting.insert(entity.to_string());
	for field in descriptor.fields() {
		let path = format!("{prefix}{}", field.name());
		let (kind, target) = match field.relation() {
			Relation::Basic => continue,
			Relation::ToOne { target, .. } => (RelationKind::ToOne, Some(target)),
			Relation::ToMany { target, .. } => (RelationKind::ToMany, Some(target)),
			Relation::ElementCollection { .. } => (RelationKind::ElementCollection, None),
		};
		relations.insert(path.clone(), kind);
		if let Some(target) = target
			&& !visiting.contains(target.as_str())
		{
			collect(schema, target, &format!("{path}."), visiting, relations)?;
		}
	}
	visiting.remove(entity);
	Ok(())
}

/// Answers relationship questions about entity paths.
///
/// Implementations must be safe to share between threads; lookups for an
/// entity that was never seen compute its metadata on first use.
pub trait MetadataProvider: Send + Sync {
	/// Relationship metadata of `entity`.
	fn metadata(&self, entity: &str) -> Result<Arc<EntityMetadata>>;

	fn is_element_collection(&self, entity: &str, path: &str) -> bool {
		self.metadata(entity)
			.is_ok_and(|metadata| metadata.is_element_collection(path))
	}

	fn is_to_one(&self, entity: &str, path: &str) -> bool {
		self.metadata(entity)
			.is_ok_and(|metadata| metadata.is_to_one(path))
	}

	fn is_to_many(&self, entity: &str, path: &str) -> bool {
		self.metadata(entity)
			.is_ok_and(|metadata| metadata.is_to_many(path))
	}

	fn is_multi_valued(&self, entity: &str, path: &str) -> bool {
		self.metadata(entity)
			.is_ok_and(|metadata| metadata.is_multi_valued(path))
	}
}

/// Schema-backed [`MetadataProvider`] with a concurrent per-entity cache.
///
/// Each entity's metadata is computed at most once; concurrent first
/// lookups of the same entity observe the same cached value.
#[derive(Debug)]
pub struct MetadataRegistry {
	schema: Arc<Schema>,
	cache: DashMap<String, Arc<EntityMetadata>>,
}

impl MetadataRegistry {
	pub fn new(schema: Arc<Schema>) -> Self {
		Self {
			schema,
			cache: DashMap::new(),
		}
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// Number of entities whose metadata has been computed.
	pub fn cached(&self) -> usize {
		self.cache.len()
	}
}

impl MetadataProvider for MetadataRegistry {
	fn metadata(&self, entity: &str) -> Result<Arc<EntityMetadata>> {
		if let Some(metadata) = self.cache.get(entity) {
			return Ok(Arc::clone(&metadata));
		}
		match self.cache.entry(entity.to_string()) {
			Entry::Occupied(occupied) => Ok(Arc::clone(occupied.get())),
			Entry::Vacant(vacant) => {
				let metadata = EntityMetadata::compute(&self.schema, entity)?;
				debug!(
					entity,
					relations = metadata.len(),
					"Computed relationship metadata"
				);
				Ok(Arc::clone(vacant.insert(Arc::new(metadata)).value()))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metadata::schema::{EntityDescriptor, FieldDescriptor, FieldType};
	use rstest::{fixture, rstest};

	#[fixture]
	fn schema() -> Arc<Schema> {
		Arc::new(
			Schema::new()
				.entity(
					EntityDescriptor::new("Person", "person")
						.field(FieldDescriptor::basic("name", FieldType::Text))
						.field(FieldDescriptor::to_one("parent", "Person", "parent_id"))
						.field(FieldDescriptor::to_many("orders", "Order", "person_id"))
						.field(FieldDescriptor::element_collection(
							"tags",
							"person_tags",
							"person_id",
							"tag",
							FieldType::Text,
						)),
				)
				.entity(
					EntityDescriptor::new("Order", "orders")
						.field(FieldDescriptor::basic("status", FieldType::Text))
						.field(FieldDescriptor::to_one("buyer", "Person", "person_id")),
				),
		)
	}

	#[rstest]
	fn test_compute_walks_relationships_without_cycling(schema: Arc<Schema>) {
		// Act
		let metadata = EntityMetadata::compute(&schema, "Person").unwrap();

		// Assert
		assert_eq!(metadata.relation_kind("parent"), Some(RelationKind::ToOne));
		assert_eq!(metadata.relation_kind("orders"), Some(RelationKind::ToMany));
		assert_eq!(
			metadata.relation_kind("tags"),
			Some(RelationKind::ElementCollection)
		);
		assert_eq!(metadata.relation_kind("orders.buyer"), Some(RelationKind::ToOne));
		assert_eq!(metadata.relation_kind("orders.buyer.tags"), None);
		assert_eq!(metadata.relation_kind("parent.parent"), None);
		assert_eq!(metadata.relation_kind("name"), None);
	}

	#[rstest]
	#[case("tags", true)]
	#[case("orders", true)]
	#[case("orders.status", true)]
	#[case("parent", false)]
	#[case("parent.name", false)]
	#[case("name", false)]
	fn test_is_multi_valued(schema: Arc<Schema>, #[case] path: &str, #[case] expected: bool) {
		let metadata = EntityMetadata::compute(&schema, "Person").unwrap();
		assert_eq!(metadata.is_multi_valued(path), expected);
	}

	#[rstest]
	fn test_registry_caches_once(schema: Arc<Schema>) {
		// Arrange
		let registry = MetadataRegistry::new(schema);

		// Act
		let first = registry.metadata("Person").unwrap();
		let second = registry.metadata("Person").unwrap();

		// Assert
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(registry.cached(), 1);
		assert!(registry.is_element_collection("Person", "tags"));
		assert!(registry.is_to_many("Person", "orders"));
		assert!(registry.is_to_one("Person", "parent"));
	}

	#[rstest]
	fn test_registry_unknown_entity_is_not_cached(schema: Arc<Schema>) {
		let registry = MetadataRegistry::new(schema);
		assert!(registry.metadata("Ghost").is_err());
		assert!(!registry.is_to_many("Ghost", "orders"));
		assert_eq!(registry.cached(), 0);
	}

	#[rstest]
	fn test_registry_concurrent_first_lookup(schema: Arc<Schema>) {
		// Arrange
		let registry = Arc::new(MetadataRegistry::new(schema));

		// Act
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let registry = Arc::clone(&registry);
				std::thread::spawn(move || registry.metadata("Person").unwrap())
			})
			.collect();
		let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

		// Assert
		assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
	}
}
