//! Entity schema and relationship metadata.
//!
//! [`Schema`] declares entities and fields. [`MetadataRegistry`] derives,
//! per entity, which dotted paths cross to-one, to-many or element collection
//! relationships and caches the answer for the lifetime of the registry.

mod registry;
mod schema;

pub use registry::{EntityMetadata, MetadataProvider, MetadataRegistry, RelationKind};
pub use schema::{
	EntityDescriptor, EnumStorage, EnumType, FieldDescriptor, FieldType, Relation, Schema,
};
