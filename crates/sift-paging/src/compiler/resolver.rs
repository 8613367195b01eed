//! Dotted path resolution.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{PageError, Result};
use crate::metadata::{EntityDescriptor, FieldDescriptor, FieldType, Relation, RelationKind, Schema};
use crate::plan::{Join, Operand, Source};

/// A field path resolved to a queryable operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
	/// The name the path was requested under.
	pub name: String,
	pub operand: Operand,
	/// Declared type of the value the operand produces.
	pub field_type: FieldType,
	/// Whether the path crosses a to-many or element collection relationship.
	pub multi_valued: bool,
}

#[derive(Debug, Clone)]
struct Mapped {
	path: String,
	resolved: ResolvedPath,
}

/// Resolves dotted field paths against a root entity, creating `LEFT JOIN`s
/// on demand.
///
/// Each relationship path is joined at most once per resolver; repeated
/// references reuse the first join. The root itself resolves under the empty
/// path. A projection mapping, when present, takes precedence over entity
/// fields.
#[derive(Debug)]
pub struct PathResolver<'a> {
	schema: &'a Schema,
	root: &'a EntityDescriptor,
	joins: Vec<Join>,
	index: HashMap<String, usize>,
	mapping: IndexMap<String, Mapped>,
}

impl<'a> PathResolver<'a> {
	pub fn new(schema: &'a Schema, root: &'a EntityDescriptor) -> Self {
		Self {
			schema,
			root,
			joins: Vec::new(),
			index: HashMap::new(),
			mapping: IndexMap::new(),
		}
	}

	pub fn root_entity(&self) -> &'a EntityDescriptor {
		self.root
	}

	/// The root identity, addressable under `""`.
	pub fn root(&self) -> ResolvedPath {
		ResolvedPath {
			name: String::new(),
			operand: Operand::RootId,
			field_type: self.root.id_type().clone(),
			multi_valued: false,
		}
	}

	/// Expose `resolved` (built from `path`) under `name`.
	pub fn map(&mut self, name: impl Into<String>, path: impl Into<String>, resolved: ResolvedPath) {
		self.mapping.insert(
			name.into(),
			Mapped {
				path: path.into(),
				resolved,
			},
		);
	}

	/// The entity path behind `name`, following the mapping.
	pub fn path_of<'n>(&'n self, name: &'n str) -> &'n str {
		self.mapping
			.get(name)
			.map_or(name, |mapped| mapped.path.as_str())
	}

	/// The mapped path registered under `name`, if any.
	pub fn mapped(&self, name: &str) -> Option<&ResolvedPath> {
		self.mapping.get(name).map(|mapped| &mapped.resolved)
	}

	/// Resolve `field` to an operand.
	pub fn get(&mut self, field: &str) -> Result<ResolvedPath> {
		if field.is_empty() {
			return Ok(self.root());
		}
		if let Some(mapped) = self.mapping.get(field) {
			return Ok(ResolvedPath {
				name: field.to_string(),
				..mapped.resolved.clone()
			});
		}
		self.resolve(field)
	}

	/// Resolve the entity path `path` through joins of its own that later
	/// lookups never reuse.
	pub fn get_detached(&mut self, path: &str) -> Result<ResolvedPath> {
		let index = std::mem::take(&mut self.index);
		let resolved = self.resolve(path);
		self.index = index;
		resolved
	}

	/// Join every relationship along `path` as an eager fetch.
	pub fn fetch(&mut self, path: &str) -> Result<()> {
		let schema = self.schema;
		let mut entity = self.root;
		let mut source = Source::Root;
		let segments: Vec<&str> = path.split('.').collect();
		for (idx, segment) in segments.iter().enumerate() {
			let field = self.field(entity, segment, path)?;
			if matches!(field.relation(), Relation::Basic) {
				return Err(self.unknown(path));
			}
			let join = self.join(&segments[..=idx].join("."), source, entity, field, true)?;
			source = Source::Join(join);
			match field.relation() {
				Relation::ToOne { target, .. } | Relation::ToMany { target, .. } => {
					entity = schema.get(target)?;
				}
				Relation::ElementCollection { .. } if idx + 1 < segments.len() => {
					return Err(self.unknown(path));
				}
				Relation::ElementCollection { .. } | Relation::Basic => {}
			}
		}
		Ok(())
	}

	fn resolve(&mut self, path: &str) -> Result<ResolvedPath> {
		let schema = self.schema;
		let mut entity = self.root;
		let mut source = Source::Root;
		let mut multi_valued = false;
		let segments: Vec<&str> = path.split('.').collect();

		for (idx, segment) in segments.iter().enumerate() {
			let field = self.field(entity, segment, path)?;
			let last = idx + 1 == segments.len();
			let prefix = segments[..=idx].join(".");
			match field.relation() {
				Relation::Basic if last => {
					return Ok(self.resolved(
						path,
						source,
						field.column_name(),
						field.field_type().clone(),
						multi_valued,
					));
				}
				Relation::Basic => return Err(self.unknown(path)),
				Relation::ToOne { join_column, .. } if last && !self.index.contains_key(&prefix) => {
					// The foreign key already identifies the target.
					return Ok(self.resolved(
						path,
						source,
						join_column,
						schema.value_type(field)?,
						multi_valued,
					));
				}
				Relation::ToOne { target, .. } | Relation::ToMany { target, .. } => {
					multi_valued |= matches!(field.relation(), Relation::ToMany { .. });
					source = Source::Join(self.join(&prefix, source, entity, field, false)?);
					entity = schema.get(target)?;
					if last {
						return Ok(self.resolved(
							path,
							source,
							entity.id_column(),
							entity.id_type().clone(),
							multi_valued,
						));
					}
				}
				Relation::ElementCollection { value_column, .. } if last => {
					let join = self.join(&prefix, source, entity, field, false)?;
					return Ok(self.resolved(
						path,
						Source::Join(join),
						value_column,
						field.field_type().clone(),
						true,
					));
				}
				Relation::ElementCollection { .. } => return Err(self.unknown(path)),
			}
		}
		Err(self.unknown(path))
	}

	fn resolved(
		&self,
		path: &str,
		source: Source,
		column: &str,
		field_type: FieldType,
		multi_valued: bool,
	) -> ResolvedPath {
		ResolvedPath {
			name: path.to_string(),
			operand: Operand::field(source, column, field_type.clone()),
			field_type,
			multi_valued,
		}
	}

	fn field(
		&self,
		entity: &'a EntityDescriptor,
		segment: &str,
		path: &str,
	) -> Result<&'a FieldDescriptor> {
		entity
			.get_field(segment)
			.ok_or_else(|| self.unknown(path))
	}

	fn unknown(&self, path: &str) -> PageError {
		PageError::UnknownField {
			entity: self.root.name().to_string(),
			path: path.to_string(),
		}
	}

	/// Join the relationship `field` of `parent` at `path`, reusing an
	/// existing join for the same path.
	fn join(
		&mut self,
		path: &str,
		parent: Source,
		parent_entity: &EntityDescriptor,
		field: &FieldDescriptor,
		fetch: bool,
	) -> Result<usize> {
		if let Some(&idx) = self.index.get(path) {
			self.joins[idx].fetch |= fetch;
			return Ok(idx);
		}
		let join = match field.relation() {
			Relation::ToOne {
				target,
				join_column,
			} => {
				let target = self.schema.get(target)?;
				Join {
					path: path.to_string(),
					parent,
					parent_column: join_column.clone(),
					table: target.table().to_string(),
					target_column: target.id_column().to_string(),
					entity: Some(target.name().to_string()),
					id_column: Some(target.id_column().to_string()),
					kind: RelationKind::ToOne,
					fetch,
				}
			}
			Relation::ToMany { target, mapped_by } => {
				let target = self.schema.get(target)?;
				Join {
					path: path.to_string(),
					parent,
					parent_column: parent_entity.id_column().to_string(),
					table: target.table().to_string(),
					target_column: mapped_by.clone(),
					entity: Some(target.name().to_string()),
					id_column: Some(target.id_column().to_string()),
					kind: RelationKind::ToMany,
					fetch,
				}
			}
			Relation::ElementCollection {
				table,
				owner_column,
				..
			} => Join {
				path: path.to_string(),
				parent,
				parent_column: parent_entity.id_column().to_string(),
				table: table.clone(),
				target_column: owner_column.clone(),
				entity: None,
				id_column: None,
				kind: RelationKind::ElementCollection,
				fetch,
			},
			Relation::Basic => return Err(self.unknown(path)),
		};
		self.joins.push(join);
		let idx = self.joins.len() - 1;
		self.index.insert(path.to_string(), idx);
		Ok(idx)
	}

	/// Marker for [`rollback`](Self::rollback).
	pub fn checkpoint(&self) -> usize {
		self.joins.len()
	}

	/// Drop every join created after `checkpoint`.
	pub fn rollback(&mut self, checkpoint: usize) {
		self.joins.truncate(checkpoint);
		self.index.retain(|_, idx| *idx < checkpoint);
	}

	pub fn joins(&self) -> &[Join] {
		&self.joins
	}

	pub fn has_joins(&self) -> bool {
		!self.joins.is_empty()
	}

	/// Whether any join can duplicate root rows.
	pub fn fans_out(&self) -> bool {
		self.joins.iter().any(Join::fans_out)
	}

	pub fn has_fetches(&self) -> bool {
		self.joins.iter().any(|join| join.fetch)
	}

	pub fn into_joins(self) -> Vec<Join> {
		self.joins
	}
}
