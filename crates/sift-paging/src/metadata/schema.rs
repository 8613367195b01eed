//! Entity descriptors.
//!
//! A [`Schema`] is the static description of the persistent model: entities,
//! their tables, identity columns, fields and relationships. It is the only
//! input the compiler needs to turn dotted criteria paths into joins.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use sift_query::Value;

use crate::error::{PageError, Result};

/// How an enumerated field is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumStorage {
	/// The constant name is stored as text.
	Name,
	/// The zero-based position of the constant is stored as an integer.
	Ordinal,
}

/// An enumerated type with its declared constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
	name: String,
	constants: Vec<String>,
	storage: EnumStorage,
}

impl EnumType {
	/// Declare an enumerated type stored by constant name.
	pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			constants: constants.into_iter().map(Into::into).collect(),
			storage: EnumStorage::Name,
		}
	}

	/// Persist the constants by ordinal instead of by name.
	pub fn ordinal(mut self) -> Self {
		self.storage = EnumStorage::Ordinal;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn constants(&self) -> &[String] {
		&self.constants
	}

	pub fn storage(&self) -> EnumStorage {
		self.storage
	}

	/// Position of the constant matching `name`, ignoring ASCII case.
	pub fn position(&self, name: &str) -> Option<usize> {
		self.constants
			.iter()
			.position(|constant| constant.eq_ignore_ascii_case(name))
	}

	/// The stored representation of the constant at `ordinal`.
	pub fn stored_value(&self, ordinal: usize) -> Option<Value> {
		let constant = self.constants.get(ordinal)?;
		Some(match self.storage {
			EnumStorage::Name => Value::from(constant.as_str()),
			EnumStorage::Ordinal => Value::Int(i32::try_from(ordinal).ok()),
		})
	}
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
	Bool,
	Int,
	BigInt,
	Double,
	Decimal,
	Text,
	Date,
	DateTime,
	Uuid,
	Enum(EnumType),
}

impl FieldType {
	/// Whether the type is one of the numeric types.
	pub fn is_numeric(&self) -> bool {
		matches!(self, Self::Int | Self::BigInt | Self::Double | Self::Decimal)
	}

	/// Parse a number of this type from text.
	///
	/// Fails with an argument error when the text is not a number of the
	/// declared type or the type is not numeric.
	pub fn parse_number(&self, text: &str) -> Result<Value> {
		let text = text.trim();
		let invalid = || {
			PageError::invalid_argument("value", format!("{text:?} is not a valid {self}"))
		};
		match self {
			Self::Int => text.parse::<i32>().map(Value::from).map_err(|_| invalid()),
			Self::BigInt => text.parse::<i64>().map(Value::from).map_err(|_| invalid()),
			Self::Double => text
				.parse::<f64>()
				.ok()
				.filter(|v| v.is_finite())
				.map(Value::from)
				.ok_or_else(invalid),
			Self::Decimal => Decimal::from_str(text)
				.map(Value::from)
				.map_err(|_| invalid()),
			_ => Err(invalid()),
		}
	}

	/// Coerce an already typed numeric value to this type.
	pub fn coerce_number(&self, value: &Value) -> Result<Value> {
		if !value.is_numeric() {
			return Err(PageError::invalid_argument(
				"value",
				format!("{} is not a number", value.to_sql_literal()),
			));
		}
		match (self, value.as_i64()) {
			(Self::Int, Some(v)) => i32::try_from(v).map(Value::from).map_err(|_| {
				PageError::invalid_argument("value", format!("{v} does not fit into {self}"))
			}),
			(Self::BigInt, Some(v)) => Ok(Value::from(v)),
			(Self::Decimal, Some(v)) => Ok(Value::from(Decimal::from(v))),
			_ => {
				let text = value.to_text().unwrap_or_default();
				self.parse_number(&text)
			}
		}
	}

	/// Parse a date, date-time or UUID value of this type from text.
	pub fn parse_temporal_or_uuid(&self, text: &str) -> Result<Value> {
		let text = text.trim();
		let invalid = || {
			PageError::invalid_argument("value", format!("{text:?} is not a valid {self}"))
		};
		match self {
			Self::Date => chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
				.map(Value::from)
				.map_err(|_| invalid()),
			Self::DateTime => chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
				.or_else(|_| chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
				.map(Value::from)
				.map_err(|_| invalid()),
			Self::Uuid => uuid::Uuid::parse_str(text)
				.map(Value::from)
				.map_err(|_| invalid()),
			_ => Err(invalid()),
		}
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool => f.write_str("Bool"),
			Self::Int => f.write_str("Int"),
			Self::BigInt => f.write_str("BigInt"),
			Self::Double => f.write_str("Double"),
			Self::Decimal => f.write_str("Decimal"),
			Self::Text => f.write_str("Text"),
			Self::Date => f.write_str("Date"),
			Self::DateTime => f.write_str("DateTime"),
			Self::Uuid => f.write_str("Uuid"),
			Self::Enum(enum_type) => f.write_str(enum_type.name()),
		}
	}
}

/// How a field relates its owner to other rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
	/// A plain column on the owner's table.
	Basic,
	/// A reference to a single target row through a foreign key column on
	/// the owner's table.
	ToOne {
		target: String,
		join_column: String,
	},
	/// A collection of target rows whose `mapped_by` column references the
	/// owner's identity.
	ToMany { target: String, mapped_by: String },
	/// A collection of values stored in a separate table keyed by the
	/// owner's identity.
	ElementCollection {
		table: String,
		owner_column: String,
		value_column: String,
	},
}

/// A field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	name: String,
	column: String,
	field_type: FieldType,
	relation: Relation,
}

impl FieldDescriptor {
	/// A plain column named after the field.
	pub fn basic(name: impl Into<String>, field_type: FieldType) -> Self {
		let name = name.into();
		Self {
			column: name.clone(),
			name,
			field_type,
			relation: Relation::Basic,
		}
	}

	/// A reference to one `target` row through `join_column`.
	pub fn to_one(
		name: impl Into<String>,
		target: impl Into<String>,
		join_column: impl Into<String>,
	) -> Self {
		let join_column = join_column.into();
		Self {
			name: name.into(),
			column: join_column.clone(),
			field_type: FieldType::BigInt,
			relation: Relation::ToOne {
				target: target.into(),
				join_column,
			},
		}
	}

	/// A collection of `target` rows whose `mapped_by` column points back.
	pub fn to_many(
		name: impl Into<String>,
		target: impl Into<String>,
		mapped_by: impl Into<String>,
	) -> Self {
		let name = name.into();
		Self {
			column: name.clone(),
			name,
			field_type: FieldType::BigInt,
			relation: Relation::ToMany {
				target: target.into(),
				mapped_by: mapped_by.into(),
			},
		}
	}

	/// A collection of `element_type` values kept in `table`.
	pub fn element_collection(
		name: impl Into<String>,
		table: impl Into<String>,
		owner_column: impl Into<String>,
		value_column: impl Into<String>,
		element_type: FieldType,
	) -> Self {
		let value_column = value_column.into();
		Self {
			name: name.into(),
			column: value_column.clone(),
			field_type: element_type,
			relation: Relation::ElementCollection {
				table: table.into(),
				owner_column: owner_column.into(),
				value_column,
			},
		}
	}

	/// Override the column name of a basic field.
	pub fn column(mut self, column: impl Into<String>) -> Self {
		self.column = column.into();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn column_name(&self) -> &str {
		&self.column
	}

	/// Declared type. For element collections this is the element type.
	pub fn field_type(&self) -> &FieldType {
		&self.field_type
	}

	pub fn relation(&self) -> &Relation {
		&self.relation
	}
}

/// A persistent entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
	name: String,
	table: String,
	id: String,
	id_type: FieldType,
	fields: IndexMap<String, FieldDescriptor>,
}

impl EntityDescriptor {
	/// Declare an entity stored in `table` with a `BigInt` identity column
	/// named `id`.
	pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
		let mut entity = Self {
			name: name.into(),
			table: table.into(),
			id: String::new(),
			id_type: FieldType::BigInt,
			fields: IndexMap::new(),
		};
		entity = entity.id("id", FieldType::BigInt);
		entity
	}

	/// Set the identity field. The identity is also addressable as a field.
	pub fn id(mut self, name: impl Into<String>, id_type: FieldType) -> Self {
		let name = name.into();
		if !self.id.is_empty() {
			self.fields.shift_remove(&self.id);
		}
		self.fields.insert(
			name.clone(),
			FieldDescriptor::basic(name.clone(), id_type.clone()),
		);
		self.id = name;
		self.id_type = id_type;
		self
	}

	/// Add a field.
	pub fn field(mut self, field: FieldDescriptor) -> Self {
		self.fields.insert(field.name.clone(), field);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	/// Name of the identity column.
	pub fn id_column(&self) -> &str {
		&self.id
	}

	pub fn id_type(&self) -> &FieldType {
		&self.id_type
	}

	pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.get(name)
	}

	pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
		self.fields.values()
	}
}

/// The set of entities known to the engine.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	entities: IndexMap<String, EntityDescriptor>,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an entity, replacing any previous one with the same name.
	pub fn entity(mut self, entity: EntityDescriptor) -> Self {
		self.entities.insert(entity.name.clone(), entity);
		self
	}

	/// Look up an entity by name.
	pub fn get(&self, name: &str) -> Result<&EntityDescriptor> {
		self.entities
			.get(name)
			.ok_or_else(|| PageError::UnknownEntity(name.to_string()))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entities.contains_key(name)
	}

	pub fn entities(&self) -> impl Iterator<Item = &EntityDescriptor> {
		self.entities.values()
	}

	/// Declared type of a field, resolving relationship fields to the
	/// identity type of their target.
	pub fn value_type(&self, field: &FieldDescriptor) -> Result<FieldType> {
		match field.relation() {
			Relation::ToOne { target, .. } | Relation::ToMany { target, .. } => {
				Ok(self.get(target)?.id_type().clone())
			}
			Relation::Basic | Relation::ElementCollection { .. } => Ok(field.field_type().clone()),
		}
	}
}
