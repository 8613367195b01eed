//! Criteria maps to predicate trees.

use sift_query::Value;
use tracing::warn;

use super::CompileContext;
use super::resolver::{PathResolver, ResolvedPath};
use crate::capabilities::CollectionMatch;
use crate::criteria::{CriteriaValue, Criterion};
use crate::error::{PageError, Result};
use crate::metadata::FieldType;
use crate::page::{Criteria, Page};
use crate::plan::{
	AggregateFunction, Comparison, ParameterBinder, Predicate, SubqueryPlan, SubquerySelection,
};

/// The compiled restriction of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Restrictions {
	/// `WHERE` predicate.
	pub predicate: Option<Predicate>,
	/// `HAVING` predicate over rows grouped by root identity.
	pub having: Option<Predicate>,
	/// At least one optional criterion compiled.
	pub has_optional: bool,
}

impl Restrictions {
	pub fn group_by_root(&self) -> bool {
		self.having.is_some()
	}
}

/// Where a compiled field predicate belongs.
#[derive(Debug)]
enum Placement {
	Where(Predicate),
	Having(Predicate),
	/// Row filter plus a group condition, from the grouped collection match.
	Grouped { filter: Predicate, having: Predicate },
}

/// Compiles required and optional criteria into one restriction.
pub(crate) struct PredicateCompiler<'c, 'a> {
	ctx: &'c CompileContext<'a>,
}

impl<'c, 'a> PredicateCompiler<'c, 'a> {
	pub fn new(ctx: &'c CompileContext<'a>) -> Self {
		Self { ctx }
	}

	pub fn restrictions(
		&self,
		page: &Page,
		resolver: &mut PathResolver<'a>,
		binder: &mut ParameterBinder,
	) -> Result<Restrictions> {
		let mut required = Vec::new();
		let mut having = Vec::new();
		for placement in self.fields(page.required_criteria(), resolver, binder, true)? {
			match placement {
				Placement::Where(predicate) => required.push(predicate),
				Placement::Having(predicate) => having.push(predicate),
				Placement::Grouped {
					filter,
					having: condition,
				} => {
					required.push(filter);
					having.push(condition);
				}
			}
		}

		let mut optional = Vec::new();
		for placement in self.fields(page.optional_criteria(), resolver, binder, false)? {
			match placement {
				Placement::Where(predicate) => optional.push(predicate),
				Placement::Having(predicate) | Placement::Grouped { having: predicate, .. } => {
					return Err(PageError::UnsupportedCriteria {
						field: "optional criteria".to_string(),
						value: format!("{predicate:?}"),
					});
				}
			}
		}

		let has_optional = !optional.is_empty();
		required.extend(Predicate::or(optional));
		Ok(Restrictions {
			predicate: Predicate::and(required),
			having: Predicate::and(having),
			has_optional,
		})
	}

	fn fields(
		&self,
		criteria: &Criteria,
		resolver: &mut PathResolver<'a>,
		binder: &mut ParameterBinder,
		required: bool,
	) -> Result<Vec<Placement>> {
		let mut placements = Vec::with_capacity(criteria.len());
		for (field, value) in criteria {
			let checkpoint = resolver.checkpoint();
			let bound = binder.len();
			match self.field(field, value, resolver, binder, required) {
				Ok(placement) => placements.push(placement),
				Err(PageError::UnparsableCriterion {
					field,
					expected,
					value,
				}) => {
					skipping(&field, &expected, &value);
					resolver.rollback(checkpoint);
					binder.truncate(bound);
				}
				Err(err) => return Err(err),
			}
		}
		Ok(placements)
	}

	/// Compile one criteria entry.
	fn field(
		&self,
		field: &str,
		value: &CriteriaValue,
		resolver: &mut PathResolver<'a>,
		binder: &mut ParameterBinder,
		required: bool,
	) -> Result<Placement> {
		let (value, negated) = value.unwrap_negation();
		let path = resolver.path_of(field).to_string();
		let metadata = &self.ctx.metadata;
		let multi_valued = metadata.is_multi_valued(&path);
		if multi_valued && !self.ctx.capabilities.filter_collection {
			return Err(PageError::unsupported(
				&self.ctx.capabilities.name,
				format!("filtering a to-many or element collection relationship ({field})"),
			));
		}

		let items: Option<Vec<&CriteriaValue>> = match value {
			CriteriaValue::List(items) => Some(distinct(items)),
			single if metadata.is_element_collection(&path) => Some(vec![single]),
			_ => None,
		};
		let predicate = match items {
			Some(items) if multi_valued && items.len() > 1 => {
				return self.cardinality(field, &path, &items, resolver, binder, required, negated);
			}
			Some(items) => {
				let path = resolver.get(field)?;
				let predicates = self.items(&path, &items, binder)?;
				Predicate::or(predicates).unwrap_or(Predicate::Or(Vec::new()))
			}
			None => {
				let path = resolver.get(field)?;
				self.item(&path, value, binder)?
			}
		};
		let predicate = if negated { predicate.negate() } else { predicate };

		if resolver
			.mapped(field)
			.is_some_and(|mapped| mapped.operand.is_aggregate())
		{
			return if required {
				Ok(Placement::Having(predicate))
			} else {
				Err(PageError::UnsupportedCriteria {
					field: field.to_string(),
					value: value.to_string(),
				})
			};
		}
		Ok(Placement::Where(predicate))
	}

	/// Compile a single, non-list value.
	fn item(
		&self,
		path: &ResolvedPath,
		value: &CriteriaValue,
		binder: &mut ParameterBinder,
	) -> Result<Predicate> {
		let (value, negated) = value.unwrap_negation();
		let predicate = match value {
			CriteriaValue::Null => Predicate::IsNull(path.operand.clone()),
			CriteriaValue::List(_) => {
				return Err(PageError::UnsupportedCriteria {
					field: path.name.clone(),
					value: value.to_string(),
				});
			}
			CriteriaValue::Criterion(criterion) => criterion.build(path, binder)?,
			CriteriaValue::Scalar(scalar) => typed(path, scalar, binder)?,
		};
		Ok(if negated { predicate.negate() } else { predicate })
	}

	/// Compile list items one by one, dropping those that do not parse.
	///
	/// Fails as unparsable when no item is left.
	fn items(
		&self,
		path: &ResolvedPath,
		items: &[&CriteriaValue],
		binder: &mut ParameterBinder,
	) -> Result<Vec<Predicate>> {
		let mut predicates = Vec::with_capacity(items.len());
		for item in items {
			let bound = binder.len();
			match self.item(path, item, binder) {
				Ok(predicate) => predicates.push(predicate),
				Err(PageError::UnparsableCriterion {
					field,
					expected,
					value,
				}) => {
					skipping(&field, &expected, &value);
					binder.truncate(bound);
				}
				Err(err) => return Err(err),
			}
		}
		if predicates.is_empty() {
			let value: Vec<String> = items.iter().map(ToString::to_string).collect();
			return Err(PageError::UnparsableCriterion {
				field: path.name.clone(),
				expected: path.field_type.to_string(),
				value: format!("[{}]", value.join(", ")),
			});
		}
		Ok(predicates)
	}

	/// "Contains all of `items`" on a multi-valued path.
	#[allow(clippy::too_many_arguments)]
	fn cardinality(
		&self,
		field: &str,
		path: &str,
		items: &[&CriteriaValue],
		resolver: &mut PathResolver<'a>,
		binder: &mut ParameterBinder,
		required: bool,
		negated: bool,
	) -> Result<Placement> {
		if self.ctx.capabilities.collection_match == CollectionMatch::GroupedIn && required && !negated {
			// Joins of its own keep other criteria on the same relationship
			// from narrowing the rows counted here.
			let leaf = ResolvedPath {
				name: field.to_string(),
				..resolver.get_detached(path)?
			};
			let filters = self.items(&leaf, items, binder)?;
			let having = Predicate::Compare {
				operand: leaf.operand.aggregate(AggregateFunction::CountDistinct),
				op: Comparison::Eq,
				value: binder.bind(field, count_of(&filters)),
			};
			return Ok(Placement::Grouped {
				filter: Predicate::or(filters).unwrap_or(Predicate::Or(Vec::new())),
				having,
			});
		}

		let mut inner = PathResolver::new(self.ctx.schema, self.ctx.root);
		let leaf = ResolvedPath {
			name: field.to_string(),
			..inner.get(path)?
		};
		let filters = self.items(&leaf, items, binder)?;
		let expected = count_of(&filters);
		let subquery = SubqueryPlan {
			entity: self.ctx.root.name().to_string(),
			table: self.ctx.root.table().to_string(),
			id_column: self.ctx.root.id_column().to_string(),
			selection: SubquerySelection::CountDistinct(leaf.operand),
			joins: inner.into_joins(),
			predicate: Predicate::or(filters),
			group_by_root: false,
			having: None,
			correlated: true,
		};
		let predicate = Predicate::CountEquals {
			subquery: Box::new(subquery),
			count: binder.bind(field, expected),
		};
		let predicate = if negated { predicate.negate() } else { predicate };
		Ok(if required {
			Placement::Having(predicate)
		} else {
			Placement::Where(predicate)
		})
	}
}

fn skipping(field: &str, expected: &str, value: &str) {
	warn!(
		field = %field,
		expected = %expected,
		value = %value,
		"Cannot parse predicate for {field}({expected}) = {value}, skipping"
	);
}

fn count_of(predicates: &[Predicate]) -> Value {
	Value::from(i64::try_from(predicates.len()).unwrap_or(i64::MAX))
}

/// Interpret a loosely typed scalar against the declared field type.
fn typed(path: &ResolvedPath, value: &Value, binder: &mut ParameterBinder) -> Result<Predicate> {
	let unparsable = |_: PageError| PageError::UnparsableCriterion {
		field: path.name.clone(),
		expected: path.field_type.to_string(),
		value: value.to_text().unwrap_or_else(|| "null".to_string()),
	};
	let criterion = match &path.field_type {
		FieldType::Enum(enum_type) => Criterion::parse_enum(value, enum_type).map_err(unparsable)?,
		numeric if numeric.is_numeric() => {
			Criterion::parse_numeric(value, numeric).map_err(unparsable)?
		}
		FieldType::Bool => Criterion::parse_bool(value).map_err(unparsable)?,
		FieldType::Text => Criterion::ignore_case(value.to_text().unwrap_or_default()),
		temporal => {
			let value = match value.as_str() {
				Some(text) => temporal.parse_temporal_or_uuid(text).map_err(unparsable)?,
				None => value.clone(),
			};
			return Ok(Predicate::Compare {
				operand: path.operand.clone(),
				op: Comparison::Eq,
				value: binder.bind(&path.name, value),
			});
		}
	};
	criterion.build(path, binder)
}

/// Items in first-seen order without duplicates.
fn distinct(items: &[CriteriaValue]) -> Vec<&CriteriaValue> {
	let mut unique: Vec<&CriteriaValue> = Vec::with_capacity(items.len());
	for item in items {
		if !unique.contains(&item) {
			unique.push(item);
		}
	}
	unique
}
