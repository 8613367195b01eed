//! Typed query plans.
//!
//! A [`QueryPlan`] is what the compiler hands to an execution sink: the
//! selection, the join set, the predicate tree, grouping, ordering, range and
//! the bound parameter table. It is backend neutral; [`SqlLowering`] turns it
//! into a SQL statement and the in-memory executor evaluates it directly.
//!
//! [`SqlLowering`]: crate::lower::SqlLowering

use std::fmt;

use indexmap::IndexMap;
use sift_query::Value;

use crate::error::{PageError, Result};
use crate::metadata::{FieldType, RelationKind};

/// Where a column is read from: the plan's root or one of its joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
	Root,
	/// Index into the owning plan's join list.
	Join(usize),
}

/// A column of the root or of a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
	pub source: Source,
	pub column: String,
	pub field_type: FieldType,
}

/// Aggregate functions usable in projections and `HAVING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
	Count,
	CountDistinct,
	Sum,
	Avg,
	Min,
	Max,
}

/// A value-producing expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
	Field(FieldRef),
	/// Identity column of the current plan's root.
	RootId,
	/// Identity column of the enclosing plan's root, inside a correlated subquery.
	OuterRootId,
	/// Lower-cased text.
	Lower(Box<Operand>),
	/// Text form of a non-text value, per the backend's cast rule.
	AsText(Box<Operand>),
	Aggregate(AggregateFunction, Box<Operand>),
}

impl Operand {
	pub fn field(source: Source, column: impl Into<String>, field_type: FieldType) -> Self {
		Self::Field(FieldRef {
			source,
			column: column.into(),
			field_type,
		})
	}

	pub fn lower(self) -> Self {
		Self::Lower(Box::new(self))
	}

	pub fn as_text(self) -> Self {
		Self::AsText(Box::new(self))
	}

	pub fn aggregate(self, function: AggregateFunction) -> Self {
		Self::Aggregate(function, Box::new(self))
	}

	/// Whether the operand contains an aggregate.
	pub fn is_aggregate(&self) -> bool {
		match self {
			Self::Aggregate(..) => true,
			Self::Lower(inner) | Self::AsText(inner) => inner.is_aggregate(),
			Self::Field(_) | Self::RootId | Self::OuterRootId => false,
		}
	}
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
	Eq,
	Ne,
	Lt,
	Lte,
	Gt,
	Gte,
}

impl Comparison {
	/// Whether `ordering` (left compared to right) satisfies the operator.
	pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
		use std::cmp::Ordering::*;
		match self {
			Self::Eq => ordering == Equal,
			Self::Ne => ordering != Equal,
			Self::Lt => ordering == Less,
			Self::Lte => ordering != Greater,
			Self::Gt => ordering == Greater,
			Self::Gte => ordering != Less,
		}
	}
}

/// Name of a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamRef(String);

impl ParamRef {
	pub fn name(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ParamRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, ":{}", self.0)
	}
}

/// A boolean expression over operands and bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
	IsNull(Operand),
	Compare {
		operand: Operand,
		op: Comparison,
		value: ParamRef,
	},
	Between {
		operand: Operand,
		min: ParamRef,
		max: ParamRef,
	},
	/// `operand LIKE pattern`; a backslash escapes wildcards in the pattern.
	Like {
		operand: Operand,
		pattern: ParamRef,
	},
	In {
		operand: Operand,
		values: Vec<ParamRef>,
	},
	/// Conjunction. Empty means true.
	And(Vec<Predicate>),
	/// Disjunction. Empty means false.
	Or(Vec<Predicate>),
	Not(Box<Predicate>),
	/// `(scalar subquery) = :count`.
	CountEquals {
		subquery: Box<SubqueryPlan>,
		count: ParamRef,
	},
	/// `operand IN (subquery)`.
	InSubquery {
		operand: Operand,
		subquery: Box<SubqueryPlan>,
	},
	Exists(Box<SubqueryPlan>),
}

impl Predicate {
	/// Negate, collapsing a double negation.
	pub fn negate(self) -> Self {
		match self {
			Self::Not(inner) => *inner,
			other => Self::Not(Box::new(other)),
		}
	}

	/// Conjunction of `predicates`, flattening single elements and nested
	/// conjunctions.
	pub fn and(predicates: Vec<Predicate>) -> Option<Self> {
		Self::combine(predicates, true)
	}

	/// Disjunction of `predicates`, flattening single elements and nested
	/// disjunctions.
	pub fn or(predicates: Vec<Predicate>) -> Option<Self> {
		Self::combine(predicates, false)
	}

	fn combine(predicates: Vec<Predicate>, conjunction: bool) -> Option<Self> {
		let mut flat = Vec::with_capacity(predicates.len());
		for predicate in predicates {
			match (predicate, conjunction) {
				(Self::And(inner), true) | (Self::Or(inner), false) if !inner.is_empty() => {
					flat.extend(inner)
				}
				(other, _) => flat.push(other),
			}
		}
		match flat.len() {
			0 => None,
			1 => flat.pop(),
			_ if conjunction => Some(Self::And(flat)),
			_ => Some(Self::Or(flat)),
		}
	}
}

/// What a subquery returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubquerySelection {
	/// Identities of matching root rows.
	RootId,
	/// `COUNT(DISTINCT operand)` over the matching rows.
	CountDistinct(Operand),
}

/// A nested query, optionally correlated to the enclosing root.
#[derive(Debug, Clone, PartialEq)]
pub struct SubqueryPlan {
	pub entity: String,
	pub table: String,
	pub id_column: String,
	pub selection: SubquerySelection,
	pub joins: Vec<Join>,
	pub predicate: Option<Predicate>,
	pub group_by_root: bool,
	pub having: Option<Predicate>,
	/// Restrict to the row whose identity equals the enclosing root's.
	pub correlated: bool,
}

/// A `LEFT JOIN` created for a relationship path.
///
/// Rows of `table` join when `table.target_column = parent.parent_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
	/// Dotted relationship path from the root.
	pub path: String,
	pub parent: Source,
	pub parent_column: String,
	pub table: String,
	pub target_column: String,
	/// Joined entity, `None` for element collections.
	pub entity: Option<String>,
	/// Identity column of the joined entity, `None` for element collections.
	pub id_column: Option<String>,
	pub kind: RelationKind,
	/// Requested as an eager fetch rather than created by a criterion.
	pub fetch: bool,
}

impl Join {
	/// Whether the join can multiply the rows of its parent.
	pub fn fans_out(&self) -> bool {
		self.kind.is_multi_valued()
	}
}

/// What the outer query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
	/// Every column of the root row.
	Entity,
	/// Named expressions.
	Projection(Vec<(String, Operand)>),
	/// `COUNT(root.id)`.
	Count,
	/// `COUNT(DISTINCT root.id)`.
	CountDistinct,
}

impl Selection {
	pub fn is_count(&self) -> bool {
		matches!(self, Self::Count | Self::CountDistinct)
	}
}

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDirective {
	pub operand: Operand,
	pub ascending: bool,
}

/// Second-level cache hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHints {
	pub cacheable: bool,
	/// Cache partition, the page's canonical form.
	pub region: String,
}

/// Ordered table of named bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(IndexMap<String, Value>);

impl Parameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, param: &ParamRef) -> Option<&Value> {
		self.0.get(param.name())
	}

	/// Value of `param`, failing if it was never bound.
	pub fn value(&self, param: &ParamRef) -> Result<&Value> {
		self.get(param)
			.ok_or_else(|| PageError::UnboundParameter(param.name().to_string()))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value))
	}
}

/// Allocates parameter names for one compilation.
///
/// Names are derived from the field path and a running counter, so compiling
/// the same page twice yields the same table.
#[derive(Debug, Default)]
pub struct ParameterBinder {
	parameters: Parameters,
}

impl ParameterBinder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind `value` under a fresh name derived from `hint`.
	pub fn bind(&mut self, hint: &str, value: Value) -> ParamRef {
		let stem: String = hint
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
			.collect();
		let stem = if stem.is_empty() { "param" } else { stem.as_str() };
		let name = format!("{stem}_{}", self.parameters.len());
		self.parameters.0.insert(name.clone(), value);
		ParamRef(name)
	}

	pub fn len(&self) -> usize {
		self.parameters.len()
	}

	/// Forget every binding made after the first `len`.
	pub fn truncate(&mut self, len: usize) {
		self.parameters.0.truncate(len);
	}

	pub fn is_empty(&self) -> bool {
		self.parameters.is_empty()
	}

	pub fn into_parameters(self) -> Parameters {
		self.parameters
	}
}

/// A compiled outer query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
	pub entity: String,
	pub table: String,
	pub id_column: String,
	pub selection: Selection,
	pub joins: Vec<Join>,
	pub predicate: Option<Predicate>,
	pub group_by: Vec<Operand>,
	pub having: Option<Predicate>,
	pub order_by: Vec<OrderDirective>,
	pub offset: Option<u64>,
	pub limit: Option<u64>,
	pub distinct: bool,
	pub parameters: Parameters,
	pub hints: Option<CacheHints>,
}

impl QueryPlan {
	/// An unfiltered plan selecting every root row.
	pub fn new(
		entity: impl Into<String>,
		table: impl Into<String>,
		id_column: impl Into<String>,
	) -> Self {
		Self {
			entity: entity.into(),
			table: table.into(),
			id_column: id_column.into(),
			selection: Selection::Entity,
			joins: Vec::new(),
			predicate: None,
			group_by: Vec::new(),
			having: None,
			order_by: Vec::new(),
			offset: None,
			limit: None,
			distinct: false,
			parameters: Parameters::new(),
			hints: None,
		}
	}

	/// Whether the plan filters rows at all.
	pub fn is_filtered(&self) -> bool {
		self.predicate.is_some() || self.having.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn is_null(column: &str) -> Predicate {
		Predicate::IsNull(Operand::field(Source::Root, column, FieldType::Text))
	}

	#[rstest]
	fn test_negate_is_involutive() {
		// Arrange
		let predicate = is_null("email");

		// Act
		let twice = predicate.clone().negate().negate();

		// Assert
		assert_eq!(twice, predicate);
	}

	#[rstest]
	fn test_and_flattens() {
		// Act
		let combined = Predicate::and(vec![
			Predicate::And(vec![is_null("a"), is_null("b")]),
			is_null("c"),
		]);

		// Assert
		assert_eq!(
			combined,
			Some(Predicate::And(vec![is_null("a"), is_null("b"), is_null("c")]))
		);
	}

	#[rstest]
	fn test_combine_single_and_empty() {
		assert_eq!(Predicate::or(vec![is_null("a")]), Some(is_null("a")));
		assert_eq!(Predicate::or(Vec::new()), None);
	}

	#[rstest]
	fn test_binder_names_are_deterministic() {
		// Arrange
		let mut first = ParameterBinder::new();
		let mut second = ParameterBinder::new();

		// Act
		let a = first.bind("parent.name", Value::from("x"));
		let b = second.bind("parent.name", Value::from("x"));
		let c = first.bind("", Value::from(1));

		// Assert
		assert_eq!(a, b);
		assert_eq!(a.name(), "parent_name_0");
		assert_eq!(c.name(), "param_1");
		assert_eq!(first.into_parameters().len(), 2);
	}

	#[rstest]
	#[case(Comparison::Lte, std::cmp::Ordering::Equal, true)]
	#[case(Comparison::Lt, std::cmp::Ordering::Equal, false)]
	#[case(Comparison::Ne, std::cmp::Ordering::Less, true)]
	fn test_comparison_holds(
		#[case] op: Comparison,
		#[case] ordering: std::cmp::Ordering,
		#[case] expected: bool,
	) {
		assert_eq!(op.holds(ordering), expected);
	}
}
