//! Plan evaluation over in-memory rows.
//!
//! Joins are expanded into tuples of optional rows, one slot for the root
//! and one per join, with `None` standing in for an unmatched `LEFT JOIN`.
//! Predicates use three-valued logic: `None` is SQL unknown and only
//! `Some(true)` keeps a tuple.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use sift_query::Value;

use crate::criteria::{compare_values, distinct_key, like_matches, sort_order, sql_equals};
use crate::error::{PageError, Result};
use crate::executor::Row;
use crate::plan::{
	AggregateFunction, Comparison, Join, Operand, ParamRef, Parameters, Predicate, QueryPlan,
	Selection, Source, SubqueryPlan, SubquerySelection,
};

pub(super) type Tables = HashMap<String, Arc<Vec<Row>>>;

type Tuple<'e> = Vec<Option<&'e Row>>;

/// What operands are evaluated against.
#[derive(Clone, Copy)]
enum Frame<'f, 'e> {
	Tuple(&'f [Option<&'e Row>]),
	/// Every tuple of one group; aggregates range over all of them.
	Group(&'f [Tuple<'e>]),
}

/// The statement an operand belongs to.
#[derive(Clone, Copy)]
struct Scope<'s> {
	id_column: &'s str,
	/// Identity of the enclosing statement's current root row.
	outer: Option<&'s Value>,
}

pub(super) struct Evaluator<'e> {
	tables: &'e Tables,
	parameters: &'e Parameters,
}

impl<'e> Evaluator<'e> {
	pub(super) fn new(tables: &'e Tables, parameters: &'e Parameters) -> Self {
		Self { tables, parameters }
	}

	pub(super) fn fetch(&self, plan: &QueryPlan) -> Result<Vec<Row>> {
		let scope = Scope {
			id_column: &plan.id_column,
			outer: None,
		};
		let tuples = self.expand(self.rows(&plan.table).iter(), &plan.joins);
		let tuples = self.filter(scope, tuples, plan.predicate.as_ref())?;

		let aggregated = plan.selection.is_count()
			|| plan.having.is_some()
			|| matches!(&plan.selection, Selection::Projection(columns)
				if columns.iter().any(|(_, operand)| operand.is_aggregate()));
		let groups = if !plan.group_by.is_empty() {
			self.group(scope, tuples, &plan.group_by)?
		} else if aggregated {
			vec![tuples]
		} else {
			tuples.into_iter().map(|tuple| vec![tuple]).collect()
		};

		let mut selected = Vec::with_capacity(groups.len());
		for group in &groups {
			let frame = Frame::Group(group);
			if let Some(having) = &plan.having
				&& self.predicate(scope, frame, having)? != Some(true)
			{
				continue;
			}
			let Some(row) = self.select(scope, group, &plan.selection)? else {
				continue;
			};
			let keys = plan
				.order_by
				.iter()
				.map(|directive| self.operand(scope, frame, &directive.operand))
				.collect::<Result<Vec<_>>>()?;
			selected.push((row, keys));
		}

		selected.sort_by(|(_, left), (_, right)| {
			left.iter()
				.zip(right)
				.zip(&plan.order_by)
				.map(|((l, r), directive)| {
					let ordering = sort_order(l, r);
					if directive.ascending {
						ordering
					} else {
						ordering.reverse()
					}
				})
				.find(|ordering| *ordering != Ordering::Equal)
				.unwrap_or(Ordering::Equal)
		});

		let mut rows: Vec<Row> = selected.into_iter().map(|(row, _)| row).collect();
		if plan.distinct {
			let mut seen = IndexSet::new();
			rows.retain(|row| seen.insert(row_key(row)));
		}
		let offset = plan.offset.map_or(0, to_usize);
		let limit = plan.limit.map_or(usize::MAX, to_usize);
		Ok(rows.into_iter().skip(offset).take(limit).collect())
	}

	fn select(&self, scope: Scope<'_>, group: &[Tuple<'e>], selection: &Selection) -> Result<Option<Row>> {
		let frame = Frame::Group(group);
		let row = match selection {
			Selection::Entity => match group.first().and_then(|tuple| tuple.first().copied().flatten()) {
				Some(root) => root.clone(),
				None => return Ok(None),
			},
			Selection::Projection(columns) => columns
				.iter()
				.map(|(name, operand)| Ok((name.clone(), self.operand(scope, frame, operand)?)))
				.collect::<Result<Row>>()?,
			Selection::Count => {
				let count = self.operand(scope, frame, &Operand::RootId.aggregate(AggregateFunction::Count))?;
				Row::from([("count".to_string(), count)])
			}
			Selection::CountDistinct => {
				let count = self.operand(
					scope,
					frame,
					&Operand::RootId.aggregate(AggregateFunction::CountDistinct),
				)?;
				Row::from([("count".to_string(), count)])
			}
		};
		Ok(Some(row))
	}

	fn rows(&self, table: &str) -> &'e [Row] {
		self.tables.get(table).map_or(&[], |rows| rows.as_slice())
	}

	/// `LEFT JOIN` every join onto `roots`.
	fn expand(&self, roots: impl Iterator<Item = &'e Row>, joins: &[Join]) -> Vec<Tuple<'e>> {
		let mut tuples: Vec<Tuple<'e>> = roots.map(|root| vec![Some(root)]).collect();
		for join in joins {
			let parent = slot(join.parent);
			let candidates = self.rows(&join.table);
			let mut expanded = Vec::with_capacity(tuples.len());
			for tuple in tuples {
				let key = tuple
					.get(parent)
					.copied()
					.flatten()
					.map(|row| column(row, &join.parent_column));
				let matches: Vec<&'e Row> = match key {
					Some(key) => candidates
						.iter()
						.filter(|row| sql_equals(&column(row, &join.target_column), &key) == Some(true))
						.collect(),
					None => Vec::new(),
				};
				if matches.is_empty() {
					let mut tuple = tuple;
					tuple.push(None);
					expanded.push(tuple);
				} else {
					for row in matches {
						let mut joined = tuple.clone();
						joined.push(Some(row));
						expanded.push(joined);
					}
				}
			}
			tuples = expanded;
		}
		tuples
	}

	fn filter(
		&self,
		scope: Scope<'_>,
		tuples: Vec<Tuple<'e>>,
		predicate: Option<&Predicate>,
	) -> Result<Vec<Tuple<'e>>> {
		let Some(predicate) = predicate else {
			return Ok(tuples);
		};
		let mut kept = Vec::with_capacity(tuples.len());
		for tuple in tuples {
			if self.predicate(scope, Frame::Tuple(&tuple), predicate)? == Some(true) {
				kept.push(tuple);
			}
		}
		Ok(kept)
	}

	/// Partition `tuples` by the values of `keys`, in first-seen order.
	fn group(&self, scope: Scope<'_>, tuples: Vec<Tuple<'e>>, keys: &[Operand]) -> Result<Vec<Vec<Tuple<'e>>>> {
		let mut groups: IndexMap<Vec<String>, Vec<Tuple<'e>>> = IndexMap::new();
		for tuple in tuples {
			let key = keys
				.iter()
				.map(|operand| Ok(distinct_key(&self.operand(scope, Frame::Tuple(&tuple), operand)?)))
				.collect::<Result<Vec<_>>>()?;
			groups.entry(key).or_default().push(tuple);
		}
		Ok(groups.into_values().collect())
	}

	fn operand(&self, scope: Scope<'_>, frame: Frame<'_, 'e>, operand: &Operand) -> Result<Value> {
		match (operand, frame) {
			(Operand::Aggregate(function, inner), Frame::Group(tuples)) => {
				let mut values = Vec::with_capacity(tuples.len());
				for tuple in tuples {
					let value = self.operand(scope, Frame::Tuple(tuple), inner)?;
					if !value.is_null() {
						values.push(value);
					}
				}
				Ok(aggregate(*function, values))
			}
			(Operand::Aggregate(..), Frame::Tuple(_)) => Err(PageError::Execution(
				"aggregate evaluated outside a grouped query".to_string(),
			)),
			(Operand::Lower(inner), _) => Ok(text(self.operand(scope, frame, inner)?, true)),
			(Operand::AsText(inner), _) => Ok(text(self.operand(scope, frame, inner)?, false)),
			(_, Frame::Group(tuples)) => match tuples.first() {
				Some(tuple) => self.operand(scope, Frame::Tuple(tuple), operand),
				None => Ok(Value::default()),
			},
			(Operand::Field(field), Frame::Tuple(tuple)) => Ok(tuple
				.get(slot(field.source))
				.copied()
				.flatten()
				.map(|row| column(row, &field.column))
				.unwrap_or_default()),
			(Operand::RootId, Frame::Tuple(tuple)) => Ok(tuple
				.first()
				.copied()
				.flatten()
				.map(|row| column(row, scope.id_column))
				.unwrap_or_default()),
			(Operand::OuterRootId, Frame::Tuple(_)) => scope.outer.cloned().ok_or_else(|| {
				PageError::Execution("outer identity referenced outside a subquery".to_string())
			}),
		}
	}

	fn param(&self, param: &ParamRef) -> Result<&'e Value> {
		self.parameters.value(param)
	}

	fn predicate(&self, scope: Scope<'_>, frame: Frame<'_, 'e>, predicate: &Predicate) -> Result<Option<bool>> {
		Ok(match predicate {
			Predicate::IsNull(operand) => Some(self.operand(scope, frame, operand)?.is_null()),
			Predicate::Compare { operand, op, value } => {
				compare(&self.operand(scope, frame, operand)?, *op, self.param(value)?)
			}
			Predicate::Between { operand, min, max } => {
				let value = self.operand(scope, frame, operand)?;
				and([
					compare(&value, Comparison::Gte, self.param(min)?),
					compare(&value, Comparison::Lte, self.param(max)?),
				])
			}
			Predicate::Like { operand, pattern } => {
				let value = self.operand(scope, frame, operand)?;
				match (value.to_text(), self.param(pattern)?.to_text()) {
					(Some(text), Some(pattern)) => Some(like_matches(&text, &pattern)),
					_ => None,
				}
			}
			Predicate::In { operand, values } => {
				let value = self.operand(scope, frame, operand)?;
				let mut outcomes = Vec::with_capacity(values.len());
				for param in values {
					outcomes.push(sql_equals(&value, self.param(param)?));
				}
				or(outcomes)
			}
			Predicate::And(predicates) => and(self.each(scope, frame, predicates)?),
			Predicate::Or(predicates) => or(self.each(scope, frame, predicates)?),
			Predicate::Not(inner) => self.predicate(scope, frame, inner)?.map(|matched| !matched),
			Predicate::CountEquals { subquery, count } => {
				let outer = self.operand(scope, frame, &Operand::RootId)?;
				let actual = self.subquery_count(subquery, &outer)?;
				sql_equals(&actual, self.param(count)?)
			}
			Predicate::InSubquery { operand, subquery } => {
				let value = self.operand(scope, frame, operand)?;
				if value.is_null() {
					None
				} else {
					let outer = self.operand(scope, frame, &Operand::RootId)?;
					let ids = self.subquery_ids(subquery, &outer)?;
					Some(ids.iter().any(|id| sql_equals(&value, id) == Some(true)))
				}
			}
			Predicate::Exists(subquery) => {
				let outer = self.operand(scope, frame, &Operand::RootId)?;
				Some(!self.subquery_ids(subquery, &outer)?.is_empty())
			}
		})
	}

	fn each(
		&self,
		scope: Scope<'_>,
		frame: Frame<'_, 'e>,
		predicates: &[Predicate],
	) -> Result<Vec<Option<bool>>> {
		predicates
			.iter()
			.map(|predicate| self.predicate(scope, frame, predicate))
			.collect()
	}

	/// Tuples of `plan` passing its `WHERE`, for the outer row `outer`.
	fn subquery_tuples(&self, plan: &SubqueryPlan, outer: &Value) -> Result<Vec<Tuple<'e>>> {
		let scope = Scope {
			id_column: &plan.id_column,
			outer: Some(outer),
		};
		let roots = self
			.rows(&plan.table)
			.iter()
			.filter(|row| !plan.correlated || sql_equals(&column(row, &plan.id_column), outer) == Some(true));
		let tuples = self.expand(roots, &plan.joins);
		self.filter(scope, tuples, plan.predicate.as_ref())
	}

	fn subquery_ids(&self, plan: &SubqueryPlan, outer: &Value) -> Result<Vec<Value>> {
		let scope = Scope {
			id_column: &plan.id_column,
			outer: Some(outer),
		};
		let tuples = self.subquery_tuples(plan, outer)?;
		let groups = if plan.group_by_root || plan.having.is_some() {
			self.group(scope, tuples, &[Operand::RootId])?
		} else {
			tuples.into_iter().map(|tuple| vec![tuple]).collect()
		};
		let mut ids = Vec::with_capacity(groups.len());
		for group in &groups {
			let frame = Frame::Group(group);
			if let Some(having) = &plan.having
				&& self.predicate(scope, frame, having)? != Some(true)
			{
				continue;
			}
			ids.push(self.operand(scope, frame, &Operand::RootId)?);
		}
		Ok(ids)
	}

	fn subquery_count(&self, plan: &SubqueryPlan, outer: &Value) -> Result<Value> {
		match &plan.selection {
			SubquerySelection::CountDistinct(operand) => {
				let scope = Scope {
					id_column: &plan.id_column,
					outer: Some(outer),
				};
				let tuples = self.subquery_tuples(plan, outer)?;
				self.operand(
					scope,
					Frame::Group(&tuples),
					&operand.clone().aggregate(AggregateFunction::CountDistinct),
				)
			}
			SubquerySelection::RootId => {
				let ids = self.subquery_ids(plan, outer)?;
				Ok(Value::from(i64::try_from(ids.len()).unwrap_or(i64::MAX)))
			}
		}
	}
}

fn slot(source: Source) -> usize {
	match source {
		Source::Root => 0,
		Source::Join(idx) => idx + 1,
	}
}

fn column(row: &Row, name: &str) -> Value {
	row.get(name).cloned().unwrap_or_default()
}

fn to_usize(value: u64) -> usize {
	usize::try_from(value).unwrap_or(usize::MAX)
}

fn row_key(row: &Row) -> Vec<String> {
	row.values().map(distinct_key).collect()
}

fn text(value: Value, lower: bool) -> Value {
	match value.to_text() {
		Some(text) if lower => Value::from(text.to_lowercase()),
		Some(text) => Value::from(text),
		None => Value::default(),
	}
}

fn compare(left: &Value, op: Comparison, right: &Value) -> Option<bool> {
	if left.is_null() || right.is_null() {
		return None;
	}
	Some(match compare_values(left, right) {
		Some(ordering) => op.holds(ordering),
		None => op == Comparison::Ne,
	})
}

fn and(outcomes: impl IntoIterator<Item = Option<bool>>) -> Option<bool> {
	let mut result = Some(true);
	for outcome in outcomes {
		match outcome {
			Some(false) => return Some(false),
			None => result = None,
			Some(true) => {}
		}
	}
	result
}

fn or(outcomes: impl IntoIterator<Item = Option<bool>>) -> Option<bool> {
	let mut result = Some(false);
	for outcome in outcomes {
		match outcome {
			Some(true) => return Some(true),
			None => result = None,
			Some(false) => {}
		}
	}
	result
}

fn aggregate(function: AggregateFunction, values: Vec<Value>) -> Value {
	let count = |n: usize| Value::from(i64::try_from(n).unwrap_or(i64::MAX));
	match function {
		AggregateFunction::Count => count(values.len()),
		AggregateFunction::CountDistinct => {
			count(values.iter().map(distinct_key).collect::<IndexSet<_>>().len())
		}
		AggregateFunction::Sum if values.is_empty() => Value::BigInt(None),
		AggregateFunction::Sum => match values.iter().map(Value::as_i64).sum::<Option<i64>>() {
			Some(total) => Value::from(total),
			None => Value::from(values.iter().filter_map(Value::as_f64).sum::<f64>()),
		},
		AggregateFunction::Avg if values.is_empty() => Value::Double(None),
		AggregateFunction::Avg => {
			let total: f64 = values.iter().filter_map(Value::as_f64).sum();
			Value::from(total / values.len() as f64)
		}
		AggregateFunction::Min => values
			.into_iter()
			.min_by(|a, b| sort_order(a, b))
			.unwrap_or_default(),
		AggregateFunction::Max => values
			.into_iter()
			.max_by(|a, b| sort_order(a, b))
			.unwrap_or_default(),
	}
}
