//! Lowering of query plans to SQL statements.
//!
//! Tables are aliased `t0`, `t1`, ... in the order they are first seen,
//! nested subqueries included, so aliases never collide across scopes.
//! Bound parameters are inlined as statement values and written as
//! placeholders by the dialect's [`QueryBuilder`].

use sift_query::{
	BinOper, ColumnRef, Cond, Condition, Expr, ExprTrait, Func, Order, Query, QueryBuilder,
	SelectStatement, SimpleExpr, TableRef, Values,
};

use crate::capabilities::{BackendCapabilities, NumericTextCast};
use crate::criteria::LIKE_ESCAPE;
use crate::error::{PageError, Result};
use crate::plan::{
	AggregateFunction, Comparison, Join, Operand, ParamRef, Parameters, Predicate, QueryPlan,
	Selection, Source, SubqueryPlan, SubquerySelection,
};

/// Turns [`QueryPlan`]s into [`SelectStatement`]s for one backend.
#[derive(Debug, Clone, Copy)]
pub struct SqlLowering<'a> {
	capabilities: &'a BackendCapabilities,
}

impl<'a> SqlLowering<'a> {
	pub fn new(capabilities: &'a BackendCapabilities) -> Self {
		Self { capabilities }
	}

	pub fn lower(&self, plan: &QueryPlan) -> Result<SelectStatement> {
		let mut lowerer = Lowerer {
			capabilities: self.capabilities,
			parameters: &plan.parameters,
			next_alias: 0,
		};
		lowerer.query(plan)
	}

	/// Lower `plan` and write it in `builder`'s dialect.
	pub fn to_sql<B>(&self, plan: &QueryPlan, builder: &B) -> Result<(String, Values)>
	where
		B: QueryBuilder + ?Sized,
	{
		Ok(builder.build_select(&self.lower(plan)?))
	}
}

/// Table aliases visible to one statement.
struct Scope {
	root: String,
	id_column: String,
	joins: Vec<String>,
	/// Root alias and identity column of the enclosing statement.
	outer: Option<(String, String)>,
}

impl Scope {
	fn alias(&self, source: Source) -> Result<&str> {
		match source {
			Source::Root => Ok(&self.root),
			Source::Join(idx) => self
				.joins
				.get(idx)
				.map(String::as_str)
				.ok_or_else(|| PageError::Execution(format!("plan references missing join {idx}"))),
		}
	}

	fn root_id(&self) -> SimpleExpr {
		column(&self.root, &self.id_column)
	}
}

struct Lowerer<'l> {
	capabilities: &'l BackendCapabilities,
	parameters: &'l Parameters,
	next_alias: usize,
}

impl Lowerer<'_> {
	fn alias(&mut self) -> String {
		let alias = format!("t{}", self.next_alias);
		self.next_alias += 1;
		alias
	}

	fn query(&mut self, plan: &QueryPlan) -> Result<SelectStatement> {
		let mut stmt = Query::select();
		let scope = self.scope(&mut stmt, &plan.table, &plan.id_column, &plan.joins, None)?;

		match &plan.selection {
			Selection::Entity => {
				stmt.column(ColumnRef::table_asterisk(scope.root.clone()));
			}
			Selection::Projection(columns) => {
				for (name, operand) in columns {
					stmt.expr_as(self.operand(&scope, operand)?, name.clone());
				}
			}
			Selection::Count => {
				stmt.expr(Func::count(scope.root_id()));
			}
			Selection::CountDistinct => {
				stmt.expr(Func::count_distinct(scope.root_id()));
			}
		}
		if plan.distinct && !plan.selection.is_count() {
			stmt.distinct();
		}
		if let Some(predicate) = &plan.predicate {
			stmt.and_where(self.predicate(&scope, predicate)?);
		}
		for operand in &plan.group_by {
			stmt.group_by_expr(self.operand(&scope, operand)?);
		}
		if let Some(having) = &plan.having {
			stmt.and_having(self.predicate(&scope, having)?);
		}
		for directive in &plan.order_by {
			let order = if directive.ascending {
				Order::Asc
			} else {
				Order::Desc
			};
			stmt.order_by_expr(self.operand(&scope, &directive.operand)?, order);
		}
		if let Some(limit) = plan.limit {
			stmt.limit(limit);
		}
		if let Some(offset) = plan.offset {
			stmt.offset(offset);
		}
		Ok(stmt)
	}

	fn subquery(&mut self, outer: &Scope, plan: &SubqueryPlan) -> Result<SelectStatement> {
		let mut stmt = Query::select();
		let enclosing = Some((outer.root.clone(), outer.id_column.clone()));
		let scope = self.scope(&mut stmt, &plan.table, &plan.id_column, &plan.joins, enclosing)?;

		match &plan.selection {
			SubquerySelection::RootId => stmt.expr(scope.root_id()),
			SubquerySelection::CountDistinct(operand) => {
				stmt.expr(Func::count_distinct(self.operand(&scope, operand)?))
			}
		};
		if plan.correlated {
			stmt.and_where(scope.root_id().binary(BinOper::Equal, column(&outer.root, &outer.id_column)));
		}
		if let Some(predicate) = &plan.predicate {
			stmt.and_where(self.predicate(&scope, predicate)?);
		}
		if plan.group_by_root {
			stmt.group_by_expr(scope.root_id());
		}
		if let Some(having) = &plan.having {
			stmt.and_having(self.predicate(&scope, having)?);
		}
		Ok(stmt)
	}

	/// Alias the root and every join into `stmt`.
	fn scope(
		&mut self,
		stmt: &mut SelectStatement,
		table: &str,
		id_column: &str,
		joins: &[Join],
		outer: Option<(String, String)>,
	) -> Result<Scope> {
		let mut scope = Scope {
			root: self.alias(),
			id_column: id_column.to_string(),
			joins: Vec::with_capacity(joins.len()),
			outer,
		};
		stmt.from_as(table.to_string(), scope.root.clone());
		for join in joins {
			let alias = self.alias();
			let on = column(&alias, &join.target_column)
				.binary(BinOper::Equal, column(scope.alias(join.parent)?, &join.parent_column));
			stmt.left_join(TableRef::table_alias(join.table.clone(), alias.clone()), on);
			scope.joins.push(alias);
		}
		Ok(scope)
	}

	fn operand(&self, scope: &Scope, operand: &Operand) -> Result<SimpleExpr> {
		Ok(match operand {
			Operand::Field(field) => column(scope.alias(field.source)?, &field.column),
			Operand::RootId => scope.root_id(),
			Operand::OuterRootId => {
				let (alias, id_column) = scope.outer.as_ref().ok_or_else(|| {
					PageError::Execution("outer identity referenced outside a subquery".to_string())
				})?;
				column(alias, id_column)
			}
			Operand::Lower(inner) => Func::lower(self.operand(scope, inner)?),
			Operand::AsText(inner) => {
				let inner = self.operand(scope, inner)?;
				match &self.capabilities.numeric_text_cast {
					NumericTextCast::Implicit => inner,
					NumericTextCast::Cast { type_name } => {
						Expr::cast_as(inner, type_name.clone()).into_simple_expr()
					}
					NumericTextCast::Function { name, format } => Func::cust(
						name.clone(),
						vec![inner, SimpleExpr::Custom(format!("'{}'", format.replace('\'', "''")))],
					),
				}
			}
			Operand::Aggregate(function, inner) => {
				let inner = self.operand(scope, inner)?;
				match function {
					AggregateFunction::Count => Func::count(inner),
					AggregateFunction::CountDistinct => Func::count_distinct(inner),
					AggregateFunction::Sum => Func::sum(inner),
					AggregateFunction::Avg => Func::avg(inner),
					AggregateFunction::Min => Func::min(inner),
					AggregateFunction::Max => Func::max(inner),
				}
			}
		})
	}

	fn value(&self, param: &ParamRef) -> Result<SimpleExpr> {
		Ok(SimpleExpr::Value(self.parameters.value(param)?.clone()))
	}

	fn predicate(&mut self, scope: &Scope, predicate: &Predicate) -> Result<Condition> {
		let expr = match predicate {
			Predicate::IsNull(operand) => self.operand(scope, operand)?.is_null(),
			Predicate::Compare { operand, op, value } => {
				self.operand(scope, operand)?
					.binary(bin_oper(*op), self.value(value)?)
			}
			Predicate::Between { operand, min, max } => {
				self.operand(scope, operand)?
					.between(self.value(min)?, self.value(max)?)
			}
			Predicate::Like { operand, pattern } => {
				self.operand(scope, operand)?
					.like_escape(self.value(pattern)?, LIKE_ESCAPE)
			}
			Predicate::In { values, .. } if values.is_empty() => return Ok(Cond::any()),
			Predicate::In { operand, values } => {
				let values = values
					.iter()
					.map(|value| self.value(value))
					.collect::<Result<Vec<_>>>()?;
				self.operand(scope, operand)?.is_in(values)
			}
			Predicate::And(predicates) | Predicate::Or(predicates) => {
				let mut condition = if matches!(predicate, Predicate::And(_)) {
					Cond::all()
				} else {
					Cond::any()
				};
				for predicate in predicates {
					condition = condition.add(self.predicate(scope, predicate)?);
				}
				return Ok(condition);
			}
			Predicate::Not(inner) => return Ok(self.predicate(scope, inner)?.not()),
			Predicate::CountEquals { subquery, count } => {
				let count = self.value(count)?;
				Expr::subquery(self.subquery(scope, subquery)?)
					.into_simple_expr()
					.binary(BinOper::Equal, count)
			}
			Predicate::InSubquery { operand, subquery } => {
				let operand = self.operand(scope, operand)?;
				Expr::from(operand)
					.in_subquery(self.subquery(scope, subquery)?)
					.into_simple_expr()
			}
			Predicate::Exists(subquery) => Expr::exists(self.subquery(scope, subquery)?).into_simple_expr(),
		};
		Ok(Cond::all().add(expr))
	}
}

fn column(alias: &str, column: &str) -> SimpleExpr {
	Expr::col((alias.to_string(), column.to_string())).into_simple_expr()
}

fn bin_oper(op: Comparison) -> BinOper {
	match op {
		Comparison::Eq => BinOper::Equal,
		Comparison::Ne => BinOper::NotEqual,
		Comparison::Lt => BinOper::SmallerThan,
		Comparison::Lte => BinOper::SmallerThanOrEqual,
		Comparison::Gt => BinOper::GreaterThan,
		Comparison::Gte => BinOper::GreaterThanOrEqual,
	}
}
