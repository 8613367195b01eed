//! SELECT statement builder.

use crate::expr::{ConditionHolder, IntoCondition, SimpleExpr};
use crate::types::{
	DynIden, IntoColumnRef, IntoIden, IntoTableRef, JoinExpr, JoinType, Order, OrderExpr,
	TableRef,
};
use crate::value::Value;

/// A single item of the select list, with optional alias.
#[derive(Debug, Clone)]
pub struct SelectExpr {
	/// The selected expression
	pub expr: SimpleExpr,
	/// Optional `AS` alias
	pub alias: Option<DynIden>,
}

/// A `SELECT` statement.
///
/// Builder methods take `&mut self` and return `&mut Self` so calls can be
/// chained on a binding.
///
/// # Example
///
/// ```rust
/// use sift_query::{Expr, ExprTrait, Order, PostgresQueryBuilder, Query, QueryBuilder};
///
/// let mut stmt = Query::select();
/// stmt.column(("t0", "id"))
///     .from_as("person", "t0")
///     .and_where(Expr::col(("t0", "name")).eq("alice"))
///     .order_by_expr(Expr::col(("t0", "id")).into_simple_expr(), Order::Desc)
///     .limit(10);
///
/// let (sql, values) = PostgresQueryBuilder::new().build_select(&stmt);
/// assert_eq!(
///     sql,
///     r#"SELECT "t0"."id" FROM "person" AS "t0" WHERE "t0"."name" = $1 ORDER BY "t0"."id" DESC LIMIT $2"#
/// );
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectStatement {
	pub(crate) distinct: bool,
	pub(crate) selects: Vec<SelectExpr>,
	pub(crate) from: Vec<TableRef>,
	pub(crate) join: Vec<JoinExpr>,
	pub(crate) r#where: ConditionHolder,
	pub(crate) groups: Vec<SimpleExpr>,
	pub(crate) having: ConditionHolder,
	pub(crate) orders: Vec<OrderExpr>,
	pub(crate) limit: Option<Value>,
	pub(crate) offset: Option<Value>,
}

impl SelectStatement {
	/// Create an empty statement. Prefer [`Query::select`](super::Query::select).
	pub fn new() -> Self {
		Self::default()
	}

	/// Mark the statement `SELECT DISTINCT`.
	pub fn distinct(&mut self) -> &mut Self {
		self.distinct = true;
		self
	}

	/// Select a column.
	pub fn column<C>(&mut self, col: C) -> &mut Self
	where
		C: IntoColumnRef,
	{
		self.expr(SimpleExpr::Column(col.into_column_ref()))
	}

	/// Select an arbitrary expression.
	pub fn expr<E>(&mut self, expr: E) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.selects.push(SelectExpr {
			expr: expr.into(),
			alias: None,
		});
		self
	}

	/// Select an expression under an alias.
	pub fn expr_as<E, A>(&mut self, expr: E, alias: A) -> &mut Self
	where
		E: Into<SimpleExpr>,
		A: IntoIden,
	{
		self.selects.push(SelectExpr {
			expr: expr.into(),
			alias: Some(alias.into_iden()),
		});
		self
	}

	/// Add a table to the FROM clause.
	pub fn from<T>(&mut self, table: T) -> &mut Self
	where
		T: IntoTableRef,
	{
		self.from.push(table.into_table_ref());
		self
	}

	/// Add an aliased table to the FROM clause.
	pub fn from_as<T, A>(&mut self, table: T, alias: A) -> &mut Self
	where
		T: IntoIden,
		A: IntoIden,
	{
		self.from.push(TableRef::table_alias(table, alias));
		self
	}

	/// Add a JOIN clause.
	pub fn join<T, C>(&mut self, join: JoinType, table: T, on: C) -> &mut Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join.push(JoinExpr {
			join,
			table: table.into_table_ref(),
			on: Some(on.into_condition()),
		});
		self
	}

	/// Add a LEFT JOIN clause.
	pub fn left_join<T, C>(&mut self, table: T, on: C) -> &mut Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::LeftJoin, table, on)
	}

	/// Add a WHERE condition, AND-ed with existing ones.
	pub fn and_where<C>(&mut self, condition: C) -> &mut Self
	where
		C: IntoCondition,
	{
		self.r#where.add_and(condition);
		self
	}

	/// Add a GROUP BY expression.
	pub fn group_by_expr<E>(&mut self, expr: E) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.groups.push(expr.into());
		self
	}

	/// Add a GROUP BY column.
	pub fn group_by_col<C>(&mut self, col: C) -> &mut Self
	where
		C: IntoColumnRef,
	{
		self.group_by_expr(SimpleExpr::Column(col.into_column_ref()))
	}

	/// Add a HAVING condition, AND-ed with existing ones.
	pub fn and_having<C>(&mut self, condition: C) -> &mut Self
	where
		C: IntoCondition,
	{
		self.having.add_and(condition);
		self
	}

	/// Add an ORDER BY item.
	pub fn order_by_expr(&mut self, expr: SimpleExpr, order: Order) -> &mut Self {
		self.orders.push(OrderExpr { expr, order });
		self
	}

	/// Set the LIMIT.
	pub fn limit(&mut self, limit: u64) -> &mut Self {
		self.limit = Some(Value::BigInt(Some(clamp_to_i64(limit))));
		self
	}

	/// Set the OFFSET.
	pub fn offset(&mut self, offset: u64) -> &mut Self {
		self.offset = Some(Value::BigInt(Some(clamp_to_i64(offset))));
		self
	}

	/// Whether `DISTINCT` is set.
	pub fn is_distinct(&self) -> bool {
		self.distinct
	}

	/// Number of JOIN clauses.
	pub fn join_count(&self) -> usize {
		self.join.len()
	}
}

fn clamp_to_i64(v: u64) -> i64 {
	i64::try_from(v).unwrap_or(i64::MAX)
}
