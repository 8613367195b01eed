//! Expr - The expression builder.
//!
//! This module provides [`Expr`], a builder for creating SQL expressions.

use super::simple_expr::{Keyword, SimpleExpr, SubQueryOper};
use crate::query::SelectStatement;
use crate::types::{BinOper, IntoColumnRef, IntoIden};
use crate::value::IntoValue;

/// Expression builder for creating SQL expressions.
///
/// `Expr` provides static methods to create expressions; operations on them
/// come from [`ExprTrait`](super::ExprTrait).
///
/// # Example
///
/// ```rust
/// use sift_query::{Expr, ExprTrait};
///
/// let expr = Expr::col("age").gte(18).and(Expr::col("active").eq(true));
/// ```
#[derive(Debug, Clone)]
pub struct Expr(SimpleExpr);

impl Expr {
	/// Create an expression from a column reference.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::Expr;
	///
	/// let expr = Expr::col("name");
	/// let qualified = Expr::col(("t0", "name"));
	/// ```
	pub fn col<C>(col: C) -> Self
	where
		C: IntoColumnRef,
	{
		Self(SimpleExpr::Column(col.into_column_ref()))
	}

	/// Create a value expression.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::Expr;
	///
	/// let expr = Expr::val(42);
	/// let expr2 = Expr::val("hello");
	/// ```
	pub fn val<V>(val: V) -> Self
	where
		V: IntoValue,
	{
		Self(SimpleExpr::Value(val.into_value()))
	}

	/// Create a custom SQL fragment, written verbatim.
	pub fn cust<S>(sql: S) -> Self
	where
		S: Into<String>,
	{
		Self(SimpleExpr::Custom(sql.into()))
	}

	/// Create a tuple expression.
	pub fn tuple<I>(exprs: I) -> Self
	where
		I: IntoIterator<Item = Self>,
	{
		Self(SimpleExpr::Tuple(
			exprs.into_iter().map(|e| e.into_simple_expr()).collect(),
		))
	}

	/// Create an asterisk expression (`*`).
	pub fn asterisk() -> Self {
		Self(SimpleExpr::Asterisk)
	}

	/// Create a standalone subquery expression, e.g. `(SELECT COUNT(...) ...)`.
	pub fn subquery(select: SelectStatement) -> Self {
		Self(SimpleExpr::SubQuery(None, Box::new(select)))
	}

	/// Create an EXISTS subquery expression.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::{Expr, ExprTrait, Query};
	///
	/// let mut subquery = Query::select();
	/// subquery
	///     .column("id")
	///     .from("orders")
	///     .and_where(Expr::col(("orders", "user_id")).eq(Expr::col(("users", "id"))));
	/// let exists = Expr::exists(subquery);
	/// ```
	pub fn exists(select: SelectStatement) -> Self {
		Self(SimpleExpr::SubQuery(
			Some(SubQueryOper::Exists),
			Box::new(select),
		))
	}

	/// Create a NOT EXISTS subquery expression.
	pub fn not_exists(select: SelectStatement) -> Self {
		Self(SimpleExpr::SubQuery(
			Some(SubQueryOper::NotExists),
			Box::new(select),
		))
	}

	/// Create an IN subquery expression.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::{Expr, Query};
	///
	/// let mut subquery = Query::select();
	/// subquery.column("user_id").from("premium_users");
	/// let in_expr = Expr::col("id").in_subquery(subquery);
	/// ```
	pub fn in_subquery(self, select: SelectStatement) -> Self {
		Self(SimpleExpr::Binary(
			Box::new(self.0),
			BinOper::In,
			Box::new(SimpleExpr::SubQuery(
				Some(SubQueryOper::In),
				Box::new(select),
			)),
		))
	}

	/// Create a `CAST(expr AS type)` expression.
	pub fn cast_as<E, T>(expr: E, type_name: T) -> Self
	where
		E: Into<SimpleExpr>,
		T: IntoIden,
	{
		Self(SimpleExpr::Cast(Box::new(expr.into()), type_name.into_iden()))
	}

	/// Create a NULL constant expression.
	pub fn null() -> Self {
		Self(SimpleExpr::Constant(Keyword::Null))
	}

	/// Convert this Expr into a SimpleExpr.
	#[must_use]
	pub fn into_simple_expr(self) -> SimpleExpr {
		self.0
	}

	/// Get a reference to the underlying SimpleExpr.
	#[must_use]
	pub fn as_simple_expr(&self) -> &SimpleExpr {
		&self.0
	}
}

// Allow Expr to be converted into SimpleExpr
impl From<Expr> for SimpleExpr {
	fn from(e: Expr) -> Self {
		e.0
	}
}

// Allow creating Expr from SimpleExpr
impl From<SimpleExpr> for Expr {
	fn from(e: SimpleExpr) -> Self {
		Self(e)
	}
}
