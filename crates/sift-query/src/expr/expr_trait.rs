//! Expression operations.

use super::simple_expr::{Keyword, SimpleExpr};
use crate::types::{BinOper, UnOper};

/// Operations available on anything convertible into a [`SimpleExpr`].
///
/// # Example
///
/// ```rust
/// use sift_query::{Expr, ExprTrait};
///
/// let active_adults = Expr::col("age").gte(18).and(Expr::col("active").eq(true));
/// let names = Expr::col("name").is_in(["alice", "bob"]);
/// ```
pub trait ExprTrait: Sized {
	/// Convert into the underlying expression.
	fn into_expr(self) -> SimpleExpr;

	/// Combine with another expression using a binary operator.
	fn binary<R>(self, op: BinOper, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		SimpleExpr::Binary(Box::new(self.into_expr()), op, Box::new(right.into()))
	}

	/// `self = right`
	fn eq<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::Equal, right)
	}

	/// `self <> right`
	fn ne<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::NotEqual, right)
	}

	/// `self < right`
	fn lt<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::SmallerThan, right)
	}

	/// `self <= right`
	fn lte<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::SmallerThanOrEqual, right)
	}

	/// `self > right`
	fn gt<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::GreaterThan, right)
	}

	/// `self >= right`
	fn gte<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::GreaterThanOrEqual, right)
	}

	/// `self LIKE pattern`
	fn like<R>(self, pattern: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::Like, pattern)
	}

	/// `self LIKE pattern ESCAPE 'escape'`
	fn like_escape<R>(self, pattern: R, escape: char) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		SimpleExpr::LikeEscape(Box::new(self.into_expr()), Box::new(pattern.into()), escape)
	}

	/// `self BETWEEN min AND max`
	fn between<A, B>(self, min: A, max: B) -> SimpleExpr
	where
		A: Into<SimpleExpr>,
		B: Into<SimpleExpr>,
	{
		self.binary(
			BinOper::Between,
			SimpleExpr::Tuple(vec![min.into(), max.into()]),
		)
	}

	/// `self IN (v1, v2, ...)`
	fn is_in<I, V>(self, values: I) -> SimpleExpr
	where
		I: IntoIterator<Item = V>,
		V: Into<SimpleExpr>,
	{
		self.binary(
			BinOper::In,
			SimpleExpr::Tuple(values.into_iter().map(Into::into).collect()),
		)
	}

	/// `self IS NULL`
	fn is_null(self) -> SimpleExpr {
		self.binary(BinOper::Is, SimpleExpr::Constant(Keyword::Null))
	}

	/// `self IS NOT NULL`
	fn is_not_null(self) -> SimpleExpr {
		self.binary(BinOper::IsNot, SimpleExpr::Constant(Keyword::Null))
	}

	/// `self AND right`
	fn and<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::And, right)
	}

	/// `self OR right`
	fn or<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		self.binary(BinOper::Or, right)
	}

	/// `NOT self`
	fn not(self) -> SimpleExpr {
		SimpleExpr::Unary(UnOper::Not, Box::new(self.into_expr()))
	}
}

impl<T> ExprTrait for T
where
	T: Into<SimpleExpr>,
{
	fn into_expr(self) -> SimpleExpr {
		self.into()
	}
}
