//! SQL function builders.
//!
//! This module provides the [`Func`] struct with static methods for
//! constructing the function calls the paging compiler emits.

use super::simple_expr::SimpleExpr;
use crate::types::{IntoIden, UnOper};

/// SQL function builder.
///
/// # Examples
///
/// ```rust
/// use sift_query::{Expr, Func};
///
/// // COUNT(*)
/// let count_all = Func::count(Expr::asterisk().into_simple_expr());
///
/// // COUNT(DISTINCT "t1"."value")
/// let tags = Func::count_distinct(Expr::col(("t1", "value")).into_simple_expr());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Func;

impl Func {
	/// Create a COUNT(expr) function call.
	pub fn count(expr: SimpleExpr) -> SimpleExpr {
		SimpleExpr::FunctionCall("COUNT".into_iden(), vec![expr])
	}

	/// Create a COUNT(DISTINCT expr) function call.
	pub fn count_distinct(expr: SimpleExpr) -> SimpleExpr {
		SimpleExpr::FunctionCall(
			"COUNT".into_iden(),
			vec![SimpleExpr::Unary(UnOper::Distinct, Box::new(expr))],
		)
	}

	/// Create a SUM(expr) function call.
	pub fn sum(expr: SimpleExpr) -> SimpleExpr {
		SimpleExpr::FunctionCall("SUM".into_iden(), vec![expr])
	}

	/// Create an AVG(expr) function call.
	pub fn avg(expr: SimpleExpr) -> SimpleExpr {
		SimpleExpr::FunctionCall("AVG".into_iden(), vec![expr])
	}

	/// Create a MIN(expr) function call.
	pub fn min(expr: SimpleExpr) -> SimpleExpr {
		SimpleExpr::FunctionCall("MIN".into_iden(), vec![expr])
	}

	/// Create a MAX(expr) function call.
	pub fn max(expr: SimpleExpr) -> SimpleExpr {
		SimpleExpr::FunctionCall("MAX".into_iden(), vec![expr])
	}

	/// Create a LOWER(expr) function call.
	pub fn lower(expr: SimpleExpr) -> SimpleExpr {
		SimpleExpr::FunctionCall("LOWER".into_iden(), vec![expr])
	}

	/// Create a call to an arbitrary function, e.g. `TO_CHAR(x, 'FM999')`.
	pub fn cust<F>(name: F, args: Vec<SimpleExpr>) -> SimpleExpr
	where
		F: IntoIden,
	{
		SimpleExpr::FunctionCall(name.into_iden(), args)
	}
}
