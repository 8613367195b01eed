//! SimpleExpr - The core expression AST.
//!
//! This module defines [`SimpleExpr`], which represents SQL expressions as an
//! abstract syntax tree (AST). All expression operations eventually produce
//! a `SimpleExpr`.

use crate::types::{BinOper, ColumnRef, DynIden, UnOper};
use crate::value::Value;

/// Subquery operators used in SQL expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubQueryOper {
	/// EXISTS (subquery)
	Exists,
	/// NOT EXISTS (subquery)
	NotExists,
	/// IN (subquery), written by the enclosing binary expression
	In,
}

/// A simple SQL expression.
///
/// # Example
///
/// ```rust
/// use sift_query::{BinOper, ColumnRef, SimpleExpr, Value};
///
/// // Binary operation (name = 42)
/// let eq = SimpleExpr::Binary(
///     Box::new(SimpleExpr::Column(ColumnRef::column("name"))),
///     BinOper::Equal,
///     Box::new(SimpleExpr::Value(Value::Int(Some(42)))),
/// );
/// ```
#[derive(Debug, Clone)]
pub enum SimpleExpr {
	/// A column reference (e.g., `name`, `t0.name`)
	Column(ColumnRef),

	/// A literal value, written as a bound parameter
	Value(Value),

	/// A unary operation (e.g., `NOT x`)
	Unary(UnOper, Box<SimpleExpr>),

	/// A binary operation (e.g., `x = y`, `a AND b`)
	Binary(Box<SimpleExpr>, BinOper, Box<SimpleExpr>),

	/// A function call (e.g., `COUNT(x)`, `LOWER(name)`)
	FunctionCall(DynIden, Vec<SimpleExpr>),

	/// A subquery, optionally prefixed by an operator
	SubQuery(Option<SubQueryOper>, Box<crate::query::SelectStatement>),

	/// A tuple of expressions (e.g., `(1, 2, 3)`)
	Tuple(Vec<SimpleExpr>),

	/// A custom SQL fragment written verbatim (e.g., `'FM999'`)
	Custom(String),

	/// A constant keyword
	Constant(Keyword),

	/// An asterisk (`*`)
	Asterisk,

	/// A CAST expression (e.g., `CAST(x AS TEXT)`)
	Cast(Box<SimpleExpr>, DynIden),

	/// A pattern match with an explicit escape character
	/// (e.g., `name LIKE $1 ESCAPE '\'`)
	LikeEscape(Box<SimpleExpr>, Box<SimpleExpr>, char),
}

/// SQL keywords that can appear as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
	/// SQL NULL
	Null,
	/// SQL TRUE
	True,
	/// SQL FALSE
	False,
}

impl Keyword {
	/// Returns the SQL representation of this keyword.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Null => "NULL",
			Self::True => "TRUE",
			Self::False => "FALSE",
		}
	}
}

impl SimpleExpr {
	/// Whether this expression is a logical AND/OR that must be parenthesized
	/// when nested.
	pub(crate) fn is_logical_binary(&self) -> bool {
		matches!(self, Self::Binary(_, op, _) if op.is_logical())
	}
}

impl<T> From<T> for SimpleExpr
where
	T: Into<Value>,
{
	fn from(v: T) -> Self {
		SimpleExpr::Value(v.into())
	}
}
