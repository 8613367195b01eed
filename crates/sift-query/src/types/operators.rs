//! SQL operators for expressions.
//!
//! This module provides operators used in SQL expressions:
//!
//! - [`UnOper`]: Unary operators (NOT, DISTINCT)
//! - [`BinOper`]: Binary operators (AND, OR, =, <, etc.)

/// Unary operators.
///
/// These operators take a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOper {
	/// Logical NOT
	Not,
	/// DISTINCT qualifier inside an aggregate call, e.g. `COUNT(DISTINCT x)`
	Distinct,
}

impl UnOper {
	/// Returns the SQL representation of this operator.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Not => "NOT",
			Self::Distinct => "DISTINCT",
		}
	}
}

/// Binary operators.
///
/// These operators take two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOper {
	// Logical operators
	/// Logical AND
	And,
	/// Logical OR
	Or,

	// Comparison operators
	/// Equal (=)
	Equal,
	/// Not equal (<>)
	NotEqual,
	/// Less than (<)
	SmallerThan,
	/// Less than or equal (<=)
	SmallerThanOrEqual,
	/// Greater than (>)
	GreaterThan,
	/// Greater than or equal (>=)
	GreaterThanOrEqual,

	// Pattern matching
	/// LIKE
	Like,
	/// NOT LIKE
	NotLike,

	// Set membership
	/// IN
	In,
	/// NOT IN
	NotIn,
	/// BETWEEN
	Between,
	/// NOT BETWEEN
	NotBetween,

	// NULL checks
	/// IS
	Is,
	/// IS NOT
	IsNot,
}

impl BinOper {
	/// Returns the SQL representation of this operator.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::And => "AND",
			Self::Or => "OR",
			Self::Equal => "=",
			Self::NotEqual => "<>",
			Self::SmallerThan => "<",
			Self::SmallerThanOrEqual => "<=",
			Self::GreaterThan => ">",
			Self::GreaterThanOrEqual => ">=",
			Self::Like => "LIKE",
			Self::NotLike => "NOT LIKE",
			Self::In => "IN",
			Self::NotIn => "NOT IN",
			Self::Between => "BETWEEN",
			Self::NotBetween => "NOT BETWEEN",
			Self::Is => "IS",
			Self::IsNot => "IS NOT",
		}
	}

	/// Whether an operand built with this operator needs parentheses when
	/// nested inside another binary expression.
	#[must_use]
	pub fn is_logical(&self) -> bool {
		matches!(self, Self::And | Self::Or)
	}
}
