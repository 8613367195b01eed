//! JOIN clause types.

use super::table_ref::TableRef;
use crate::expr::Condition;

/// Type of a JOIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
	/// INNER JOIN
	InnerJoin,
	/// LEFT JOIN
	LeftJoin,
}

impl JoinType {
	/// Returns the SQL keyword of this join type.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::InnerJoin => "INNER JOIN",
			Self::LeftJoin => "LEFT JOIN",
		}
	}
}

/// A single JOIN clause: type, joined table and ON condition.
#[derive(Debug, Clone)]
pub struct JoinExpr {
	/// The join type
	pub join: JoinType,
	/// The joined table
	pub table: TableRef,
	/// The ON condition, if any
	pub on: Option<Condition>,
}
