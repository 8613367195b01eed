//! ORDER BY types.

use crate::expr::SimpleExpr;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
	/// Ascending
	Asc,
	/// Descending
	Desc,
}

impl Order {
	/// Returns the SQL keyword of this direction.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

/// A single ORDER BY item.
#[derive(Debug, Clone)]
pub struct OrderExpr {
	/// The sorted expression
	pub expr: SimpleExpr,
	/// The sort direction
	pub order: Order,
}
