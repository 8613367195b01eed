//! Query statement builders.
//!
//! Only `SELECT` statements are modelled: the paging compiler reads and
//! never writes.

mod select;

pub use select::{SelectExpr, SelectStatement};

/// Entry point for building query statements.
///
/// # Example
///
/// ```rust
/// use sift_query::{Expr, ExprTrait, Query};
///
/// let mut stmt = Query::select();
/// stmt.column("id").from("users").and_where(Expr::col("active").eq(true));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Query;

impl Query {
	/// Start a new `SELECT` statement.
	pub fn select() -> SelectStatement {
		SelectStatement::new()
	}
}
