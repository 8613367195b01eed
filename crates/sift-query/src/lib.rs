//! # sift-query
//!
//! A SQL `SELECT` statement model for the sift paging compiler.
//!
//! This crate provides a fluent API for constructing read queries that target
//! PostgreSQL, MySQL, and SQLite databases. It generates parameterized queries
//! with proper identifier escaping and value placeholders for each backend.
//!
//! ## Features
//!
//! - **Statement model** - `SELECT [DISTINCT]` with joins, `WHERE`, `GROUP BY`,
//!   `HAVING`, `ORDER BY`, `LIMIT` and `OFFSET`
//! - **Expression system** - comparisons, `LIKE`, `BETWEEN`, `IN` lists,
//!   `IN`/`EXISTS` subqueries, casts and function calls
//! - **Condition trees** - nested AND/OR chains with negation
//! - **Multi-backend output** - one statement, three dialects
//!
//! ## Quick Start
//!
//! ```rust
//! use sift_query::prelude::*;
//!
//! let mut stmt = Query::select();
//! stmt.column("id")
//!     .column("name")
//!     .from("users")
//!     .and_where(Expr::col("active").eq(true))
//!     .order_by_expr(Expr::col("name").into_simple_expr(), Order::Asc)
//!     .limit(10);
//!
//! let (sql, values) = PostgresQueryBuilder::new().build_select(&stmt);
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "name" FROM "users" WHERE "active" = $1 ORDER BY "name" ASC LIMIT $2"#
//! );
//! assert_eq!(values.len(), 2);
//! ```
//!
//! ## Backend Differences
//!
//! | Feature | PostgreSQL | MySQL | SQLite |
//! |---------|------------|-------|--------|
//! | Identifier quoting | `"name"` | `` `name` `` | `"name"` |
//! | Placeholders | `$1, $2` | `?, ?` | `?, ?` |

// Core modules
pub mod types;
pub mod value;

// Expression module
pub mod expr;

// Query builders
pub mod query;

// Backend implementations
pub mod backend;

/// Prelude module for convenient imports.
///
/// ```rust
/// use sift_query::prelude::*;
/// ```
pub mod prelude {
	// Backend builders
	#[cfg(feature = "backend-mysql")]
	pub use crate::backend::MySqlQueryBuilder;
	#[cfg(feature = "backend-postgres")]
	pub use crate::backend::PostgresQueryBuilder;
	#[cfg(feature = "backend-sqlite")]
	pub use crate::backend::SqliteQueryBuilder;
	pub use crate::backend::{QueryBuilder, SqlWriter};
	// Expression system
	pub use crate::expr::{
		Cond, Condition, ConditionExpression, ConditionHolder, ConditionType, Expr, ExprTrait,
		Func, IntoCondition, Keyword, SimpleExpr, SubQueryOper,
	};
	// Query builders
	pub use crate::query::{Query, SelectExpr, SelectStatement};
	// Type system
	pub use crate::types::{
		Alias, BinOper, ColumnRef, DynIden, Iden, IntoColumnRef, IntoIden, IntoTableRef,
		JoinExpr, JoinType, Order, OrderExpr, TableRef, UnOper,
	};
	// Value system
	pub use crate::value::{IntoValue, Value, Values};
}

// Re-export commonly used types at crate root
pub use prelude::*;
