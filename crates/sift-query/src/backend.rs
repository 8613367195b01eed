//! SQL Backend implementations
//!
//! This module provides database-specific SQL generation backends for PostgreSQL,
//! MySQL, and SQLite. The dialects only differ in identifier quoting and
//! placeholder syntax; the statement layout is shared.

use crate::{query::SelectStatement, value::Values};

#[cfg(feature = "backend-mysql")]
mod mysql;
#[cfg(feature = "backend-postgres")]
mod postgres;
mod sql_writer;
#[cfg(feature = "backend-sqlite")]
mod sqlite;
mod statement;

#[cfg(feature = "backend-mysql")]
pub use mysql::MySqlQueryBuilder;
#[cfg(feature = "backend-postgres")]
pub use postgres::PostgresQueryBuilder;
pub use sql_writer::SqlWriter;
#[cfg(feature = "backend-sqlite")]
pub use sqlite::SqliteQueryBuilder;

/// Query builder trait for generating SQL from query statements
///
/// # Implementations
///
/// - [`PostgresQueryBuilder`] - PostgreSQL backend
/// - [`MySqlQueryBuilder`] - MySQL backend
/// - [`SqliteQueryBuilder`] - SQLite backend
///
/// # Examples
///
/// ```rust
/// use sift_query::{Expr, ExprTrait, PostgresQueryBuilder, Query, QueryBuilder};
///
/// let builder = PostgresQueryBuilder::new();
/// let mut stmt = Query::select();
/// stmt.column("id")
///     .column("name")
///     .from("users")
///     .and_where(Expr::col("active").eq(true));
///
/// let (sql, values) = builder.build_select(&stmt);
/// assert_eq!(sql, r#"SELECT "id", "name" FROM "users" WHERE "active" = $1"#);
/// assert_eq!(values.len(), 1);
/// ```
pub trait QueryBuilder {
	/// Build SELECT statement
	///
	/// Generates SQL and parameter values for a SELECT statement.
	///
	/// # Returns
	///
	/// A tuple of (SQL string, parameter values)
	fn build_select(&self, stmt: &SelectStatement) -> (String, Values);

	/// Escape an identifier (table name, column name, etc.)
	fn escape_identifier(&self, ident: &str) -> String;

	/// Format a parameter placeholder for the 1-based `index`
	fn format_placeholder(&self, index: usize) -> String;

	/// Quote `text` as an inline string literal
	fn quote_string(&self, text: &str) -> String {
		format!("'{}'", text.replace('\'', "''"))
	}
}
