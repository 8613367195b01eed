//! PostgreSQL query builder backend
//!
//! This module implements the SQL generation backend for PostgreSQL.

use super::{QueryBuilder, SqlWriter, statement};
use crate::{query::SelectStatement, value::Values};

/// PostgreSQL query builder
///
/// This struct implements SQL generation for PostgreSQL, using the following conventions:
/// - Identifiers: Double quotes (`"table_name"`)
/// - Placeholders: Numbered (`$1`, `$2`, ...)
///
/// # Examples
///
/// ```rust
/// use sift_query::{PostgresQueryBuilder, Query, QueryBuilder};
///
/// let builder = PostgresQueryBuilder::new();
/// let mut stmt = Query::select();
/// stmt.column("id").from("users");
///
/// let (sql, _values) = builder.build_select(&stmt);
/// assert_eq!(sql, r#"SELECT "id" FROM "users""#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostgresQueryBuilder;

impl PostgresQueryBuilder {
	/// Create a new PostgreSQL query builder
	pub fn new() -> Self {
		Self
	}
}

impl QueryBuilder for PostgresQueryBuilder {
	fn build_select(&self, stmt: &SelectStatement) -> (String, Values) {
		let mut writer = SqlWriter::new();
		statement::write_select(self, &mut writer, stmt);
		writer.finish()
	}

	fn escape_identifier(&self, ident: &str) -> String {
		// Escape double quotes within the identifier
		let escaped = ident.replace('"', "\"\"");
		format!("\"{}\"", escaped)
	}

	fn format_placeholder(&self, index: usize) -> String {
		format!("${}", index)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		expr::{Cond, Expr, ExprTrait, Func},
		query::Query,
		types::{Order, TableRef},
		value::Value,
	};
	use rstest::rstest;

	#[rstest]
	fn test_escape_identifier() {
		let builder = PostgresQueryBuilder::new();
		assert_eq!(builder.escape_identifier("user"), "\"user\"");
		assert_eq!(builder.escape_identifier("user\"name"), "\"user\"\"name\"");
	}

	#[rstest]
	fn test_format_placeholder() {
		let builder = PostgresQueryBuilder::new();
		assert_eq!(builder.format_placeholder(1), "$1");
		assert_eq!(builder.format_placeholder(10), "$10");
	}

	#[rstest]
	fn test_select_asterisk() {
		let builder = PostgresQueryBuilder::new();
		let mut stmt = Query::select();
		stmt.from("users");

		let (sql, values) = builder.build_select(&stmt);
		assert_eq!(sql, "SELECT * FROM \"users\"");
		assert_eq!(values.len(), 0);
	}

	#[rstest]
	fn test_select_distinct_with_join_and_order() {
		// Arrange
		let builder = PostgresQueryBuilder::new();
		let mut stmt = Query::select();
		stmt.distinct()
			.column(("t0", "id"))
			.from_as("person", "t0")
			.left_join(
				TableRef::table_alias("address", "t1"),
				Expr::col(("t1", "id")).eq(Expr::col(("t0", "address_id"))),
			)
			.and_where(Expr::col(("t1", "city")).eq("Oslo"))
			.order_by_expr(Expr::col(("t0", "id")).into_simple_expr(), Order::Desc);

		// Act
		let (sql, values) = builder.build_select(&stmt);

		// Assert
		assert_eq!(
			sql,
			r#"SELECT DISTINCT "t0"."id" FROM "person" AS "t0" LEFT JOIN "address" AS "t1" ON "t1"."id" = "t0"."address_id" WHERE "t1"."city" = $1 ORDER BY "t0"."id" DESC"#
		);
		assert_eq!(values.len(), 1);
	}

	#[rstest]
	fn test_nested_or_is_parenthesized() {
		// Arrange
		let builder = PostgresQueryBuilder::new();
		let mut stmt = Query::select();
		stmt.from("person").and_where(
			Cond::all().add(Expr::col("status").eq("ACTIVE")).add(
				Cond::any()
					.add(Expr::col("name").eq("a"))
					.add(Expr::col("name").eq("b")),
			),
		);

		// Act
		let (sql, values) = builder.build_select(&stmt);

		// Assert
		assert_eq!(
			sql,
			r#"SELECT * FROM "person" WHERE "status" = $1 AND ("name" = $2 OR "name" = $3)"#
		);
		assert_eq!(values.len(), 3);
	}

	#[rstest]
	fn test_subquery_placeholders_are_consecutive() {
		// Arrange
		let builder = PostgresQueryBuilder::new();
		let mut inner = Query::select();
		inner
			.column(("t0", "id"))
			.from_as("person", "t0")
			.and_where(Expr::col(("t0", "age")).gt(30));
		let mut stmt = Query::select();
		stmt.expr(Func::count(Expr::col(("e", "id")).into_simple_expr()))
			.from_as("person", "e")
			.and_where(Expr::col(("e", "name")).like("a%"))
			.and_where(Expr::col(("e", "id")).in_subquery(inner));

		// Act
		let (sql, values) = builder.build_select(&stmt);

		// Assert
		assert_eq!(
			sql,
			r#"SELECT COUNT("e"."id") FROM "person" AS "e" WHERE "e"."name" LIKE $1 AND "e"."id" IN (SELECT "t0"."id" FROM "person" AS "t0" WHERE "t0"."age" > $2)"#
		);
		assert_eq!(
			values.into_inner(),
			vec![
				Value::String(Some(Box::new("a%".to_string()))),
				Value::Int(Some(30))
			]
		);
	}

	#[rstest]
	fn test_group_by_having_count_distinct() {
		// Arrange
		let builder = PostgresQueryBuilder::new();
		let mut stmt = Query::select();
		stmt.from_as("person", "t0")
			.group_by_col(("t0", "id"))
			.and_having(Func::count_distinct(Expr::col(("t1", "value")).into_simple_expr()).eq(2i64));

		// Act
		let (sql, _values) = builder.build_select(&stmt);

		// Assert
		assert_eq!(
			sql,
			r#"SELECT * FROM "person" AS "t0" GROUP BY "t0"."id" HAVING COUNT(DISTINCT "t1"."value") = $1"#
		);
	}

	#[rstest]
	fn test_negated_condition_and_null_check() {
		// Arrange
		let builder = PostgresQueryBuilder::new();
		let mut stmt = Query::select();
		stmt.from("person")
			.and_where(Cond::all().add(Expr::col("email").is_null()).not());

		// Act
		let (sql, _values) = builder.build_select(&stmt);

		// Assert
		assert_eq!(sql, r#"SELECT * FROM "person" WHERE NOT ("email" IS NULL)"#);
	}

	#[rstest]
	fn test_negated_like_with_escape() {
		// Arrange
		let builder = PostgresQueryBuilder::new();
		let mut stmt = Query::select();
		stmt.from("person")
			.and_where(Expr::col("name").like_escape("100\\%%", '\\').not());

		// Act
		let (sql, values) = builder.build_select(&stmt);

		// Assert
		assert_eq!(
			sql,
			r#"SELECT * FROM "person" WHERE NOT ("name" LIKE $1 ESCAPE '\')"#
		);
		assert_eq!(values.len(), 1);
	}

	#[rstest]
	fn test_limit_offset_are_bound() {
		let builder = PostgresQueryBuilder::new();
		let mut stmt = Query::select();
		stmt.column("id").from("users").limit(10).offset(20);

		let (sql, values) = builder.build_select(&stmt);
		assert_eq!(sql, r#"SELECT "id" FROM "users" LIMIT $1 OFFSET $2"#);
		assert_eq!(values.len(), 2);
	}
}
