//! Integration tests for SELECT rendering across dialects

use rstest::rstest;
use sift_query::prelude::*;

fn paged_statement() -> SelectStatement {
	let mut exists = Query::select();
	exists
		.column(("t1", "id"))
		.from_as("person", "t1")
		.and_where(Expr::col(("t1", "id")).eq(Expr::col(("t0", "id"))))
		.and_where(Expr::col(("t1", "score")).gte(10));

	let mut stmt = Query::select();
	stmt.distinct()
		.column(ColumnRef::table_asterisk("t0"))
		.from_as("person", "t0")
		.and_where(Expr::exists(exists))
		.and_where(Func::lower(Expr::col(("t0", "name")).into_simple_expr()).like("%ann%"))
		.order_by_expr(Expr::col(("t0", "id")).into_simple_expr(), Order::Desc)
		.limit(20)
		.offset(40);
	stmt
}

/// Same statement rendered by every dialect only differs in quoting and placeholders
#[rstest]
#[case::postgres(
	Box::new(PostgresQueryBuilder::new()) as Box<dyn QueryBuilder>,
	r#"SELECT DISTINCT "t0".* FROM "person" AS "t0" WHERE EXISTS (SELECT "t1"."id" FROM "person" AS "t1" WHERE "t1"."id" = "t0"."id" AND "t1"."score" >= $1) AND LOWER("t0"."name") LIKE $2 ORDER BY "t0"."id" DESC LIMIT $3 OFFSET $4"#
)]
#[case::mysql(
	Box::new(MySqlQueryBuilder::new()) as Box<dyn QueryBuilder>,
	"SELECT DISTINCT `t0`.* FROM `person` AS `t0` WHERE EXISTS (SELECT `t1`.`id` FROM `person` AS `t1` WHERE `t1`.`id` = `t0`.`id` AND `t1`.`score` >= ?) AND LOWER(`t0`.`name`) LIKE ? ORDER BY `t0`.`id` DESC LIMIT ? OFFSET ?"
)]
#[case::sqlite(
	Box::new(SqliteQueryBuilder::new()) as Box<dyn QueryBuilder>,
	r#"SELECT DISTINCT "t0".* FROM "person" AS "t0" WHERE EXISTS (SELECT "t1"."id" FROM "person" AS "t1" WHERE "t1"."id" = "t0"."id" AND "t1"."score" >= ?) AND LOWER("t0"."name") LIKE ? ORDER BY "t0"."id" DESC LIMIT ? OFFSET ?"#
)]
fn test_dialects_render_same_layout(#[case] builder: Box<dyn QueryBuilder>, #[case] expected: &str) {
	// Arrange
	let stmt = paged_statement();

	// Act
	let (sql, values) = builder.build_select(&stmt);

	// Assert
	assert_eq!(sql, expected);
	assert_eq!(
		values.into_inner(),
		vec![
			Value::Int(Some(10)),
			Value::String(Some(Box::new("%ann%".to_string()))),
			Value::BigInt(Some(20)),
			Value::BigInt(Some(40)),
		]
	);
}

/// NULL values are inlined and consume no placeholder
#[rstest]
fn test_null_value_is_inlined() {
	// Arrange
	let mut stmt = Query::select();
	stmt.from("person")
		.and_where(Expr::col("nickname").eq(Value::String(None)))
		.and_where(Expr::col("age").eq(3));

	// Act
	let (sql, values) = PostgresQueryBuilder::new().build_select(&stmt);

	// Assert
	assert_eq!(
		sql,
		r#"SELECT * FROM "person" WHERE "nickname" = NULL AND "age" = $1"#
	);
	assert_eq!(values.len(), 1);
}
