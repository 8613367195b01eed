//! Compiled pages rendered as SQL for each dialect.

mod common;

use std::sync::Arc;

use common::library_schema;
use rstest::{fixture, rstest};
use sift_paging::prelude::*;
use sift_query::{MySqlQueryBuilder, PostgresQueryBuilder, QueryBuilder, SqliteQueryBuilder};

#[fixture]
fn schema() -> Arc<Schema> {
	library_schema()
}

fn compile(schema: &Arc<Schema>, capabilities: &BackendCapabilities, request: &PageRequest) -> CompiledPage {
	let registry = MetadataRegistry::new(Arc::clone(schema));
	QueryCompiler::new(schema, &registry, capabilities)
		.compile(request)
		.unwrap()
}

fn render<B: QueryBuilder>(capabilities: &BackendCapabilities, plan: &QueryPlan, builder: &B) -> (String, Vec<Value>) {
	let (sql, values) = SqlLowering::new(capabilities).to_sql(plan, builder).unwrap();
	(sql, values.into_inner())
}

fn by_country() -> Page {
	Page::builder()
		.all_match([("publisher.country", "UK")])
		.unwrap()
		.build()
}

#[rstest]
fn test_to_one_path_joins_target(schema: Arc<Schema>) {
	// Arrange
	let capabilities = BackendCapabilities::postgres();
	let compiled = compile(&schema, &capabilities, &PageRequest::new("Author", by_country()));

	// Act
	let (sql, values) = render(&capabilities, &compiled.query, &PostgresQueryBuilder::new());

	// Assert
	assert_eq!(
		sql,
		concat!(
			r#"SELECT "t0".* FROM "author" AS "t0" "#,
			r#"LEFT JOIN "publisher" AS "t1" ON "t1"."id" = "t0"."publisher_id" "#,
			r#"WHERE LOWER("t1"."country") = $1 "#,
			r#"ORDER BY "t0"."id" DESC LIMIT $2 OFFSET $3"#
		)
	);
	assert_eq!(
		values,
		vec![Value::from("uk"), Value::BigInt(Some(i64::MAX)), Value::BigInt(Some(0))]
	);
}

#[rstest]
fn test_fetch_selects_distinct_roots(schema: Arc<Schema>) {
	// Arrange
	let capabilities = BackendCapabilities::postgres();
	let request = PageRequest::new("Author", Page::of(0, 10).unwrap()).fetch("books");
	let compiled = compile(&schema, &capabilities, &request);

	// Act
	let (sql, _) = render(&capabilities, &compiled.query, &PostgresQueryBuilder::new());

	// Assert
	assert!(sql.starts_with(concat!(
		r#"SELECT DISTINCT "t0".* FROM "author" AS "t0" "#,
		r#"LEFT JOIN "book" AS "t1" ON "t1"."author_id" = "t0"."id""#
	)));
}

#[rstest]
fn test_mysql_counts_with_correlated_exists(schema: Arc<Schema>) {
	// Arrange
	let capabilities = BackendCapabilities::mysql();
	let request = PageRequest::new("Author", by_country()).with_count(true);
	let compiled = compile(&schema, &capabilities, &request);

	// Act
	let (sql, values) = render(&capabilities, &compiled.count.unwrap(), &MySqlQueryBuilder::new());

	// Assert
	assert!(sql.starts_with("SELECT COUNT(`t0`.`id`) FROM `author` AS `t0` WHERE EXISTS (SELECT"));
	assert!(sql.contains("LOWER(`t2`.`country`) = ?"));
	assert!(sql.contains("`t1`.`id` = `t0`.`id`"));
	assert_eq!(values, vec![Value::from("uk")]);
}

#[rstest]
fn test_sqlite_counts_distinct_roots(schema: Arc<Schema>) {
	// Arrange
	let capabilities = BackendCapabilities::sqlite();
	let request = PageRequest::new("Author", by_country()).with_count(true);
	let compiled = compile(&schema, &capabilities, &request);

	// Act
	let (sql, _) = render(&capabilities, &compiled.count.unwrap(), &SqliteQueryBuilder::new());

	// Assert
	assert!(sql.starts_with(concat!(
		r#"SELECT COUNT(DISTINCT "t0"."id") FROM "author" AS "t0" "#,
		r#"LEFT JOIN "publisher" AS "t1""#
	)));
	assert!(!sql.contains("LIMIT"));
}

#[rstest]
fn test_count_binds_the_same_values(schema: Arc<Schema>) {
	// Arrange
	let capabilities = BackendCapabilities::postgres();
	let page = Page::builder()
		.range(10, 5)
		.unwrap()
		.all_match([("born", ">1900")])
		.unwrap()
		.any_match([("name", "herbert"), ("genres", "scifi")])
		.unwrap()
		.build();
	let compiled = compile(
		&schema,
		&capabilities,
		&PageRequest::new("Author", page).with_count(true),
	);

	// Act
	let (_, query_values) = render(&capabilities, &compiled.query, &PostgresQueryBuilder::new());
	let (count_sql, count_values) = render(
		&capabilities,
		compiled.count.as_ref().unwrap(),
		&PostgresQueryBuilder::new(),
	);

	// Assert
	assert_eq!(count_values, query_values[..count_values.len()].to_vec());
	assert_eq!(count_values.len(), 3);
	assert!(!count_sql.contains("ORDER BY"));
}

#[rstest]
fn test_cache_hints_follow_capabilities(schema: Arc<Schema>) {
	// Arrange
	let request = PageRequest::new("Author", by_country());

	// Act
	let postgres = compile(&schema, &BackendCapabilities::postgres(), &request);
	let sqlite = compile(&schema, &BackendCapabilities::sqlite(), &request);
	let uncached = compile(
		&schema,
		&BackendCapabilities::postgres(),
		&request.clone().cacheable(false),
	);

	// Assert
	let hints = postgres.query.hints.unwrap();
	assert!(hints.cacheable);
	assert_eq!(hints.region, by_country().to_string());
	assert!(sqlite.query.hints.is_none());
	assert!(uncached.query.hints.is_none());
}
