//! SQLite query builder backend
//!
//! This module implements the SQL generation backend for SQLite.

use super::{QueryBuilder, SqlWriter, statement};
use crate::{query::SelectStatement, value::Values};

/// SQLite query builder
///
/// This struct implements SQL generation for SQLite, using the following conventions:
/// - Identifiers: Double quotes (`"table_name"`)
/// - Placeholders: Question marks (`?`)
///
/// # Examples
///
/// ```rust
/// use sift_query::{Query, QueryBuilder, SqliteQueryBuilder};
///
/// let builder = SqliteQueryBuilder::new();
/// let mut stmt = Query::select();
/// stmt.column("id").from("users").limit(1);
///
/// let (sql, _values) = builder.build_select(&stmt);
/// assert_eq!(sql, r#"SELECT "id" FROM "users" LIMIT ?"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqliteQueryBuilder;

impl SqliteQueryBuilder {
	/// Create a new SQLite query builder
	pub fn new() -> Self {
		Self
	}
}

impl QueryBuilder for SqliteQueryBuilder {
	fn build_select(&self, stmt: &SelectStatement) -> (String, Values) {
		let mut writer = SqlWriter::new();
		statement::write_select(self, &mut writer, stmt);
		writer.finish()
	}

	fn escape_identifier(&self, ident: &str) -> String {
		let escaped = ident.replace('"', "\"\"");
		format!("\"{}\"", escaped)
	}

	fn format_placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}
}
