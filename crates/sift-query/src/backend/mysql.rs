//! MySQL query builder backend
//!
//! This module implements the SQL generation backend for MySQL.

use super::{QueryBuilder, SqlWriter, statement};
use crate::{query::SelectStatement, value::Values};

/// MySQL query builder
///
/// This struct implements SQL generation for MySQL, using the following conventions:
/// - Identifiers: Backticks (`` `table_name` ``)
/// - Placeholders: Question marks (`?`)
///
/// # Examples
///
/// ```rust
/// use sift_query::{MySqlQueryBuilder, Query, QueryBuilder};
///
/// let builder = MySqlQueryBuilder::new();
/// let mut stmt = Query::select();
/// stmt.column("id").from("users");
///
/// let (sql, _values) = builder.build_select(&stmt);
/// assert_eq!(sql, "SELECT `id` FROM `users`");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MySqlQueryBuilder;

impl MySqlQueryBuilder {
	/// Create a new MySQL query builder
	pub fn new() -> Self {
		Self
	}
}

impl QueryBuilder for MySqlQueryBuilder {
	fn build_select(&self, stmt: &SelectStatement) -> (String, Values) {
		let mut writer = SqlWriter::new();
		statement::write_select(self, &mut writer, stmt);
		writer.finish()
	}

	fn escape_identifier(&self, ident: &str) -> String {
		// Escape backticks within the identifier
		let escaped = ident.replace('`', "``");
		format!("`{}`", escaped)
	}

	fn format_placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}

	fn quote_string(&self, text: &str) -> String {
		// Backslash starts an escape sequence in MySQL string literals
		let escaped = text.replace('\\', "\\\\").replace('\'', "''");
		format!("'{}'", escaped)
	}
}
