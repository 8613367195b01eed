//! SQL Writer helper for constructing SQL strings
//!
//! This module provides `SqlWriter` type which helps build SQL strings
//! with proper spacing and placeholder management.
//!
use crate::value::{Value, Values};

/// SQL Writer for constructing SQL strings
///
/// One writer is threaded through a whole statement, subqueries included,
/// so placeholder numbering stays consecutive.
///
/// # Examples
///
/// ```rust
/// use sift_query::SqlWriter;
///
/// let mut writer = SqlWriter::new();
/// writer.push("SELECT");
/// writer.push_space();
/// writer.push_identifier("id", |s| format!("\"{}\"", s));
///
/// assert_eq!(writer.sql(), "SELECT \"id\"");
/// ```
#[derive(Debug, Clone)]
pub struct SqlWriter {
	/// The SQL string being constructed
	sql: String,
	/// Parameter values collected during construction
	values: Values,
	/// Current parameter index (1-based)
	param_index: usize,
}

impl SqlWriter {
	/// Create a new SQL writer
	pub fn new() -> Self {
		Self {
			sql: String::new(),
			values: Values::default(),
			param_index: 1,
		}
	}

	/// Push a string to SQL
	pub fn push(&mut self, s: &str) {
		self.sql.push_str(s);
	}

	/// Push a space to SQL, unless the SQL is empty or already ends with one
	/// (or with an opening parenthesis)
	pub fn push_space(&mut self) {
		if !self.sql.is_empty() && !self.sql.ends_with(' ') && !self.sql.ends_with('(') {
			self.sql.push(' ');
		}
	}

	/// Push an identifier (escaped)
	///
	/// # Arguments
	///
	/// * `ident` - The identifier to push
	/// * `escape_fn` - Function to escape identifier
	pub fn push_identifier<F>(&mut self, ident: &str, escape_fn: F)
	where
		F: FnOnce(&str) -> String,
	{
		self.sql.push_str(&escape_fn(ident));
	}

	/// Push a value placeholder and collect value
	///
	/// # Returns
	///
	/// * `Some(index)` - The parameter index used for a non-NULL value
	/// * `None` - NULL value (no parameter consumed)
	///
	/// NULL values are inlined directly as `NULL` without consuming a
	/// parameter index.
	pub fn push_value<F>(&mut self, value: Value, format_fn: F) -> Option<usize>
	where
		F: FnOnce(usize) -> String,
	{
		if value.is_null() {
			self.sql.push_str("NULL");
			return None;
		}

		let index = self.param_index;
		self.sql.push_str(&format_fn(index));
		self.values.push(value);
		self.param_index += 1;
		Some(index)
	}

	/// Push a keyword (with automatic spacing)
	pub fn push_keyword(&mut self, keyword: &str) {
		self.push_space();
		self.sql.push_str(keyword);
	}

	/// Get current SQL string
	pub fn sql(&self) -> &str {
		&self.sql
	}

	/// Consume writer and return (SQL, Values)
	pub fn finish(self) -> (String, Values) {
		(self.sql, self.values)
	}

	/// Push a list of items with a separator
	///
	/// # Arguments
	///
	/// * `items` - Iterator of items
	/// * `separator` - Separator string between items
	/// * `f` - Function to write each item
	pub fn push_list<I, T, F>(&mut self, items: I, separator: &str, mut f: F)
	where
		I: IntoIterator<Item = T>,
		F: FnMut(&mut Self, T),
	{
		let mut first = true;
		for item in items {
			if !first {
				self.sql.push_str(separator);
			}
			f(self, item);
			first = false;
		}
	}
}

impl Default for SqlWriter {
	fn default() -> Self {
		Self::new()
	}
}
