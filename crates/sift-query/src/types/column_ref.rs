//! Column reference types for SQL queries.
//!
//! This module provides types for referencing columns:
//!
//! - [`ColumnRef`]: Reference to a column (simple, qualified, asterisk)
//! - [`IntoColumnRef`]: Conversion trait for column references

use super::iden::{DynIden, IntoIden};

/// Reference to a column in a SQL query.
#[derive(Debug, Clone)]
pub enum ColumnRef {
	/// Simple column reference (e.g., `name`)
	Column(DynIden),
	/// Table-qualified column reference (e.g., `t0.name`)
	TableColumn(DynIden, DynIden),
	/// Asterisk for selecting all columns (e.g., `*`)
	Asterisk,
	/// Table-qualified asterisk (e.g., `t0.*`)
	TableAsterisk(DynIden),
}

impl ColumnRef {
	/// Create a simple column reference.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::ColumnRef;
	///
	/// let col = ColumnRef::column("name");
	/// ```
	pub fn column<I: IntoIden>(column: I) -> Self {
		Self::Column(column.into_iden())
	}

	/// Create a table-qualified column reference.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::ColumnRef;
	///
	/// let col = ColumnRef::table_column("t0", "name");
	/// ```
	pub fn table_column<T: IntoIden, C: IntoIden>(table: T, column: C) -> Self {
		Self::TableColumn(table.into_iden(), column.into_iden())
	}

	/// Create an asterisk reference for all columns.
	pub fn asterisk() -> Self {
		Self::Asterisk
	}

	/// Create a table-qualified asterisk reference.
	pub fn table_asterisk<T: IntoIden>(table: T) -> Self {
		Self::TableAsterisk(table.into_iden())
	}
}

/// Conversion trait for column references.
///
/// This trait allows various types to be converted into `ColumnRef`.
pub trait IntoColumnRef {
	/// Convert this type into a `ColumnRef`.
	fn into_column_ref(self) -> ColumnRef;
}

impl IntoColumnRef for ColumnRef {
	fn into_column_ref(self) -> ColumnRef {
		self
	}
}

// Blanket implementation for all types that can be converted to an identifier.
// This covers DynIden, &'static str, String and Alias.
impl<T: IntoIden> IntoColumnRef for T {
	fn into_column_ref(self) -> ColumnRef {
		ColumnRef::Column(self.into_iden())
	}
}

// Tuple of (table, column)
impl<S: IntoIden, T: IntoIden> IntoColumnRef for (S, T) {
	fn into_column_ref(self) -> ColumnRef {
		ColumnRef::TableColumn(self.0.into_iden(), self.1.into_iden())
	}
}
