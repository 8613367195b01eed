//! Table reference types for SQL queries.
//!
//! This module provides types for referencing tables:
//!
//! - [`TableRef`]: Reference to a table (simple or aliased)
//! - [`IntoTableRef`]: Conversion trait for table references

use super::iden::{DynIden, IntoIden};

/// Reference to a table in a SQL query.
#[derive(Debug, Clone)]
pub enum TableRef {
	/// Simple table reference (e.g., `users`)
	Table(DynIden),
	/// Table with alias (e.g., `users AS t0`)
	TableAlias(DynIden, DynIden),
}

impl TableRef {
	/// Create a simple table reference.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::TableRef;
	///
	/// let table = TableRef::table("users");
	/// ```
	pub fn table<I: IntoIden>(table: I) -> Self {
		Self::Table(table.into_iden())
	}

	/// Create a table reference with an alias.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::TableRef;
	///
	/// let table = TableRef::table_alias("users", "t0");
	/// ```
	pub fn table_alias<T: IntoIden, A: IntoIden>(table: T, alias: A) -> Self {
		Self::TableAlias(table.into_iden(), alias.into_iden())
	}

	/// The name other clauses use to qualify columns of this table.
	pub fn qualifier(&self) -> &DynIden {
		match self {
			Self::Table(table) => table,
			Self::TableAlias(_, alias) => alias,
		}
	}
}

/// Conversion trait for table references.
pub trait IntoTableRef {
	/// Convert this type into a `TableRef`.
	fn into_table_ref(self) -> TableRef;
}

impl IntoTableRef for TableRef {
	fn into_table_ref(self) -> TableRef {
		self
	}
}

impl<T: IntoIden> IntoTableRef for T {
	fn into_table_ref(self) -> TableRef {
		TableRef::Table(self.into_iden())
	}
}
