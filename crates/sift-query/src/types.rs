//! Type definitions for identifiers, column references, and table references.
//!
//! This module provides the core type system for identifying SQL entities:
//!
//! - [`Iden`]: Trait for SQL identifiers (tables, columns, aliases)
//! - [`Alias`]: Dynamic identifier for runtime-determined names
//! - [`DynIden`]: Type-erased identifier for heterogeneous collections
//! - [`ColumnRef`]: Reference to a column (simple or table-qualified)
//! - [`TableRef`]: Reference to a table (simple or aliased)
//! - [`IntoIden`], [`IntoColumnRef`], [`IntoTableRef`]: Conversion traits

mod alias;
mod column_ref;
mod iden;
mod join;
mod operators;
mod order;
mod table_ref;

pub use alias::Alias;
pub use column_ref::{ColumnRef, IntoColumnRef};
pub use iden::{DynIden, Iden, IntoIden, SeaRc};
pub use join::{JoinExpr, JoinType};
pub use operators::{BinOper, UnOper};
pub use order::{Order, OrderExpr};
pub use table_ref::{IntoTableRef, TableRef};
