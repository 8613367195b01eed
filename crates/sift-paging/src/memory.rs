//! In-memory reference executor.
//!
//! [`MemoryExecutor`] evaluates [`QueryPlan`]s directly against rows held in
//! a [`MemoryStore`], with SQL semantics for joins, null handling, grouping
//! and ordering. It backs the test-suite and any caller that needs paging
//! without a database.

mod eval;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use sift_query::Value;
use tracing::trace;

use crate::error::Result;
use crate::executor::{QueryExecutor, Row};
use crate::plan::QueryPlan;

use self::eval::{Evaluator, Tables};

/// Build a row from column/value pairs.
///
/// ```rust
/// use sift_paging::Value;
/// use sift_paging::memory::row;
///
/// let person = row([("id", Value::from(1i64)), ("name", Value::from("Ann"))]);
/// assert_eq!(person.len(), 2);
/// ```
pub fn row<I, K>(columns: I) -> Row
where
	I: IntoIterator<Item = (K, Value)>,
	K: Into<String>,
{
	columns
		.into_iter()
		.map(|(column, value)| (column.into(), value))
		.collect()
}

/// Tables of rows, safe to fill from several threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
	tables: DashMap<String, Arc<Vec<Row>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, table: &str, row: Row) {
		self.extend(table, [row]);
	}

	pub fn extend(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
		let mut entry = self.tables.entry(table.to_string()).or_default();
		Arc::make_mut(entry.value_mut()).extend(rows);
	}

	/// Rows of `table`; empty when the table was never written.
	pub fn rows(&self, table: &str) -> Arc<Vec<Row>> {
		self.tables
			.get(table)
			.map(|rows| Arc::clone(rows.value()))
			.unwrap_or_default()
	}

	pub fn len(&self, table: &str) -> usize {
		self.tables.get(table).map_or(0, |rows| rows.len())
	}

	pub fn is_empty(&self) -> bool {
		self.tables.iter().all(|rows| rows.is_empty())
	}

	fn snapshot(&self) -> Tables {
		self.tables
			.iter()
			.map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
			.collect()
	}
}

/// Executes plans against a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
	store: Arc<MemoryStore>,
}

impl MemoryExecutor {
	pub fn new(store: Arc<MemoryStore>) -> Self {
		Self { store }
	}

	pub fn store(&self) -> &MemoryStore {
		&self.store
	}
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
	async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<Row>> {
		let tables = self.store.snapshot();
		let rows = Evaluator::new(&tables, &plan.parameters).fetch(plan)?;
		trace!(table = %plan.table, rows = rows.len(), "Evaluated plan in memory");
		Ok(rows)
	}

	async fn count(&self, plan: &QueryPlan) -> Result<u64> {
		let tables = self.store.snapshot();
		let rows = Evaluator::new(&tables, &plan.parameters).fetch(plan)?;
		if !plan.selection.is_count() {
			return Ok(rows.len() as u64);
		}
		let count = rows
			.first()
			.and_then(|row| row.values().next())
			.and_then(Value::as_i64)
			.unwrap_or(0);
		Ok(u64::try_from(count).unwrap_or(0))
	}
}
