//! Query execution sink.

use async_trait::async_trait;
use indexmap::IndexMap;
use sift_query::Value;

use crate::error::Result;
use crate::plan::QueryPlan;

/// One result row, keyed by column or projection name.
pub type Row = IndexMap<String, Value>;

/// Executes compiled plans.
///
/// Implementations own connection handling, cancellation and timeouts; the
/// compiler never blocks on I/O.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
	/// Rows selected by `plan`, honoring its range.
	async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<Row>>;

	/// The single value selected by a count plan.
	async fn count(&self, plan: &QueryPlan) -> Result<u64>;
}
