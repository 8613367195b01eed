//! The paging service.
//!
//! [`PageService`] ties the pieces together: it compiles a page request
//! against the schema and the backend's capabilities, hands the plans to a
//! [`QueryExecutor`] and wraps the rows in a [`PartialResultList`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sift_query::Value;
use tracing::{debug, trace};

use crate::capabilities::BackendCapabilities;
use crate::compiler::{CompiledPage, PageRequest, QueryCompiler};
use crate::error::{PageError, Result};
use crate::executor::{QueryExecutor, Row};
use crate::metadata::{MetadataProvider, MetadataRegistry, Schema};
use crate::page::Page;
use crate::settings::PagingSettings;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialResultList<T> {
	items: Vec<T>,
	offset: u64,
	#[serde(rename = "estimatedTotalNumberOfResults")]
	estimated_total: i64,
}

impl<T> PartialResultList<T> {
	/// Marker total of a page whose count was not requested.
	pub const NOT_COUNTED: i64 = -1;

	pub fn new(items: Vec<T>, offset: u64, total: Option<u64>) -> Self {
		Self {
			items,
			offset,
			estimated_total: total.map_or(Self::NOT_COUNTED, |total| {
				i64::try_from(total).unwrap_or(i64::MAX)
			}),
		}
	}

	pub fn items(&self) -> &[T] {
		&self.items
	}

	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// Matching rows across all pages, or [`NOT_COUNTED`](Self::NOT_COUNTED).
	pub fn estimated_total(&self) -> i64 {
		self.estimated_total
	}

	pub fn is_counted(&self) -> bool {
		self.estimated_total != Self::NOT_COUNTED
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	pub fn into_items(self) -> Vec<T> {
		self.items
	}

	/// Convert every item, keeping the offset and total.
	pub fn map<U, F>(self, f: F) -> PartialResultList<U>
	where
		F: FnMut(T) -> U,
	{
		PartialResultList {
			items: self.items.into_iter().map(f).collect(),
			offset: self.offset,
			estimated_total: self.estimated_total,
		}
	}
}

impl<T> IntoIterator for PartialResultList<T> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a, T> IntoIterator for &'a PartialResultList<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

/// Compiles and runs page queries for one backend.
pub struct PageService<E> {
	schema: Arc<Schema>,
	metadata: Arc<dyn MetadataProvider>,
	capabilities: BackendCapabilities,
	cacheable: bool,
	executor: E,
}

impl<E: QueryExecutor> PageService<E> {
	pub fn new(schema: Arc<Schema>, capabilities: BackendCapabilities, executor: E) -> Self {
		let metadata = Arc::new(MetadataRegistry::new(Arc::clone(&schema)));
		Self {
			schema,
			metadata,
			capabilities,
			cacheable: true,
			executor,
		}
	}

	pub fn from_settings(schema: Arc<Schema>, settings: &PagingSettings, executor: E) -> Self {
		Self {
			cacheable: settings.cacheable,
			..Self::new(schema, settings.capabilities(), executor)
		}
	}

	/// Use `metadata` instead of a registry computed from the schema.
	pub fn with_metadata(mut self, metadata: Arc<dyn MetadataProvider>) -> Self {
		self.metadata = metadata;
		self
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn capabilities(&self) -> &BackendCapabilities {
		&self.capabilities
	}

	pub fn executor(&self) -> &E {
		&self.executor
	}

	/// Compile `request` without running it.
	pub fn compile(&self, request: &PageRequest) -> Result<CompiledPage> {
		let compiler = QueryCompiler::new(&self.schema, self.metadata.as_ref(), &self.capabilities);
		let mut compiled = compiler.compile(request)?;
		if !self.cacheable {
			compiled.query.hints = None;
			if let Some(count) = compiled.count.as_mut() {
				count.hints = None;
			}
		}
		Ok(compiled)
	}

	/// Entity rows of `entity` selected by `page`.
	pub async fn get_page(&self, entity: &str, page: &Page, count: bool) -> Result<PartialResultList<Row>> {
		let request = PageRequest::new(entity, page.clone()).with_count(count);
		self.get_page_with(&request).await
	}

	pub async fn get_page_with(&self, request: &PageRequest) -> Result<PartialResultList<Row>> {
		debug!(
			entity = %request.entity,
			page = %request.page,
			count = request.count,
			"Requesting page"
		);
		let compiled = self.compile(request)?;
		let items = self.executor.fetch(&compiled.query).await?;
		let total = match &compiled.count {
			Some(plan) => Some(self.executor.count(plan).await?),
			None => None,
		};
		trace!(rows = items.len(), total = ?total, "Fetched page");
		Ok(PartialResultList::new(items, request.page.offset(), total))
	}

	/// Like [`get_page_with`](Self::get_page_with), deserializing each row
	/// into `T`.
	pub async fn get_page_as<T: DeserializeOwned>(
		&self,
		request: &PageRequest,
	) -> Result<PartialResultList<T>> {
		let page = self.get_page_with(request).await?;
		let offset = page.offset();
		let total = page.is_counted().then(|| page.estimated_total().unsigned_abs());
		let items = page
			.into_iter()
			.map(|row| from_row(&row))
			.collect::<Result<Vec<T>>>()?;
		Ok(PartialResultList::new(items, offset, total))
	}
}

fn from_row<T: DeserializeOwned>(row: &Row) -> Result<T> {
	let object = row
		.iter()
		.map(|(column, value)| (column.clone(), to_json(value)))
		.collect::<serde_json::Map<_, _>>();
	serde_json::from_value(serde_json::Value::Object(object))
		.map_err(|e| PageError::Execution(format!("cannot map row: {e}")))
}

fn to_json(value: &Value) -> serde_json::Value {
	if value.is_null() {
		return serde_json::Value::Null;
	}
	if let Some(flag) = value.as_bool() {
		return flag.into();
	}
	if let Some(int) = value.as_i64() {
		return int.into();
	}
	if matches!(value, Value::Float(_) | Value::Double(_))
		&& let Some(float) = value.as_f64()
	{
		return serde_json::Number::from_f64(float).map_or(serde_json::Value::Null, Into::into);
	}
	value.to_text().map_or(serde_json::Value::Null, Into::into)
}
