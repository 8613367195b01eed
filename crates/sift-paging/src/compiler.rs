//! Page-to-plan compilation.
//!
//! [`QueryCompiler`] turns a [`PageRequest`] into a [`CompiledPage`]: the
//! result query and, when requested, a companion count query. Compilation is
//! synchronous and allocates its own join cache and parameter table, so
//! compiling the same request twice yields identical plans.

mod count;
mod order;
mod predicate;
mod resolver;

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::capabilities::BackendCapabilities;
use crate::error::{PageError, Result};
use crate::metadata::{EntityDescriptor, EntityMetadata, FieldType, MetadataProvider, Schema};
use crate::page::Page;
use crate::plan::{
	AggregateFunction, CacheHints, Operand, ParameterBinder, QueryPlan, Selection,
};

pub use resolver::{PathResolver, ResolvedPath};

/// One projected result field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projected {
	/// The value at a dotted path.
	Field(String),
	/// An aggregate over the value at a dotted path, per root row.
	Aggregate(AggregateFunction, String),
}

impl Projected {
	pub fn path(&self) -> &str {
		match self {
			Self::Field(path) | Self::Aggregate(_, path) => path,
		}
	}
}

/// The shape of each result row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultShape {
	/// Root entity rows.
	#[default]
	Entity,
	/// Named values computed from the root. Criteria and ordering address
	/// the mapping's names.
	Projection {
		name: String,
		mapping: IndexMap<String, Projected>,
	},
}

/// Everything needed to compile one page query.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
	pub entity: String,
	pub page: Page,
	/// Also compile a count query.
	pub count: bool,
	pub shape: ResultShape,
	/// Relationship paths to join eagerly.
	pub fetch: Vec<String>,
	/// Attach cache hints when the backend supports them.
	pub cacheable: bool,
}

impl PageRequest {
	pub fn new(entity: impl Into<String>, page: Page) -> Self {
		Self {
			entity: entity.into(),
			page,
			count: false,
			shape: ResultShape::Entity,
			fetch: Vec::new(),
			cacheable: true,
		}
	}

	pub fn with_count(mut self, count: bool) -> Self {
		self.count = count;
		self
	}

	/// Return `mapping` rows named `name` instead of entity rows.
	pub fn project<I, K>(mut self, name: impl Into<String>, mapping: I) -> Self
	where
		I: IntoIterator<Item = (K, Projected)>,
		K: Into<String>,
	{
		self.shape = ResultShape::Projection {
			name: name.into(),
			mapping: mapping
				.into_iter()
				.map(|(key, projected)| (key.into(), projected))
				.collect(),
		};
		self
	}

	pub fn fetch(mut self, path: impl Into<String>) -> Self {
		self.fetch.push(path.into());
		self
	}

	pub fn cacheable(mut self, cacheable: bool) -> Self {
		self.cacheable = cacheable;
		self
	}
}

/// A compiled request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPage {
	pub query: QueryPlan,
	pub count: Option<QueryPlan>,
}

/// Immutable inputs shared by the compilation stages.
pub(crate) struct CompileContext<'a> {
	pub schema: &'a Schema,
	pub root: &'a EntityDescriptor,
	pub metadata: Arc<EntityMetadata>,
	pub capabilities: &'a BackendCapabilities,
}

impl<'a> CompileContext<'a> {
	/// A resolver for `shape`, with the projection mapping registered.
	///
	/// Returns the selection and whether it aggregates.
	fn resolver(&self, shape: &ResultShape) -> Result<(PathResolver<'a>, Selection, bool)> {
		let mut resolver = PathResolver::new(self.schema, self.root);
		let ResultShape::Projection { name, mapping } = shape else {
			return Ok((resolver, Selection::Entity, false));
		};
		if mapping.is_empty() {
			return Err(PageError::IllegalMapping {
				entity: self.root.name().to_string(),
				result: name.clone(),
			});
		}

		let mut columns = Vec::with_capacity(mapping.len());
		let mut aggregated = false;
		for (key, projected) in mapping {
			let mut resolved = resolver.get(projected.path())?;
			if let Projected::Aggregate(function, _) = projected {
				aggregated = true;
				resolved.field_type = aggregate_type(*function, &resolved.field_type);
				resolved.operand = resolved.operand.aggregate(*function);
				resolved.multi_valued = false;
			}
			columns.push((key.clone(), resolved.operand.clone()));
			resolver.map(key.clone(), projected.path(), resolved);
		}
		Ok((resolver, Selection::Projection(columns), aggregated))
	}
}

fn aggregate_type(function: AggregateFunction, input: &FieldType) -> FieldType {
	match function {
		AggregateFunction::Count | AggregateFunction::CountDistinct => FieldType::BigInt,
		AggregateFunction::Avg => FieldType::Double,
		AggregateFunction::Sum | AggregateFunction::Min | AggregateFunction::Max => input.clone(),
	}
}

/// Compiles page requests against a schema for one backend.
pub struct QueryCompiler<'a> {
	schema: &'a Schema,
	metadata: &'a dyn MetadataProvider,
	capabilities: &'a BackendCapabilities,
}

impl<'a> QueryCompiler<'a> {
	pub fn new(
		schema: &'a Schema,
		metadata: &'a dyn MetadataProvider,
		capabilities: &'a BackendCapabilities,
	) -> Self {
		Self {
			schema,
			metadata,
			capabilities,
		}
	}

	pub fn compile(&self, request: &PageRequest) -> Result<CompiledPage> {
		let ctx = CompileContext {
			schema: self.schema,
			root: self.schema.get(&request.entity)?,
			metadata: self.metadata.metadata(&request.entity)?,
			capabilities: self.capabilities,
		};
		let page = &request.page;

		let (mut resolver, selection, aggregated) = ctx.resolver(&request.shape)?;
		for path in &request.fetch {
			resolver.fetch(path)?;
		}
		let mut binder = ParameterBinder::new();
		let restrictions =
			predicate::PredicateCompiler::new(&ctx).restrictions(page, &mut resolver, &mut binder)?;
		let order_by = order::order_by(&ctx, page, &mut resolver)?;

		let has_joins = resolver.has_joins();
		let distinct = restrictions.has_optional || resolver.fans_out() || resolver.has_fetches();
		let group_by = if restrictions.group_by_root() || aggregated {
			vec![Operand::RootId]
		} else {
			Vec::new()
		};
		let hints = (request.cacheable && self.capabilities.second_level_cache).then(|| CacheHints {
			cacheable: true,
			region: page.to_string(),
		});

		let query = QueryPlan {
			entity: ctx.root.name().to_string(),
			table: ctx.root.table().to_string(),
			id_column: ctx.root.id_column().to_string(),
			selection,
			joins: resolver.into_joins(),
			predicate: restrictions.predicate,
			group_by,
			having: restrictions.having,
			order_by,
			offset: (page.offset() != Page::DEFAULT_OFFSET || has_joins).then_some(page.offset()),
			limit: (page.limit() != Page::UNBOUNDED || has_joins).then_some(page.limit()),
			distinct,
			parameters: binder.into_parameters(),
			hints,
		};
		debug!(
			entity = %query.entity,
			joins = query.joins.len(),
			distinct = query.distinct,
			parameters = query.parameters.len(),
			"Compiled page query"
		);
		trace!(parameters = ?query.parameters, "Bound parameters");

		let count = if request.count {
			Some(count::count_query(&ctx, request, &query)?)
		} else {
			None
		};
		Ok(CompiledPage { query, count })
	}
}
