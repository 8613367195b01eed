//! Companion count queries.

use super::predicate::PredicateCompiler;
use super::{CompileContext, PageRequest};
use crate::capabilities::CountStrategy;
use crate::error::Result;
use crate::plan::{
	Operand, ParameterBinder, Predicate, QueryPlan, Selection, SubqueryPlan, SubquerySelection,
};

/// Count of the root rows `query` pages through, immune to join fan-out.
///
/// The restriction is recompiled with a fresh resolver and binder, so the
/// count binds the same parameter names as the result query and carries no
/// fetch or ordering joins.
pub(crate) fn count_query<'a>(
	ctx: &CompileContext<'a>,
	request: &PageRequest,
	query: &QueryPlan,
) -> Result<QueryPlan> {
	let (mut resolver, _, _) = ctx.resolver(&request.shape)?;
	let mut binder = ParameterBinder::new();
	let restrictions =
		PredicateCompiler::new(ctx).restrictions(&request.page, &mut resolver, &mut binder)?;

	let mut count = QueryPlan::new(&query.entity, &query.table, &query.id_column);
	count.selection = Selection::Count;
	count.hints = query.hints.clone();
	if restrictions.predicate.is_none() && restrictions.having.is_none() {
		return Ok(count);
	}

	let strategy = match ctx.capabilities.count_strategy {
		CountStrategy::Distinct if restrictions.group_by_root() => CountStrategy::InSubquery,
		strategy => strategy,
	};
	let group_by_root = restrictions.group_by_root();
	match strategy {
		CountStrategy::Distinct => {
			count.selection = Selection::CountDistinct;
			count.joins = resolver.into_joins();
			count.predicate = restrictions.predicate;
		}
		CountStrategy::InSubquery | CountStrategy::Exists => {
			let correlated = strategy == CountStrategy::Exists;
			let subquery = Box::new(SubqueryPlan {
				entity: query.entity.clone(),
				table: query.table.clone(),
				id_column: query.id_column.clone(),
				selection: SubquerySelection::RootId,
				joins: resolver.into_joins(),
				predicate: restrictions.predicate,
				group_by_root,
				having: restrictions.having,
				correlated,
			});
			count.predicate = Some(if correlated {
				Predicate::Exists(subquery)
			} else {
				Predicate::InSubquery {
					operand: Operand::RootId,
					subquery,
				}
			});
		}
	}
	count.parameters = binder.into_parameters();
	Ok(count)
}

#[cfg(test)]
mod tests {
	use crate::capabilities::BackendCapabilities;
	use crate::compiler::{PageRequest, QueryCompiler};
	use crate::metadata::{EntityDescriptor, FieldDescriptor, FieldType, MetadataRegistry, Schema};
	use crate::page::Page;
	use crate::plan::{Operand, Predicate, QueryPlan, Selection};
	use rstest::{fixture, rstest};
	use std::sync::Arc;

	#[fixture]
	fn schema() -> Arc<Schema> {
		Arc::new(
			Schema::new()
				.entity(
					EntityDescriptor::new("Author", "author")
						.field(FieldDescriptor::basic("name", FieldType::Text))
						.field(FieldDescriptor::to_many("books", "Book", "author_id")),
				)
				.entity(
					EntityDescriptor::new("Book", "book")
						.field(FieldDescriptor::basic("title", FieldType::Text)),
				),
		)
	}

	fn count_plan(schema: &Arc<Schema>, capabilities: BackendCapabilities, page: Page) -> QueryPlan {
		let registry = MetadataRegistry::new(Arc::clone(schema));
		let request = PageRequest::new("Author", page).with_count(true);
		QueryCompiler::new(schema, &registry, &capabilities)
			.compile(&request)
			.unwrap()
			.count
			.unwrap()
	}

	fn filtered() -> Page {
		Page::builder()
			.range(0, 10)
			.unwrap()
			.all_match([("books.title", "Dune")])
			.unwrap()
			.build()
	}

	#[rstest]
	fn test_unfiltered_count_is_plain(schema: Arc<Schema>) {
		// Act
		let count = count_plan(&schema, BackendCapabilities::postgres(), Page::of(10, 5).unwrap());

		// Assert
		assert_eq!(count.selection, Selection::Count);
		assert!(count.joins.is_empty());
		assert!(count.predicate.is_none());
		assert!(count.parameters.is_empty());
		assert_eq!(count.offset, None);
		assert!(count.order_by.is_empty());
	}

	#[rstest]
	fn test_in_subquery_strategy(schema: Arc<Schema>) {
		// Act
		let count = count_plan(&schema, BackendCapabilities::postgres(), filtered());

		// Assert
		assert!(count.joins.is_empty());
		let Some(Predicate::InSubquery { operand, subquery }) = count.predicate else {
			panic!("expected an IN subquery");
		};
		assert_eq!(operand, Operand::RootId);
		assert_eq!(subquery.joins.len(), 1);
		assert!(!subquery.correlated);
		assert_eq!(count.parameters.len(), 1);
	}

	#[rstest]
	fn test_exists_strategy(schema: Arc<Schema>) {
		// Act
		let count = count_plan(&schema, BackendCapabilities::mysql(), filtered());

		// Assert
		assert!(matches!(
			count.predicate,
			Some(Predicate::Exists(ref subquery)) if subquery.correlated
		));
	}

	#[rstest]
	fn test_distinct_strategy(schema: Arc<Schema>) {
		// Act
		let count = count_plan(&schema, BackendCapabilities::sqlite(), filtered());

		// Assert
		assert_eq!(count.selection, Selection::CountDistinct);
		assert_eq!(count.joins.len(), 1);
	}

	#[rstest]
	fn test_distinct_strategy_falls_back_with_having(schema: Arc<Schema>) {
		// Arrange
		let page = Page::builder()
			.all_match([("books.title", vec!["Dune", "Emma"])])
			.unwrap()
			.build();

		// Act
		let count = count_plan(&schema, BackendCapabilities::sqlite(), page);

		// Assert
		let Some(Predicate::InSubquery { subquery, .. }) = count.predicate else {
			panic!("expected an IN subquery");
		};
		assert!(subquery.group_by_root);
		assert!(subquery.having.is_some());
	}

	#[rstest]
	fn test_count_binds_same_names_as_query(schema: Arc<Schema>) {
		// Arrange
		let registry = MetadataRegistry::new(Arc::clone(&schema));
		let capabilities = BackendCapabilities::postgres();
		let page = Page::builder()
			.all_match([("name", "Le Guin")])
			.unwrap()
			.order_by("books.title", true)
			.build();
		let request = PageRequest::new("Author", page).with_count(true).fetch("books");

		// Act
		let compiled = QueryCompiler::new(&schema, &registry, &capabilities)
			.compile(&request)
			.unwrap();

		// Assert
		let count = compiled.count.unwrap();
		assert_eq!(compiled.query.parameters, count.parameters);
		let Some(Predicate::InSubquery { subquery, .. }) = count.predicate else {
			panic!("expected an IN subquery");
		};
		assert!(subquery.joins.is_empty());
	}
}
