//! Ordering maps to sort directives.

use super::CompileContext;
use super::resolver::PathResolver;
use crate::error::{PageError, Result};
use crate::page::Page;
use crate::plan::{OrderDirective, Operand};

/// Sort directives for `page`, primary key first.
///
/// Nothing is sorted when at most one row is requested.
pub(crate) fn order_by<'a>(
	ctx: &CompileContext<'a>,
	page: &Page,
	resolver: &mut PathResolver<'a>,
) -> Result<Vec<OrderDirective>> {
	if page.limit().checked_sub(page.offset()) == Some(1) || page.ordering().is_empty() {
		return Ok(Vec::new());
	}

	let mut directives = Vec::with_capacity(page.ordering().len());
	for (field, ascending) in page.ordering() {
		let path = resolver.path_of(field).to_string();
		if ctx.metadata.is_multi_valued(&path) && !ctx.capabilities.order_by_collection {
			return Err(PageError::unsupported(
				&ctx.capabilities.name,
				format!("sorting a to-many or element collection relationship ({field})"),
			));
		}
		let operand = if field == Page::DEFAULT_ORDER_FIELD
			&& resolver.mapped(field).is_none()
			&& ctx.root.get_field(field).is_none()
		{
			Operand::RootId
		} else {
			resolver.get(field)?.operand
		};
		directives.push(OrderDirective {
			operand,
			ascending: *ascending,
		});
	}
	Ok(directives)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::capabilities::BackendCapabilities;
	use crate::metadata::{EntityDescriptor, EntityMetadata, FieldDescriptor, FieldType, Schema};
	use crate::plan::Source;
	use rstest::{fixture, rstest};
	use std::sync::Arc;

	#[fixture]
	fn schema() -> Schema {
		Schema::new().entity(
			EntityDescriptor::new("Tag", "tag")
				.id("code", FieldType::Text)
				.field(FieldDescriptor::basic("label", FieldType::Text))
				.field(FieldDescriptor::element_collection(
					"aliases",
					"tag_alias",
					"tag_code",
					"alias",
					FieldType::Text,
				)),
		)
	}

	fn directives(
		schema: &Schema,
		capabilities: &BackendCapabilities,
		page: &Page,
	) -> Result<Vec<OrderDirective>> {
		let root = schema.get("Tag")?;
		let ctx = CompileContext {
			schema,
			root,
			metadata: Arc::new(EntityMetadata::compute(schema, "Tag")?),
			capabilities,
		};
		let mut resolver = PathResolver::new(schema, root);
		order_by(&ctx, page, &mut resolver)
	}

	#[rstest]
	fn test_keeps_insertion_order(schema: Schema) {
		// Arrange
		let page = Page::builder()
			.order_by("label", true)
			.order_by("code", false)
			.build();

		// Act
		let order = directives(&schema, &BackendCapabilities::postgres(), &page).unwrap();

		// Assert
		assert_eq!(
			order,
			vec![
				OrderDirective {
					operand: Operand::field(Source::Root, "label", FieldType::Text),
					ascending: true,
				},
				OrderDirective {
					operand: Operand::field(Source::Root, "code", FieldType::Text),
					ascending: false,
				},
			]
		);
	}

	#[rstest]
	fn test_default_order_uses_identity(schema: Schema) {
		// Act
		let order = directives(&schema, &BackendCapabilities::postgres(), &Page::all()).unwrap();

		// Assert
		assert_eq!(
			order,
			vec![OrderDirective {
				operand: Operand::RootId,
				ascending: false,
			}]
		);
	}

	#[rstest]
	#[case(0, 1)]
	#[case(4, 5)]
	fn test_single_row_is_unordered(schema: Schema, #[case] offset: i64, #[case] limit: i64) {
		// Arrange
		let page = Page::builder()
			.range(offset, limit)
			.unwrap()
			.order_by("label", true)
			.build();

		// Act
		let order = directives(&schema, &BackendCapabilities::postgres(), &page).unwrap();

		// Assert
		assert!(order.is_empty());
	}

	#[rstest]
	fn test_collection_sort_can_be_unsupported(schema: Schema) {
		// Arrange
		let capabilities = BackendCapabilities {
			order_by_collection: false,
			..BackendCapabilities::sqlite()
		};
		let page = Page::builder().order_by("aliases", true).build();

		// Act
		let result = directives(&schema, &capabilities, &page);

		// Assert
		match result {
			Err(err @ PageError::Unsupported { .. }) => {
				assert_eq!(
					err.to_string(),
					"Sorry, SQLite does not support sorting a to-many or element collection relationship (aliases)"
				);
			}
			other => panic!("expected an unsupported error, got {other:?}"),
		}
	}
}
