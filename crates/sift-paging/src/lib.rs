//! # sift-paging
//!
//! Criteria-driven pagination over a relational schema.
//!
//! A [`Page`] names a range, an ordering and two criteria maps keyed by
//! dotted field paths. The [`QueryCompiler`] resolves those paths against
//! the entity [`Schema`], joins the relationships they cross, and produces a
//! backend-neutral [`QueryPlan`] plus an optional count plan. Plans are
//! lowered to SQL by [`SqlLowering`] or run directly by any
//! [`QueryExecutor`], such as the in-memory [`MemoryExecutor`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sift_paging::prelude::*;
//! use sift_paging::memory::{MemoryExecutor, MemoryStore, row};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> sift_paging::Result<()> {
//! let schema = Arc::new(Schema::new().entity(
//!     EntityDescriptor::new("Person", "person")
//!         .field(FieldDescriptor::basic("name", FieldType::Text)),
//! ));
//!
//! let store = MemoryStore::new();
//! store.insert("person", row([("id", Value::from(1i64)), ("name", Value::from("Ann"))]));
//! store.insert("person", row([("id", Value::from(2i64)), ("name", Value::from("Bob"))]));
//!
//! let service = PageService::new(
//!     schema,
//!     BackendCapabilities::postgres(),
//!     MemoryExecutor::new(Arc::new(store)),
//! );
//!
//! let page = Page::builder()
//!     .all_match([("name", Criterion::ignore_case("ANN"))])?
//!     .build();
//! let result = service.get_page("Person", &page, true).await?;
//!
//! assert_eq!(result.estimated_total(), 1);
//! assert_eq!(result.items()[0]["name"], Value::from("Ann"));
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod compiler;
pub mod criteria;
pub mod error;
pub mod executor;
pub mod lower;
pub mod memory;
pub mod metadata;
pub mod page;
pub mod plan;
pub mod service;
pub mod settings;

pub use capabilities::{BackendCapabilities, DatabaseType};
pub use compiler::{CompiledPage, PageRequest, QueryCompiler};
pub use criteria::{CriteriaValue, Criterion};
pub use error::{PageError, Result};
pub use executor::{QueryExecutor, Row};
pub use lower::SqlLowering;
pub use memory::MemoryExecutor;
pub use metadata::Schema;
pub use page::Page;
pub use plan::QueryPlan;
pub use service::{PageService, PartialResultList};
pub use settings::PagingSettings;
pub use sift_query::Value;

/// Commonly used types.
///
/// ```rust
/// use sift_paging::prelude::*;
/// ```
pub mod prelude {
	pub use crate::capabilities::{
		BackendCapabilities, CollectionMatch, CountStrategy, DatabaseType, NumericTextCast,
	};
	pub use crate::compiler::{CompiledPage, PageRequest, Projected, QueryCompiler, ResultShape};
	pub use crate::criteria::{CriteriaValue, Criterion, LikeKind, NumericOp};
	pub use crate::error::{PageError, Result};
	pub use crate::executor::{QueryExecutor, Row};
	pub use crate::lower::SqlLowering;
	pub use crate::metadata::{
		EntityDescriptor, EnumStorage, EnumType, FieldDescriptor, FieldType, MetadataProvider,
		MetadataRegistry, Schema,
	};
	pub use crate::page::{Page, PageBuilder};
	pub use crate::plan::{AggregateFunction, QueryPlan};
	pub use crate::service::{PageService, PartialResultList};
	pub use crate::settings::PagingSettings;
	pub use sift_query::Value;
}
