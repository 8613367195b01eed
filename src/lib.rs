//! # Sift
//!
//! Criteria-driven pagination for relational schemas.
//!
//! Sift turns a page specification (a range, an ordering and maps of field
//! criteria keyed by dotted paths) into a single SQL query plus an optional
//! count query, joining the relationships the paths cross and honoring the
//! quirks of each database backend.
//!
//! ## Crates
//!
//! - [`query`] (`sift-query`) - `SELECT` statement model and dialect writers
//! - [`paging`] (`sift-paging`) - pages, criteria, the compiler and executors
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL statement writer
//! - `mysql` (default) - MySQL statement writer
//! - `sqlite` (default) - SQLite statement writer
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sift::prelude::*;
//!
//! let schema = Arc::new(Schema::new().entity(
//!     EntityDescriptor::new("Person", "person")
//!         .field(FieldDescriptor::basic("name", FieldType::Text)),
//! ));
//! let registry = MetadataRegistry::new(Arc::clone(&schema));
//! let capabilities = BackendCapabilities::postgres();
//!
//! let page = Page::builder()
//!     .range(0, 20)?
//!     .all_match([("name", Criterion::starts_with("an"))])?
//!     .build();
//! let compiled = QueryCompiler::new(&schema, &registry, &capabilities)
//!     .compile(&PageRequest::new("Person", page))?;
//!
//! let (sql, values) = SqlLowering::new(&capabilities)
//!     .to_sql(&compiled.query, &PostgresQueryBuilder::new())?;
//! assert!(sql.starts_with(r#"SELECT "t0".* FROM "person" AS "t0" WHERE LOWER("t0"."name") LIKE $1"#));
//! assert_eq!(values.len(), 2);
//! # Ok::<(), sift::PageError>(())
//! ```

pub use sift_paging as paging;
pub use sift_query as query;

pub use sift_paging::{
	BackendCapabilities, CompiledPage, CriteriaValue, Criterion, DatabaseType, MemoryExecutor,
	Page, PageError, PageRequest, PageService, PagingSettings, PartialResultList, QueryCompiler,
	QueryExecutor, QueryPlan, Result, Row, Schema, SqlLowering, Value,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use sift::prelude::*;
/// ```
pub mod prelude {
	pub use sift_paging::prelude::*;

	#[cfg(feature = "mysql")]
	pub use sift_query::MySqlQueryBuilder;
	#[cfg(feature = "postgres")]
	pub use sift_query::PostgresQueryBuilder;
	pub use sift_query::QueryBuilder;
	#[cfg(feature = "sqlite")]
	pub use sift_query::SqliteQueryBuilder;
}
