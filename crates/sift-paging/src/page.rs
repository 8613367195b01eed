//! Page specifications.
//!
//! A [`Page`] describes one slice of a filtered, ordered result set: the
//! range, the ordering and two criteria maps. Required criteria must all
//! match; of the optional criteria at least one must match.
//!
//! Pages are immutable and compare by value. Their [`Display`](fmt::Display)
//! form is canonical (criteria are rendered in key order) and is used as the
//! cache partition key of compiled queries.
//!
//! # Example
//!
//! ```rust
//! use sift_paging::page::Page;
//!
//! let page = Page::builder()
//!     .range(20, 10)?
//!     .order_by("name", true)
//!     .all_match([("status", "ACTIVE")])?
//!     .build();
//!
//! assert_eq!(page.offset(), 20);
//! assert_eq!(page.to_string(), r#"Page[20,10,{name=true},{status="ACTIVE"},{}]"#);
//! # Ok::<(), sift_paging::PageError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use crate::criteria::CriteriaValue;
use crate::error::{PageError, Result};

/// Ordered mapping from field path to ascending flag.
pub type Ordering = IndexMap<String, bool>;

/// Mapping from field path to criteria value, iterated in key order.
pub type Criteria = BTreeMap<String, CriteriaValue>;

/// An immutable page specification.
#[derive(Debug, Clone)]
pub struct Page {
	offset: u64,
	limit: u64,
	ordering: Ordering,
	required: Criteria,
	optional: Criteria,
}

impl PartialEq for Page {
	fn eq(&self, other: &Self) -> bool {
		// Ordering is positional: the first entry is the primary sort key.
		self.offset == other.offset
			&& self.limit == other.limit
			&& self.ordering.iter().eq(other.ordering.iter())
			&& self.required == other.required
			&& self.optional == other.optional
	}
}

impl Page {
	pub const DEFAULT_OFFSET: u64 = 0;
	/// The limit of a page without an upper bound.
	pub const UNBOUNDED: u64 = i64::MAX as u64;
	/// The field ordered by when no ordering is given.
	pub const DEFAULT_ORDER_FIELD: &'static str = "id";

	/// Build a page, applying defaults for absent parts.
	///
	/// Fails when `offset` is negative or `limit` is smaller than one.
	pub fn new(
		offset: Option<i64>,
		limit: Option<i64>,
		ordering: Option<Ordering>,
		required: Option<Criteria>,
		optional: Option<Criteria>,
	) -> Result<Self> {
		let offset = offset.map_or(Ok(Self::DEFAULT_OFFSET), validate_offset)?;
		let limit = limit.map_or(Ok(Self::UNBOUNDED), validate_limit)?;
		let ordering = ordering
			.filter(|ordering| !ordering.is_empty())
			.unwrap_or_else(default_ordering);
		Ok(Self {
			offset,
			limit,
			ordering,
			required: required.unwrap_or_default(),
			optional: optional.unwrap_or_default(),
		})
	}

	/// A page over the given range with default ordering and no criteria.
	pub fn of(offset: i64, limit: i64) -> Result<Self> {
		Self::new(Some(offset), Some(limit), None, None, None)
	}

	/// Every row, default ordering.
	pub fn all() -> Self {
		Self {
			offset: Self::DEFAULT_OFFSET,
			limit: Self::UNBOUNDED,
			ordering: default_ordering(),
			required: Criteria::new(),
			optional: Criteria::new(),
		}
	}

	/// The first row, default ordering.
	pub fn one() -> Self {
		Self {
			limit: 1,
			..Self::all()
		}
	}

	pub fn builder() -> PageBuilder {
		PageBuilder::default()
	}

	pub fn offset(&self) -> u64 {
		self.offset
	}

	pub fn limit(&self) -> u64 {
		self.limit
	}

	pub fn ordering(&self) -> &Ordering {
		&self.ordering
	}

	pub fn required_criteria(&self) -> &Criteria {
		&self.required
	}

	pub fn optional_criteria(&self) -> &Criteria {
		&self.optional
	}

	/// Whether the page restricts rows at all.
	pub fn has_criteria(&self) -> bool {
		!self.required.is_empty() || !self.optional.is_empty()
	}

	/// Whether the range differs from "everything from the first row".
	pub fn is_ranged(&self) -> bool {
		self.offset != Self::DEFAULT_OFFSET || self.limit != Self::UNBOUNDED
	}
}

impl Default for Page {
	fn default() -> Self {
		Self::all()
	}
}

impl fmt::Display for Page {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Page[{},{},{{", self.offset, self.limit)?;
		for (idx, (field, ascending)) in self.ordering.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{field}={ascending}")?;
		}
		f.write_str("},")?;
		write_criteria(f, &self.required)?;
		f.write_str(",")?;
		write_criteria(f, &self.optional)?;
		f.write_str("]")
	}
}

fn write_criteria(f: &mut fmt::Formatter<'_>, criteria: &Criteria) -> fmt::Result {
	f.write_str("{")?;
	for (idx, (field, value)) in criteria.iter().enumerate() {
		if idx > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{field}={value}")?;
	}
	f.write_str("}")
}

fn default_ordering() -> Ordering {
	let mut ordering = Ordering::new();
	ordering.insert(Page::DEFAULT_ORDER_FIELD.to_string(), false);
	ordering
}

fn validate_offset(offset: i64) -> Result<u64> {
	u64::try_from(offset)
		.map_err(|_| PageError::invalid_argument("offset", "must be zero or positive"))
}

fn validate_limit(limit: i64) -> Result<u64> {
	u64::try_from(limit)
		.ok()
		.filter(|limit| *limit >= 1)
		.ok_or_else(|| PageError::invalid_argument("limit", "must be at least 1"))
}

/// Builder for [`Page`].
///
/// `range`, `all_match` and `any_match` may each be called once; arguments
/// are validated when the method is called.
#[derive(Debug, Default, Clone)]
pub struct PageBuilder {
	range: Option<(u64, u64)>,
	ordering: Ordering,
	required: Option<Criteria>,
	optional: Option<Criteria>,
}

impl PageBuilder {
	/// Set the offset and limit.
	pub fn range(mut self, offset: i64, limit: i64) -> Result<Self> {
		if self.range.is_some() {
			return Err(PageError::AlreadySet("range"));
		}
		self.range = Some((validate_offset(offset)?, validate_limit(limit)?));
		Ok(self)
	}

	/// Append a sort key. Earlier calls are the more significant keys;
	/// repeating a field updates its direction in place.
	pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
		self.ordering.insert(field.into(), ascending);
		self
	}

	/// Criteria that must all match.
	pub fn all_match<I, K, V>(mut self, criteria: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<CriteriaValue>,
	{
		if self.required.is_some() {
			return Err(PageError::AlreadySet("allMatch"));
		}
		self.required = Some(collect(criteria));
		Ok(self)
	}

	/// Criteria of which at least one must match.
	pub fn any_match<I, K, V>(mut self, criteria: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<CriteriaValue>,
	{
		if self.optional.is_some() {
			return Err(PageError::AlreadySet("anyMatch"));
		}
		self.optional = Some(collect(criteria));
		Ok(self)
	}

	pub fn build(self) -> Page {
		let (offset, limit) = self
			.range
			.unwrap_or((Page::DEFAULT_OFFSET, Page::UNBOUNDED));
		Page {
			offset,
			limit,
			ordering: if self.ordering.is_empty() {
				default_ordering()
			} else {
				self.ordering
			},
			required: self.required.unwrap_or_default(),
			optional: self.optional.unwrap_or_default(),
		}
	}
}

fn collect<I, K, V>(criteria: I) -> Criteria
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<CriteriaValue>,
{
	criteria
		.into_iter()
		.map(|(field, value)| (field.into(), value.into()))
		.collect()
}
