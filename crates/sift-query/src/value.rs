//! Value types for SQL parameters.
//!
//! - [`Value`]: a nullable, typed SQL scalar
//! - [`Values`]: the ordered parameter list produced by a query builder
//! - [`IntoValue`]: conversion trait used by the expression builders

mod core;
mod convert;

pub use self::core::Value;
pub use convert::IntoValue;

/// Ordered collection of bound parameter values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values(pub Vec<Value>);

impl Values {
	/// Create an empty value list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a value.
	pub fn push(&mut self, value: Value) {
		self.0.push(value);
	}

	/// Number of values.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no value was collected.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterate over the values.
	pub fn iter(&self) -> std::slice::Iter<'_, Value> {
		self.0.iter()
	}

	/// Consume into the underlying vector.
	pub fn into_inner(self) -> Vec<Value> {
		self.0
	}
}

impl IntoIterator for Values {
	type Item = Value;
	type IntoIter = std::vec::IntoIter<Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Values {
	type Item = &'a Value;
	type IntoIter = std::slice::Iter<'a, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
