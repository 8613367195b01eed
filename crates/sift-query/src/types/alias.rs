//! Dynamic identifier.

use super::iden::Iden;

/// A runtime-determined identifier, typically a table alias such as `t0`.
///
/// # Example
///
/// ```rust
/// use sift_query::{Alias, IntoIden};
///
/// let alias = Alias::new("t0").into_iden();
/// assert_eq!(alias.to_string(), "t0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
	/// Create a new alias.
	pub fn new<T>(name: T) -> Self
	where
		T: Into<String>,
	{
		Self(name.into())
	}
}

impl Iden for Alias {
	fn unquoted(&self) -> String {
		self.0.clone()
	}
}
