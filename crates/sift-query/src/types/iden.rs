//! Identifier traits.

use std::fmt;

/// Shared pointer used for type-erased identifiers.
pub type SeaRc<T> = std::sync::Arc<T>;

/// A SQL identifier: table, column or alias name.
///
/// The identifier is stored unquoted; backends apply their own escaping
/// when writing it.
pub trait Iden: fmt::Debug + Send + Sync {
	/// The identifier without any quoting.
	fn unquoted(&self) -> String;
}

/// Type-erased identifier.
pub type DynIden = SeaRc<dyn Iden>;

impl fmt::Display for dyn Iden {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.unquoted())
	}
}

impl Iden for &'static str {
	fn unquoted(&self) -> String {
		(*self).to_string()
	}
}

impl Iden for String {
	fn unquoted(&self) -> String {
		self.clone()
	}
}

/// Conversion trait for identifier types.
pub trait IntoIden {
	/// Convert into a [`DynIden`].
	fn into_iden(self) -> DynIden;
}

impl<T> IntoIden for T
where
	T: Iden + 'static,
{
	fn into_iden(self) -> DynIden {
		SeaRc::new(self)
	}
}

impl IntoIden for DynIden {
	fn into_iden(self) -> DynIden {
		self
	}
}
