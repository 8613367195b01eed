//! Conversions from Rust types into [`Value`].

use super::core::Value;

/// Conversion trait for types usable as SQL values.
pub trait IntoValue {
	/// Convert into a [`Value`].
	fn into_value(self) -> Value;
}

impl<T> IntoValue for T
where
	T: Into<Value>,
{
	fn into_value(self) -> Value {
		self.into()
	}
}

macro_rules! impl_from_primitive {
	($ty:ty, $variant:ident) => {
		impl From<$ty> for Value {
			fn from(v: $ty) -> Self {
				Value::$variant(Some(v))
			}
		}

		impl From<Option<$ty>> for Value {
			fn from(v: Option<$ty>) -> Self {
				Value::$variant(v)
			}
		}
	};
}

macro_rules! impl_from_boxed {
	($ty:ty, $variant:ident) => {
		impl From<$ty> for Value {
			fn from(v: $ty) -> Self {
				Value::$variant(Some(Box::new(v)))
			}
		}

		impl From<Option<$ty>> for Value {
			fn from(v: Option<$ty>) -> Self {
				Value::$variant(v.map(Box::new))
			}
		}
	};
}

impl_from_primitive!(bool, Bool);
impl_from_primitive!(i16, SmallInt);
impl_from_primitive!(i32, Int);
impl_from_primitive!(i64, BigInt);
impl_from_primitive!(f32, Float);
impl_from_primitive!(f64, Double);
impl_from_boxed!(String, String);

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::String(Some(Box::new(v.to_string())))
	}
}

#[cfg(feature = "with-chrono")]
impl_from_boxed!(chrono::NaiveDate, ChronoDate);
#[cfg(feature = "with-chrono")]
impl_from_boxed!(chrono::NaiveDateTime, ChronoDateTime);
#[cfg(feature = "with-chrono")]
impl_from_boxed!(chrono::DateTime<chrono::Utc>, ChronoDateTimeUtc);
#[cfg(feature = "with-uuid")]
impl_from_boxed!(uuid::Uuid, Uuid);
#[cfg(feature = "with-rust_decimal")]
impl_from_boxed!(rust_decimal::Decimal, Decimal);
