//! Core Value enum definition.

/// Core value representation for SQL parameters.
///
/// ## Null Values
///
/// All variants use `Option<T>` to represent nullable values. A `None` value
/// will be rendered as SQL `NULL`.
///
/// ## Example
///
/// ```rust
/// use sift_query::Value;
///
/// let int_val = Value::Int(Some(42));
/// let null_int = Value::Int(None);
/// let string_val = Value::String(Some(Box::new("hello".to_string())));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	// -------------------------------------------------------------------------
	// Primitive types (inline, not boxed)
	// -------------------------------------------------------------------------
	/// Boolean value
	Bool(Option<bool>),
	/// 16-bit signed integer
	SmallInt(Option<i16>),
	/// 32-bit signed integer
	Int(Option<i32>),
	/// 64-bit signed integer
	BigInt(Option<i64>),
	/// 32-bit floating point
	Float(Option<f32>),
	/// 64-bit floating point
	Double(Option<f64>),

	// -------------------------------------------------------------------------
	// Heap-allocated types (boxed for size optimization)
	// -------------------------------------------------------------------------
	/// String value (boxed)
	String(Option<Box<String>>),

	// -------------------------------------------------------------------------
	// Feature-gated types: chrono
	// -------------------------------------------------------------------------
	/// Chrono NaiveDate
	#[cfg(feature = "with-chrono")]
	ChronoDate(Option<Box<chrono::NaiveDate>>),
	/// Chrono NaiveDateTime
	#[cfg(feature = "with-chrono")]
	ChronoDateTime(Option<Box<chrono::NaiveDateTime>>),
	/// Chrono DateTime with UTC timezone
	#[cfg(feature = "with-chrono")]
	ChronoDateTimeUtc(Option<Box<chrono::DateTime<chrono::Utc>>>),

	// -------------------------------------------------------------------------
	// Feature-gated types: uuid
	// -------------------------------------------------------------------------
	/// UUID value
	#[cfg(feature = "with-uuid")]
	Uuid(Option<Box<uuid::Uuid>>),

	// -------------------------------------------------------------------------
	// Feature-gated types: decimal
	// -------------------------------------------------------------------------
	/// Rust Decimal value
	#[cfg(feature = "with-rust_decimal")]
	Decimal(Option<Box<rust_decimal::Decimal>>),
}

impl Value {
	/// Returns `true` if this value is null.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::Value;
	///
	/// assert!(Value::Int(None).is_null());
	/// assert!(!Value::Int(Some(42)).is_null());
	/// ```
	#[must_use]
	pub fn is_null(&self) -> bool {
		match self {
			Self::Bool(v) => v.is_none(),
			Self::SmallInt(v) => v.is_none(),
			Self::Int(v) => v.is_none(),
			Self::BigInt(v) => v.is_none(),
			Self::Float(v) => v.is_none(),
			Self::Double(v) => v.is_none(),
			Self::String(v) => v.is_none(),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDate(v) => v.is_none(),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDateTime(v) => v.is_none(),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDateTimeUtc(v) => v.is_none(),
			#[cfg(feature = "with-uuid")]
			Self::Uuid(v) => v.is_none(),
			#[cfg(feature = "with-rust_decimal")]
			Self::Decimal(v) => v.is_none(),
		}
	}

	/// Returns `true` for the integer, floating point and decimal variants.
	#[must_use]
	pub fn is_numeric(&self) -> bool {
		match self {
			Self::SmallInt(_) | Self::Int(_) | Self::BigInt(_) | Self::Float(_) | Self::Double(_) => {
				true
			}
			#[cfg(feature = "with-rust_decimal")]
			Self::Decimal(_) => true,
			_ => false,
		}
	}

	/// The value as `i64`, if it is a non-null integer.
	#[must_use]
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::SmallInt(Some(v)) => Some(i64::from(*v)),
			Self::Int(Some(v)) => Some(i64::from(*v)),
			Self::BigInt(Some(v)) => Some(*v),
			_ => None,
		}
	}

	/// The value as `f64`, if it is a non-null number.
	#[must_use]
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::SmallInt(Some(v)) => Some(f64::from(*v)),
			Self::Int(Some(v)) => Some(f64::from(*v)),
			Self::BigInt(Some(v)) => Some(*v as f64),
			Self::Float(Some(v)) => Some(f64::from(*v)),
			Self::Double(Some(v)) => Some(*v),
			#[cfg(feature = "with-rust_decimal")]
			Self::Decimal(Some(v)) => {
				use rust_decimal::prelude::ToPrimitive;
				v.to_f64()
			}
			_ => None,
		}
	}

	/// The value as `bool`, if it is a non-null boolean.
	#[must_use]
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => *v,
			_ => None,
		}
	}

	/// The value as `&str`, if it is a non-null string.
	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(Some(v)) => Some(v.as_str()),
			_ => None,
		}
	}

	/// Textual form of a non-null value, without SQL quoting.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::Value;
	///
	/// assert_eq!(Value::Int(Some(7)).to_text(), Some("7".to_string()));
	/// assert_eq!(Value::Int(None).to_text(), None);
	/// ```
	#[must_use]
	pub fn to_text(&self) -> Option<String> {
		match self {
			Self::Bool(v) => v.map(|v| v.to_string()),
			Self::SmallInt(v) => v.map(|v| v.to_string()),
			Self::Int(v) => v.map(|v| v.to_string()),
			Self::BigInt(v) => v.map(|v| v.to_string()),
			Self::Float(v) => v.map(|v| v.to_string()),
			Self::Double(v) => v.map(|v| v.to_string()),
			Self::String(v) => v.as_ref().map(|v| v.to_string()),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDate(v) => v.as_ref().map(|v| v.to_string()),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDateTime(v) => v.as_ref().map(|v| v.to_string()),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDateTimeUtc(v) => v.as_ref().map(|v| v.to_rfc3339()),
			#[cfg(feature = "with-uuid")]
			Self::Uuid(v) => v.as_ref().map(|v| v.to_string()),
			#[cfg(feature = "with-rust_decimal")]
			Self::Decimal(v) => v.as_ref().map(|v| v.to_string()),
		}
	}

	/// Convert this value to a SQL literal string suitable for inlining
	/// into a SQL statement.
	///
	/// # Example
	///
	/// ```rust
	/// use sift_query::Value;
	///
	/// assert_eq!(Value::Int(Some(42)).to_sql_literal(), "42");
	/// assert_eq!(Value::Int(None).to_sql_literal(), "NULL");
	/// assert_eq!(
	///     Value::String(Some(Box::new("it's".to_string()))).to_sql_literal(),
	///     "'it''s'"
	/// );
	/// ```
	#[must_use]
	pub fn to_sql_literal(&self) -> String {
		match self {
			Self::Bool(Some(true)) => "TRUE".to_string(),
			Self::Bool(Some(false)) => "FALSE".to_string(),
			v if v.is_null() => "NULL".to_string(),
			v if v.is_numeric() => v.to_text().unwrap_or_default(),
			// Escape single quotes by doubling them
			v => format!("'{}'", v.to_text().unwrap_or_default().replace('\'', "''")),
		}
	}
}

impl Default for Value {
	/// Returns the default value, which is a null string.
	fn default() -> Self {
		Self::String(None)
	}
}
