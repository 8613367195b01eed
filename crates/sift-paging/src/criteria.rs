//! Criteria values and typed criteria.
//!
//! A criteria map binds field paths to [`CriteriaValue`]s: a raw scalar,
//! `null` ("field is null"), a list ("any of these", or "all of these" on a
//! multi-valued relationship) or a typed [`Criterion`].
//!
//! Every criterion can render itself as a [`Predicate`] against a resolved
//! path and evaluate itself against an in-memory value. Both use SQL
//! three-valued logic, so a criterion that [`applies`](Criterion::applies) to a
//! value is exactly one whose compiled predicate matches a row holding it.

use std::fmt;

use sift_query::Value;

use crate::compiler::ResolvedPath;
use crate::error::{PageError, Result};
use crate::metadata::{EnumType, FieldType};
use crate::plan::{Comparison, ParameterBinder, Predicate};

mod compare;
mod json;
mod parse;

pub(crate) use compare::{compare_values, distinct_key, like_matches, sort_order, sql_equals};

/// Escape character of every `LIKE` pattern built here.
pub const LIKE_ESCAPE: char = '\\';

/// Escape `LIKE` wildcards in user input so it matches literally.
pub fn escape_like(text: &str) -> String {
	text.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_")
}

/// Position of the text in a pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeKind {
	StartsWith,
	EndsWith,
	Contains,
}

impl LikeKind {
	/// The `LIKE` pattern for `text`, escaped with [`LIKE_ESCAPE`].
	pub fn pattern(self, text: &str) -> String {
		let text = escape_like(text);
		match self {
			Self::StartsWith => format!("{text}%"),
			Self::EndsWith => format!("%{text}"),
			Self::Contains => format!("%{text}%"),
		}
	}

	fn matches(self, subject: &str, text: &str) -> bool {
		match self {
			Self::StartsWith => subject.starts_with(text),
			Self::EndsWith => subject.ends_with(text),
			Self::Contains => subject.contains(text),
		}
	}
}

/// Numeric comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericOp {
	Eq,
	Lt,
	Lte,
	Gt,
	Gte,
}

impl NumericOp {
	pub fn comparison(self) -> Comparison {
		match self {
			Self::Eq => Comparison::Eq,
			Self::Lt => Comparison::Lt,
			Self::Lte => Comparison::Lte,
			Self::Gt => Comparison::Gt,
			Self::Gte => Comparison::Gte,
		}
	}

	pub fn symbol(self) -> &'static str {
		match self {
			Self::Eq => "=",
			Self::Lt => "<",
			Self::Lte => "<=",
			Self::Gt => ">",
			Self::Gte => ">=",
		}
	}
}

/// A typed filter primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
	/// Inverts the wrapped value.
	Not(Box<CriteriaValue>),
	/// Closed interval `[min, max]`.
	Between { min: Value, max: Value },
	/// Prefix, suffix or substring match.
	Like { kind: LikeKind, text: String },
	Numeric { op: NumericOp, value: Value },
	/// A resolved enum constant and its stored form.
	Enumerated {
		name: String,
		ordinal: usize,
		stored: Value,
	},
	Bool(bool),
	/// Case-insensitive text equality.
	IgnoreCase(String),
}

impl Criterion {
	/// Negate `value`.
	pub fn not(value: impl Into<CriteriaValue>) -> Self {
		Self::Not(Box::new(value.into()))
	}

	/// A closed interval. Both bounds must be non-null, mutually comparable
	/// and ordered.
	pub fn between(min: impl Into<Value>, max: impl Into<Value>) -> Result<Self> {
		let (min, max) = (min.into(), max.into());
		match compare_values(&min, &max) {
			None => Err(PageError::invalid_argument(
				"between",
				format!(
					"bounds {} and {} are not comparable",
					min.to_sql_literal(),
					max.to_sql_literal()
				),
			)),
			Some(std::cmp::Ordering::Greater) => Err(PageError::invalid_argument(
				"between",
				format!(
					"min {} is greater than max {}",
					min.to_sql_literal(),
					max.to_sql_literal()
				),
			)),
			Some(_) => Ok(Self::Between { min, max }),
		}
	}

	pub fn starts_with(text: impl Into<String>) -> Self {
		Self::Like {
			kind: LikeKind::StartsWith,
			text: text.into(),
		}
	}

	pub fn ends_with(text: impl Into<String>) -> Self {
		Self::Like {
			kind: LikeKind::EndsWith,
			text: text.into(),
		}
	}

	pub fn contains(text: impl Into<String>) -> Self {
		Self::Like {
			kind: LikeKind::Contains,
			text: text.into(),
		}
	}

	pub fn ignore_case(text: impl Into<String>) -> Self {
		Self::IgnoreCase(text.into())
	}

	/// A numeric comparison against an already typed number.
	pub fn numeric(op: NumericOp, value: impl Into<Value>) -> Result<Self> {
		let value = value.into();
		if !value.is_numeric() || value.is_null() {
			return Err(PageError::invalid_argument(
				"value",
				format!("{} is not a number", value.to_sql_literal()),
			));
		}
		Ok(Self::Numeric { op, value })
	}

	/// Parse a numeric criterion for a field of `field_type`.
	///
	/// Accepts numbers and text such as `"42"`, `"<5"`, `">=1.5"` or the
	/// range form `"1..10"`.
	pub fn parse_numeric(value: &Value, field_type: &FieldType) -> Result<Self> {
		parse::numeric(value, field_type)
	}

	/// Parse an enum constant by name (ignoring case) or by ordinal.
	pub fn parse_enum(value: &Value, enum_type: &EnumType) -> Result<Self> {
		parse::enumerated(value, enum_type)
	}

	/// Parse a boolean from a bool, `0`/`1` or `"true"`/`"false"`.
	pub fn parse_bool(value: &Value) -> Result<Self> {
		parse::boolean(value)
	}

	/// Render against `path`, binding values through `binder`.
	pub fn build(&self, path: &ResolvedPath, binder: &mut ParameterBinder) -> Result<Predicate> {
		let operand = path.operand.clone();
		let predicate = match self {
			Self::Not(inner) => inner.build_simple(path, binder)?.negate(),
			Self::Between { min, max } => Predicate::Between {
				operand,
				min: binder.bind(&path.name, min.clone()),
				max: binder.bind(&path.name, max.clone()),
			},
			Self::Like { kind, text } if path.field_type.is_numeric() => Predicate::Like {
				operand: operand.as_text(),
				pattern: binder.bind(&path.name, Value::from(kind.pattern(text))),
			},
			Self::Like { kind, text } => Predicate::Like {
				operand: operand.lower(),
				pattern: binder.bind(&path.name, Value::from(kind.pattern(&text.to_lowercase()))),
			},
			Self::Numeric { op, value } => Predicate::Compare {
				operand,
				op: op.comparison(),
				value: binder.bind(&path.name, value.clone()),
			},
			Self::Enumerated { stored, .. } => Predicate::Compare {
				operand,
				op: Comparison::Eq,
				value: binder.bind(&path.name, stored.clone()),
			},
			Self::Bool(expected) => Predicate::Compare {
				operand,
				op: Comparison::Eq,
				value: binder.bind(&path.name, Value::from(*expected)),
			},
			Self::IgnoreCase(text) => Predicate::Compare {
				operand: operand.lower(),
				op: Comparison::Eq,
				value: binder.bind(&path.name, Value::from(text.to_lowercase())),
			},
		};
		Ok(predicate)
	}

	/// Three-valued evaluation against a field value; `None` is SQL unknown.
	pub fn evaluate(&self, value: &Value) -> Option<bool> {
		match self {
			Self::Not(inner) => inner.evaluate(value).map(|matched| !matched),
			_ if value.is_null() => None,
			Self::Between { min, max } => Some(
				compare_values(value, min).is_some_and(|o| o.is_ge())
					&& compare_values(value, max).is_some_and(|o| o.is_le()),
			),
			Self::Like { kind, text } if value.is_numeric() => Some(
				value
					.to_text()
					.is_some_and(|subject| kind.matches(&subject, text)),
			),
			Self::Like { kind, text } => Some(value.to_text().is_some_and(|subject| {
				kind.matches(&subject.to_lowercase(), &text.to_lowercase())
			})),
			Self::Numeric { op, value: bound } => {
				Some(compare_values(value, bound).is_some_and(|o| op.comparison().holds(o)))
			}
			Self::Enumerated { name, ordinal, .. } => Some(match value {
				Value::String(Some(text)) => text.as_str() == name,
				other => other
					.as_i64()
					.is_some_and(|v| usize::try_from(v).is_ok_and(|v| v == *ordinal)),
			}),
			Self::Bool(expected) => Some(value.as_bool() == Some(*expected)),
			Self::IgnoreCase(text) => Some(
				value
					.to_text()
					.is_some_and(|subject| subject.to_lowercase() == text.to_lowercase()),
			),
		}
	}

	/// Whether a row holding `value` satisfies the criterion.
	pub fn applies(&self, value: &Value) -> bool {
		self.evaluate(value) == Some(true)
	}
}

impl fmt::Display for Criterion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Not(inner) => write!(f, "Not({inner})"),
			Self::Between { min, max } => {
				write!(f, "Between({}, {})", text_of(min), text_of(max))
			}
			Self::Like { kind, text } => write!(f, "Like({:?})", kind.pattern(text)),
			Self::Numeric { op, value } => write!(f, "Numeric({}{})", op.symbol(), text_of(value)),
			Self::Enumerated { name, .. } => write!(f, "Enumerated({name})"),
			Self::Bool(value) => write!(f, "Bool({value})"),
			Self::IgnoreCase(text) => write!(f, "IgnoreCase({text:?})"),
		}
	}
}

/// Canonical text of a value; strings are quoted so they never collide
/// with `null` or numbers.
fn text_of(value: &Value) -> String {
	match value.as_str() {
		Some(text) => format!("{text:?}"),
		None => value.to_text().unwrap_or_else(|| "null".to_string()),
	}
}

/// The value bound to a field in a criteria map.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
	/// The field is null.
	Null,
	/// Loosely typed input, interpreted against the field's declared type.
	Scalar(Value),
	/// Any of these; all of these on a multi-valued relationship.
	List(Vec<CriteriaValue>),
	Criterion(Criterion),
}

impl CriteriaValue {
	/// Negate this value.
	pub fn not(self) -> Self {
		Self::Criterion(Criterion::not(self))
	}

	/// Strip negation wrappers, returning the inner value and whether an odd
	/// number of them was removed.
	pub fn unwrap_negation(&self) -> (&CriteriaValue, bool) {
		let mut current = self;
		let mut negated = false;
		while let Self::Criterion(Criterion::Not(inner)) = current {
			negated = !negated;
			current = inner;
		}
		(current, negated)
	}

	/// Build without consulting the field type: scalars compare for
	/// equality and lists become a disjunction.
	pub fn build_simple(&self, path: &ResolvedPath, binder: &mut ParameterBinder) -> Result<Predicate> {
		Ok(match self {
			Self::Null => Predicate::IsNull(path.operand.clone()),
			Self::Scalar(value) => Predicate::Compare {
				operand: path.operand.clone(),
				op: Comparison::Eq,
				value: binder.bind(&path.name, value.clone()),
			},
			Self::List(items) => Predicate::Or(
				items
					.iter()
					.map(|item| item.build_simple(path, binder))
					.collect::<Result<_>>()?,
			),
			Self::Criterion(criterion) => criterion.build(path, binder)?,
		})
	}

	/// Three-valued evaluation against a field value.
	pub fn evaluate(&self, value: &Value) -> Option<bool> {
		match self {
			Self::Null => Some(value.is_null()),
			Self::Scalar(expected) => sql_equals(value, expected),
			Self::List(items) => {
				let mut result = Some(false);
				for item in items {
					match item.evaluate(value) {
						Some(true) => return Some(true),
						None => result = None,
						Some(false) => {}
					}
				}
				result
			}
			Self::Criterion(criterion) => criterion.evaluate(value),
		}
	}

	pub fn applies(&self, value: &Value) -> bool {
		self.evaluate(value) == Some(true)
	}

	/// Build a value from loosely typed JSON input.
	///
	/// Objects with a single key select a criterion: `not`, `like`,
	/// `startsWith`, `endsWith`, `contains`, `between`, `lt`, `lte`, `gt`,
	/// `gte`, `eq` and `ignoreCase`.
	pub fn from_json(value: &serde_json::Value) -> Result<Self> {
		json::from_json(value)
	}
}

impl fmt::Display for CriteriaValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Scalar(value) => f.write_str(&text_of(value)),
			Self::List(items) => {
				f.write_str("[")?;
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Self::Criterion(criterion) => write!(f, "{criterion}"),
		}
	}
}

impl From<Value> for CriteriaValue {
	fn from(value: Value) -> Self {
		if value.is_null() {
			Self::Null
		} else {
			Self::Scalar(value)
		}
	}
}

impl From<Criterion> for CriteriaValue {
	fn from(criterion: Criterion) -> Self {
		Self::Criterion(criterion)
	}
}

macro_rules! impl_from_scalar {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for CriteriaValue {
				fn from(value: $ty) -> Self {
					Self::from(Value::from(value))
				}
			}
		)*
	};
}

impl_from_scalar!(bool, i32, i64, f64, &str, String);

impl<T> From<Option<T>> for CriteriaValue
where
	T: Into<CriteriaValue>,
{
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

impl<T> From<Vec<T>> for CriteriaValue
where
	T: Into<CriteriaValue>,
{
	fn from(items: Vec<T>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::plan::{Operand, Source};
	use rstest::rstest;

	fn path(name: &str, field_type: FieldType) -> ResolvedPath {
		ResolvedPath {
			name: name.to_string(),
			operand: Operand::field(Source::Root, name, field_type.clone()),
			field_type,
			multi_valued: false,
		}
	}

	#[rstest]
	fn test_like_lowercases_text_fields() {
		// Arrange
		let mut binder = ParameterBinder::new();
		let criterion = Criterion::contains("AnN");

		// Act
		let predicate = criterion
			.build(&path("name", FieldType::Text), &mut binder)
			.unwrap();
		let parameters = binder.into_parameters();

		// Assert
		let Predicate::Like { operand, pattern } = predicate else {
			panic!("expected LIKE, got {predicate:?}");
		};
		assert!(matches!(operand, Operand::Lower(_)));
		assert_eq!(parameters.get(&pattern), Some(&Value::from("%ann%")));
	}

	#[rstest]
	fn test_like_casts_numeric_fields() {
		// Arrange
		let mut binder = ParameterBinder::new();

		// Act
		let predicate = Criterion::starts_with("12")
			.build(&path("age", FieldType::Int), &mut binder)
			.unwrap();

		// Assert
		assert!(matches!(
			predicate,
			Predicate::Like { operand: Operand::AsText(_), .. }
		));
	}

	#[rstest]
	#[case(Criterion::contains("nn"), Value::from("ANNA"), true)]
	#[case(Criterion::starts_with("b"), Value::from("anna"), false)]
	#[case(Criterion::ends_with("3"), Value::Int(Some(123)), true)]
	#[case(Criterion::Bool(true), Value::Bool(Some(true)), true)]
	#[case(Criterion::ignore_case("MiXeD"), Value::from("mixed"), true)]
	#[case(Criterion::numeric(NumericOp::Gte, 5).unwrap(), Value::Int(Some(5)), true)]
	#[case(Criterion::numeric(NumericOp::Lt, 5).unwrap(), Value::Int(Some(5)), false)]
	#[case(Criterion::between(1, 3).unwrap(), Value::Int(Some(3)), true)]
	#[case(Criterion::between(1, 3).unwrap(), Value::Int(Some(4)), false)]
	fn test_applies(#[case] criterion: Criterion, #[case] value: Value, #[case] expected: bool) {
		assert_eq!(criterion.applies(&value), expected);
	}

	#[rstest]
	fn test_null_is_unknown_except_under_null_check() {
		// Arrange
		let equals = Criterion::ignore_case("a");
		let not_null = CriteriaValue::Null.not();

		// Assert
		assert_eq!(equals.evaluate(&Value::String(None)), None);
		assert!(!Criterion::not(Criterion::ignore_case("a")).applies(&Value::String(None)));
		assert!(not_null.applies(&Value::from("x")));
		assert!(!not_null.applies(&Value::String(None)));
	}

	#[rstest]
	fn test_unwrap_negation_counts_parity() {
		// Arrange
		let value = CriteriaValue::from("a").not().not().not();

		// Act
		let (inner, negated) = value.unwrap_negation();

		// Assert
		assert_eq!(inner, &CriteriaValue::from("a"));
		assert!(negated);
	}

	#[rstest]
	fn test_between_rejects_bad_bounds() {
		assert!(Criterion::between(5, 1).is_err());
		assert!(Criterion::between(1, "z").is_err());
		assert!(Criterion::between(Value::Int(None), 1).is_err());
	}

	#[rstest]
	fn test_display() {
		// Arrange
		let value = CriteriaValue::List(vec![
			CriteriaValue::from("a"),
			CriteriaValue::Null,
			Criterion::not(Criterion::starts_with("b")).into(),
		]);

		// Assert
		assert_eq!(value.to_string(), r#"["a", null, Not(Like("b%"))]"#);
	}

	#[rstest]
	fn test_display_keeps_null_apart_from_text() {
		// Arrange
		let null = CriteriaValue::Null;
		let text = CriteriaValue::from("null");
		let number = CriteriaValue::from(1);
		let numeral = CriteriaValue::from("1");

		// Assert
		assert_ne!(null.to_string(), text.to_string());
		assert_ne!(number.to_string(), numeral.to_string());
		assert_eq!(text.to_string(), r#""null""#);
	}

	#[rstest]
	#[case("100%", "100\\%")]
	#[case("user_name", "user\\_name")]
	#[case("path\\to", "path\\\\to")]
	#[case("100%_done", "100\\%\\_done")]
	#[case("plain text", "plain text")]
	fn test_escape_like(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_like(input), expected);
	}

	#[rstest]
	#[case(Criterion::contains("_"), "Dune", false)]
	#[case(Criterion::contains("_"), "a_b", true)]
	#[case(Criterion::starts_with("50%"), "500 pages", false)]
	#[case(Criterion::starts_with("50%"), "50% off", true)]
	fn test_like_wildcards_match_literally(
		#[case] criterion: Criterion,
		#[case] subject: &str,
		#[case] expected: bool,
	) {
		// Arrange
		let Criterion::Like { kind, text } = &criterion else {
			panic!("expected a pattern match");
		};
		let pattern = kind.pattern(text);

		// Act
		let applies = criterion.applies(&Value::from(subject));

		// Assert
		assert_eq!(applies, expected);
		assert_eq!(like_matches(subject, &pattern), expected);
	}

	#[rstest]
	fn test_from_option() {
		assert_eq!(CriteriaValue::from(None::<i32>), CriteriaValue::Null);
		assert_eq!(
			CriteriaValue::from(Some(3)),
			CriteriaValue::Scalar(Value::Int(Some(3)))
		);
	}
}
