//! Value comparison with SQL-like coercions.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sift_query::Value;

use super::LIKE_ESCAPE;

/// Compare two non-null values of compatible kinds.
///
/// Numbers compare across integer, floating point and decimal variants.
/// Returns `None` when either side is null or the kinds are incomparable.
pub(crate) fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
	if left.is_null() || right.is_null() {
		return None;
	}
	if left.is_numeric() && right.is_numeric() {
		return compare_numbers(left, right);
	}
	match (left, right) {
		(Value::String(Some(a)), Value::String(Some(b))) => Some(a.cmp(b)),
		(Value::Bool(Some(a)), Value::Bool(Some(b))) => Some(a.cmp(b)),
		(Value::ChronoDate(Some(a)), Value::ChronoDate(Some(b))) => Some(a.cmp(b)),
		(Value::ChronoDateTime(Some(a)), Value::ChronoDateTime(Some(b))) => Some(a.cmp(b)),
		(Value::ChronoDateTimeUtc(Some(a)), Value::ChronoDateTimeUtc(Some(b))) => {
			Some(a.cmp(b))
		}
		(Value::Uuid(Some(a)), Value::Uuid(Some(b))) => Some(a.cmp(b)),
		_ => None,
	}
}

fn compare_numbers(left: &Value, right: &Value) -> Option<Ordering> {
	if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
		return Some(a.cmp(&b));
	}
	if let (Some(a), Some(b)) = (as_decimal(left), as_decimal(right)) {
		return Some(a.cmp(&b));
	}
	left.as_f64()?.partial_cmp(&right.as_f64()?)
}

fn as_decimal(value: &Value) -> Option<Decimal> {
	match value {
		Value::Decimal(Some(d)) => Some(**d),
		Value::Float(_) | Value::Double(_) => None,
		other => other.as_i64().and_then(Decimal::from_i64),
	}
}

/// SQL equality: `None` when either side is null.
pub(crate) fn sql_equals(left: &Value, right: &Value) -> Option<bool> {
	if left.is_null() || right.is_null() {
		return None;
	}
	Some(compare_values(left, right) == Some(Ordering::Equal))
}

/// Total order used for sorting: nulls sort after every other value and
/// incomparable kinds fall back to their textual form.
pub(crate) fn sort_order(left: &Value, right: &Value) -> Ordering {
	match (left.is_null(), right.is_null()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => compare_values(left, right)
			.unwrap_or_else(|| left.to_text().cmp(&right.to_text())),
	}
}

/// Key identifying a value for `DISTINCT` and grouping.
pub(crate) fn distinct_key(value: &Value) -> String {
	if value.is_numeric()
		&& let Some(i) = value.as_i64()
	{
		return i.to_string();
	}
	value.to_sql_literal()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
	/// `%`
	Any,
	/// `_`
	One,
	Literal(char),
}

/// Split a pattern into tokens; the escape character makes the next one
/// literal.
fn tokenize(pattern: &str) -> Vec<Token> {
	let mut tokens = Vec::with_capacity(pattern.len());
	let mut chars = pattern.chars();
	while let Some(c) = chars.next() {
		tokens.push(match c {
			LIKE_ESCAPE => Token::Literal(chars.next().unwrap_or(LIKE_ESCAPE)),
			'%' => Token::Any,
			'_' => Token::One,
			other => Token::Literal(other),
		});
	}
	tokens
}

/// SQL `LIKE` with `%` and `_` wildcards and [`LIKE_ESCAPE`], case-sensitive.
pub(crate) fn like_matches(text: &str, pattern: &str) -> bool {
	let text: Vec<char> = text.chars().collect();
	let pattern = tokenize(pattern);
	let (mut t, mut p) = (0, 0);
	let mut backtrack: Option<(usize, usize)> = None;
	while t < text.len() {
		match pattern.get(p) {
			Some(Token::One) => {
				t += 1;
				p += 1;
			}
			Some(Token::Literal(c)) if *c == text[t] => {
				t += 1;
				p += 1;
			}
			Some(Token::Any) => {
				backtrack = Some((p, t));
				p += 1;
			}
			_ => match backtrack {
				Some((star, matched)) => {
					p = star + 1;
					t = matched + 1;
					backtrack = Some((star, matched + 1));
				}
				None => return false,
			},
		}
	}
	pattern[p..].iter().all(|token| *token == Token::Any)
}
