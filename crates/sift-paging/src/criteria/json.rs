//! Criteria values from JSON input.

use serde_json::Value as Json;
use sift_query::Value;

use super::{CriteriaValue, Criterion, NumericOp};
use crate::error::{PageError, Result};

pub(super) fn from_json(json: &Json) -> Result<CriteriaValue> {
	match json {
		Json::Null => Ok(CriteriaValue::Null),
		Json::Array(items) => Ok(CriteriaValue::List(
			items.iter().map(from_json).collect::<Result<_>>()?,
		)),
		Json::Object(object) => {
			let mut entries = object.iter();
			match (entries.next(), entries.next()) {
				(Some((key, argument)), None) => criterion(key, argument).map(CriteriaValue::from),
				_ => Err(PageError::invalid_argument(
					"criteria",
					format!("expected an object with exactly one key, got {json}"),
				)),
			}
		}
		scalar => Ok(CriteriaValue::Scalar(scalar_value(scalar)?)),
	}
}

fn criterion(key: &str, argument: &Json) -> Result<Criterion> {
	match key {
		"not" => Ok(Criterion::not(from_json(argument)?)),
		"like" | "contains" => Ok(Criterion::contains(text(key, argument)?)),
		"startsWith" => Ok(Criterion::starts_with(text(key, argument)?)),
		"endsWith" => Ok(Criterion::ends_with(text(key, argument)?)),
		"ignoreCase" => Ok(Criterion::ignore_case(text(key, argument)?)),
		"between" => match argument.as_array().map(Vec::as_slice) {
			Some([min, max]) => Criterion::between(scalar_value(min)?, scalar_value(max)?),
			_ => Err(PageError::invalid_argument(
				"between",
				format!("expected [min, max], got {argument}"),
			)),
		},
		"eq" => Criterion::numeric(NumericOp::Eq, scalar_value(argument)?),
		"lt" => Criterion::numeric(NumericOp::Lt, scalar_value(argument)?),
		"lte" => Criterion::numeric(NumericOp::Lte, scalar_value(argument)?),
		"gt" => Criterion::numeric(NumericOp::Gt, scalar_value(argument)?),
		"gte" => Criterion::numeric(NumericOp::Gte, scalar_value(argument)?),
		other => Err(PageError::invalid_argument(
			"criteria",
			format!("unknown criterion {other:?}"),
		)),
	}
}

fn scalar_value(json: &Json) -> Result<Value> {
	match json {
		Json::Null => Ok(Value::String(None)),
		Json::Bool(flag) => Ok(Value::from(*flag)),
		Json::Number(number) => number
			.as_i64()
			.map(Value::from)
			.or_else(|| number.as_f64().map(Value::from))
			.ok_or_else(|| {
				PageError::invalid_argument("value", format!("{number} is out of range"))
			}),
		Json::String(text) => Ok(Value::from(text.as_str())),
		other => Err(PageError::invalid_argument(
			"value",
			format!("expected a scalar, got {other}"),
		)),
	}
}

fn text(key: &str, argument: &Json) -> Result<String> {
	match argument {
		Json::String(text) => Ok(text.clone()),
		Json::Number(number) => Ok(number.to_string()),
		other => Err(PageError::invalid_argument(
			key,
			format!("expected text, got {other}"),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), CriteriaValue::Null)]
	#[case(json!("ACTIVE"), CriteriaValue::from("ACTIVE"))]
	#[case(json!(3), CriteriaValue::Scalar(Value::BigInt(Some(3))))]
	#[case(json!(true), CriteriaValue::from(true))]
	#[case(json!({"startsWith": "an"}), CriteriaValue::from(Criterion::starts_with("an")))]
	#[case(json!({"ignoreCase": "Bob"}), CriteriaValue::from(Criterion::ignore_case("Bob")))]
	fn test_from_json(#[case] input: Json, #[case] expected: CriteriaValue) {
		assert_eq!(from_json(&input).unwrap(), expected);
	}

	#[rstest]
	fn test_nested_not_and_list() {
		// Arrange
		let input = json!({"not": ["a", {"between": [1, 5]}]});

		// Act
		let value = from_json(&input).unwrap();

		// Assert
		assert_eq!(
			value,
			CriteriaValue::from(Criterion::not(CriteriaValue::List(vec![
				CriteriaValue::from("a"),
				CriteriaValue::from(Criterion::between(1i64, 5i64).unwrap()),
			])))
		);
	}

	#[rstest]
	#[case(json!({"gte": 2.5}), NumericOp::Gte, Value::Double(Some(2.5)))]
	#[case(json!({"lt": 10}), NumericOp::Lt, Value::BigInt(Some(10)))]
	fn test_numeric_keys(#[case] input: Json, #[case] op: NumericOp, #[case] bound: Value) {
		assert_eq!(
			from_json(&input).unwrap(),
			CriteriaValue::from(Criterion::Numeric { op, value: bound })
		);
	}

	#[rstest]
	#[case(json!({}))]
	#[case(json!({"a": 1, "b": 2}))]
	#[case(json!({"regex": ".*"}))]
	#[case(json!({"between": [1]}))]
	#[case(json!({"gt": "x"}))]
	fn test_rejects(#[case] input: Json) {
		assert!(matches!(
			from_json(&input),
			Err(PageError::InvalidArgument { .. })
		));
	}
}
