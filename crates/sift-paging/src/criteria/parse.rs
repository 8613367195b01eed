//! Parsing of loosely typed criteria input.

use sift_query::Value;

use super::{Criterion, NumericOp};
use crate::error::{PageError, Result};
use crate::metadata::{EnumType, FieldType};

const PREFIXES: [(&str, NumericOp); 5] = [
	(">=", NumericOp::Gte),
	("<=", NumericOp::Lte),
	(">", NumericOp::Gt),
	("<", NumericOp::Lt),
	("=", NumericOp::Eq),
];

pub(super) fn numeric(value: &Value, field_type: &FieldType) -> Result<Criterion> {
	if value.is_numeric() {
		return Criterion::numeric(NumericOp::Eq, field_type.coerce_number(value)?);
	}
	let text = value
		.as_str()
		.ok_or_else(|| not_parsable(value, field_type))?
		.trim();

	if let Some((low, high)) = text.split_once("..") {
		return Criterion::between(field_type.parse_number(low)?, field_type.parse_number(high)?);
	}
	let (op, rest) = PREFIXES
		.iter()
		.find_map(|(prefix, op)| text.strip_prefix(prefix).map(|rest| (*op, rest)))
		.unwrap_or((NumericOp::Eq, text));
	Criterion::numeric(op, field_type.parse_number(rest)?)
}

pub(super) fn boolean(value: &Value) -> Result<Criterion> {
	if let Some(flag) = value.as_bool() {
		return Ok(Criterion::Bool(flag));
	}
	match value.as_i64() {
		Some(0) => return Ok(Criterion::Bool(false)),
		Some(1) => return Ok(Criterion::Bool(true)),
		_ => {}
	}
	match value.as_str().map(str::trim) {
		Some(text) if text.eq_ignore_ascii_case("true") || text == "1" => Ok(Criterion::Bool(true)),
		Some(text) if text.eq_ignore_ascii_case("false") || text == "0" => {
			Ok(Criterion::Bool(false))
		}
		_ => Err(not_parsable(value, &FieldType::Bool)),
	}
}

pub(super) fn enumerated(value: &Value, enum_type: &EnumType) -> Result<Criterion> {
	let in_range = |ordinal: usize| ordinal < enum_type.constants().len();
	let ordinal = match value {
		Value::String(Some(text)) => enum_type.position(text.trim()).or_else(|| {
			text.trim()
				.parse::<usize>()
				.ok()
				.filter(|ordinal| in_range(*ordinal))
		}),
		other => other
			.as_i64()
			.and_then(|v| usize::try_from(v).ok())
			.filter(|ordinal| in_range(*ordinal)),
	};
	let field_type = FieldType::Enum(enum_type.clone());
	let ordinal = ordinal.ok_or_else(|| not_parsable(value, &field_type))?;
	let stored = enum_type
		.stored_value(ordinal)
		.ok_or_else(|| not_parsable(value, &field_type))?;
	Ok(Criterion::Enumerated {
		name: enum_type.constants()[ordinal].clone(),
		ordinal,
		stored,
	})
}

fn not_parsable(value: &Value, field_type: &FieldType) -> PageError {
	PageError::invalid_argument(
		"value",
		format!("{} is not a valid {field_type}", value.to_sql_literal()),
	)
}
