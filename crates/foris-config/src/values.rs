//! Reading effective form data inside save callbacks
//!
//! Values arrive as submitted strings or as typed values produced by backend
//! preprocessors, so both shapes are accepted.

use foris_forms::{FormData, FormError, FormResult};
use serde_json::Value;

/// Text of a field, `None` when absent or empty
pub(crate) fn text(data: &FormData, field: &str) -> Option<String> {
	match data.get(field)? {
		Value::String(s) if s.is_empty() => None,
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
		_ => None,
	}
}

/// Text of a field that must have been filled in
pub(crate) fn required_text(data: &FormData, field: &str) -> FormResult<String> {
	text(data, field).ok_or_else(|| FormError::malformed(field, "missing value"))
}

/// Whether a checkbox is ticked
pub(crate) fn flag(data: &FormData, field: &str) -> bool {
	matches!(data.get(field), Some(Value::Bool(true)))
}

/// Integer value of a field
pub(crate) fn integer(data: &FormData, field: &str) -> FormResult<i64> {
	let value = required_text(data, field)?;
	value
		.trim()
		.parse()
		.map_err(|_| FormError::malformed(field, format!("`{value}` is not a number")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn data(value: Value) -> FormData {
		let mut data = FormData::new();
		data.insert("field".to_string(), value);
		data
	}

	#[rstest]
	#[case(json!("eth0"), Some("eth0"))]
	#[case(json!(""), None)]
	#[case(json!(100), Some("100"))]
	#[case(json!(null), None)]
	fn test_text(#[case] value: Value, #[case] expected: Option<&str>) {
		// Act & Assert
		assert_eq!(text(&data(value), "field").as_deref(), expected);
	}

	#[rstest]
	fn test_integer_reports_malformed_value() {
		// Act
		let result = integer(&data(json!("ten")), "field");

		// Assert
		assert!(matches!(result, Err(FormError::Malformed { field, .. }) if field == "field"));
	}

	#[rstest]
	fn test_integer_accepts_numbers_and_strings() {
		// Act & Assert
		assert_eq!(integer(&data(json!(150)), "field").unwrap(), 150);
		assert_eq!(integer(&data(json!(" 100 ")), "field").unwrap(), 100);
	}
}
