//! Conversions of backend values into field values

use foris_backend::parse_uci_bool;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Conversion applied to a value read from the backend
///
/// A conversion that cannot interpret its input yields `None`, and the field
/// falls back to its default.
#[derive(Clone, Default)]
pub enum Preprocessor {
	/// Use the value as stored
	#[default]
	Identity,
	/// UCI boolean (`"1"`, `"yes"`, `"on"`, ...)
	Bool,
	/// Negated UCI boolean, for options such as `dhcp.lan.ignore`
	InvertedBool,
	/// Integer stored as a string
	Integer,
	/// Item at an index of a list, or of a space separated string
	ListItem(usize),
	/// Space separated string as a list
	Split,
	Custom(Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>),
}

impl Preprocessor {
	/// Wraps a custom conversion
	pub fn custom<F>(f: F) -> Self
	where
		F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
	{
		Self::Custom(Arc::new(f))
	}

	/// Applies the conversion
	///
	/// # Examples
	///
	/// ```
	/// use foris_forms::Preprocessor;
	/// use serde_json::json;
	///
	/// assert_eq!(Preprocessor::InvertedBool.apply(&json!("1")), Some(json!(false)));
	/// assert_eq!(Preprocessor::Integer.apply(&json!("100")), Some(json!(100)));
	/// assert_eq!(Preprocessor::ListItem(1).apply(&json!("1.1.1.1 8.8.8.8")), Some(json!("8.8.8.8")));
	/// assert_eq!(Preprocessor::Integer.apply(&json!("many")), None);
	/// ```
	pub fn apply(&self, value: &Value) -> Option<Value> {
		match self {
			Self::Identity => Some(value.clone()),
			Self::Bool => parse_uci_bool(value).map(Value::Bool),
			Self::InvertedBool => parse_uci_bool(value).map(|b| Value::Bool(!b)),
			Self::Integer => match value {
				Value::Number(n) => n.as_i64().map(Value::from),
				Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
				_ => None,
			},
			Self::ListItem(index) => list_items(value)?.into_iter().nth(*index),
			Self::Split => list_items(value).map(Value::Array),
			Self::Custom(f) => f(value),
		}
	}
}

fn list_items(value: &Value) -> Option<Vec<Value>> {
	match value {
		Value::Array(items) => Some(items.clone()),
		Value::String(s) => Some(
			s.split_whitespace()
				.map(|item| Value::String(item.to_string()))
				.collect(),
		),
		_ => None,
	}
}

impl fmt::Debug for Preprocessor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Identity => f.write_str("Identity"),
			Self::Bool => f.write_str("Bool"),
			Self::InvertedBool => f.write_str("InvertedBool"),
			Self::Integer => f.write_str("Integer"),
			Self::ListItem(index) => f.debug_tuple("ListItem").field(index).finish(),
			Self::Split => f.write_str("Split"),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(Preprocessor::Bool, json!("on"), Some(json!(true)))]
	#[case(Preprocessor::Bool, json!("garbage"), None)]
	#[case(Preprocessor::InvertedBool, json!("0"), Some(json!(true)))]
	#[case(Preprocessor::Integer, json!(" 42 "), Some(json!(42)))]
	#[case(Preprocessor::Integer, json!(7), Some(json!(7)))]
	#[case(Preprocessor::ListItem(0), json!(["a", "b"]), Some(json!("a")))]
	#[case(Preprocessor::ListItem(2), json!("a b"), None)]
	#[case(Preprocessor::Split, json!("a  b"), Some(json!(["a", "b"])))]
	#[case(Preprocessor::Identity, json!({"x": 1}), Some(json!({"x": 1})))]
	fn test_apply(#[case] preprocessor: Preprocessor, #[case] input: Value, #[case] expected: Option<Value>) {
		assert_eq!(preprocessor.apply(&input), expected);
	}

	#[rstest]
	fn test_custom_conversion() {
		// Arrange
		let upper = Preprocessor::custom(|v| v.as_str().map(|s| Value::String(s.to_uppercase())));

		// Act & Assert
		assert_eq!(upper.apply(&json!("cz")), Some(json!("CZ")));
		assert_eq!(upper.apply(&json!(1)), None);
	}
}
