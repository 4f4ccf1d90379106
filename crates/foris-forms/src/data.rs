//! Submitted and effective form data

use indexmap::IndexMap;
use serde_json::Value;

/// Field name to value mapping, in field declaration order
pub type FormData = IndexMap<String, Value>;

const MULTI_SUFFIX: &str = "[]";
const TEXTAREA_SEPARATOR: &str = "\r\n";

/// Raw values submitted with a request
///
/// Keys posted with a `[]` suffix are multi-value fields: their values are
/// collected into a list stored under the stripped key. A textarea posts all
/// its lines as one value separated by `\r\n`, which is split into a list.
/// The markup posts an empty dummy value ahead of the real ones so an empty
/// selection still arrives; it is dropped.
///
/// Plain keys posted several times keep the last value. A checked checkbox
/// posts its hidden `0` first and then its own value.
///
/// # Examples
///
/// ```
/// use foris_forms::SubmittedData;
/// use serde_json::json;
///
/// let data = SubmittedData::from_pairs([
/// 	("proto", "dhcp"),
/// 	("dns[]", ""),
/// 	("dns[]", "1.1.1.1"),
/// 	("dns[]", "8.8.8.8"),
/// 	("notes[]", "first\r\nsecond"),
/// ]);
///
/// assert_eq!(data.get("proto"), Some(&json!("dhcp")));
/// assert_eq!(data.get("dns"), Some(&json!(["1.1.1.1", "8.8.8.8"])));
/// assert_eq!(data.get("notes"), Some(&json!(["first", "second"])));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmittedData {
	values: IndexMap<String, Value>,
}

impl SubmittedData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds submitted data from decoded `(key, value)` pairs in posting order
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut plain: IndexMap<String, String> = IndexMap::new();
		let mut multi: IndexMap<String, Vec<String>> = IndexMap::new();

		for (key, value) in pairs {
			let key = key.as_ref();
			match key.strip_suffix(MULTI_SUFFIX) {
				Some(stripped) => multi.entry(stripped.to_string()).or_default().push(value.into()),
				None => {
					plain.insert(key.to_string(), value.into());
				}
			}
		}

		let mut values = IndexMap::new();
		for (key, value) in plain {
			values.insert(key, Value::String(value));
		}
		for (key, items) in multi {
			values.insert(key, Value::Array(split_multi(items)));
		}

		Self { values }
	}

	/// Builds submitted data from a JSON object, as posted by AJAX actions
	///
	/// Anything other than an object yields empty data.
	pub fn from_json(value: Value) -> Self {
		match value {
			Value::Object(map) => Self {
				values: map.into_iter().collect(),
			},
			_ => Self::default(),
		}
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// String value of `key`, `None` when absent or not a string
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.values.get(key).and_then(Value::as_str)
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.values.insert(key.into(), value.into());
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.values.iter()
	}
}

fn split_multi(mut items: Vec<String>) -> Vec<Value> {
	if let Some(position) = items.iter().position(|v| v.contains(TEXTAREA_SEPARATOR)) {
		let text = items.swap_remove(position);
		return text
			.split(TEXTAREA_SEPARATOR)
			.map(|s| Value::String(s.to_string()))
			.collect();
	}
	if items.first().is_some_and(|first| first.is_empty()) {
		items.remove(0);
	}
	items.into_iter().map(Value::String).collect()
}

impl<K: Into<String>> FromIterator<(K, Value)> for SubmittedData {
	fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
		Self {
			values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
		}
	}
}

/// Truthiness of a JSON value
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are false, everything else is true.
pub fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}

/// Coerces a checkbox value to a boolean
///
/// Unchecked checkboxes post `"0"`. Other values follow [`truthy`], so the
/// string `"false"` is checked.
///
/// # Examples
///
/// ```
/// use foris_forms::checkbox_value;
/// use serde_json::json;
///
/// assert!(!checkbox_value(&json!("0")));
/// assert!(checkbox_value(&json!("1")));
/// assert!(checkbox_value(&json!("false")));
/// assert!(!checkbox_value(&json!("")));
/// ```
pub fn checkbox_value(value: &Value) -> bool {
	match value {
		Value::String(s) if s == "0" => false,
		other => truthy(other),
	}
}

/// Whether a value counts as "not filled in"
pub fn is_empty_value(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.is_empty(),
		Value::Array(items) => items.is_empty(),
		_ => false,
	}
}
