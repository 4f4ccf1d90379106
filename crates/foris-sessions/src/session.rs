//! Per-browser session data
//!
//! A session is a flat map of JSON values. Handlers read it at the start of
//! a request and the owning context writes it back once the request is done.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Session ID type
pub type SessionId = String;

/// Set after a successful login
pub const USER_AUTHENTICATED_KEY: &str = "user_authenticated";

/// Token every unsafe request must echo back
pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Language chosen by the user
pub const LANGUAGE_KEY: &str = "language";

/// Session data stored in the backend
///
/// # Examples
///
/// ```
/// use foris_sessions::Session;
/// use serde_json::json;
///
/// let mut session = Session::new();
/// session.set("allowed_step_max", json!(3));
/// assert_eq!(session.get_as::<u8>("allowed_step_max"), Some(3));
/// assert!(session.is_tainted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
	data: HashMap<String, Value>,
	#[serde(skip)]
	tainted: bool,
}

impl Session {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	/// Value deserialized into `T`, `None` when absent or of another shape
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		self.data
			.get(key)
			.and_then(|value| serde_json::from_value(value.clone()).ok())
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.data.get(key).and_then(Value::as_str)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.data.contains_key(key)
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.data.insert(key.into(), value.into());
		self.tainted = true;
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		let removed = self.data.remove(key);
		self.tainted |= removed.is_some();
		removed
	}

	pub fn clear(&mut self) {
		self.tainted |= !self.data.is_empty();
		self.data.clear();
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether the session changed since it was loaded
	pub fn is_tainted(&self) -> bool {
		self.tainted
	}

	pub(crate) fn mark_clean(&mut self) {
		self.tainted = false;
	}

	pub fn is_authenticated(&self) -> bool {
		self.get_as::<bool>(USER_AUTHENTICATED_KEY).unwrap_or(false)
	}

	pub fn set_authenticated(&mut self, authenticated: bool) {
		if authenticated {
			self.set(USER_AUTHENTICATED_KEY, true);
		} else {
			self.remove(USER_AUTHENTICATED_KEY);
		}
	}

	pub fn language(&self) -> Option<&str> {
		self.get_str(LANGUAGE_KEY)
	}

	pub fn set_language(&mut self, language: impl Into<String>) {
		self.set(LANGUAGE_KEY, language.into());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_loaded_session_is_clean() {
		// Arrange
		let session: Session = serde_json::from_value(json!({"data": {"language": "cs"}})).unwrap();

		// Act & Assert
		assert!(!session.is_tainted());
		assert_eq!(session.language(), Some("cs"));
	}

	#[rstest]
	fn test_remove_missing_key_keeps_session_clean() {
		// Arrange
		let mut session = Session::new();

		// Act
		let removed = session.remove("missing");

		// Assert
		assert_eq!(removed, None);
		assert!(!session.is_tainted());
	}

	#[rstest]
	#[case(json!(true), true)]
	#[case(json!(false), false)]
	#[case(json!("yes"), false)]
	fn test_is_authenticated(#[case] stored: Value, #[case] expected: bool) {
		// Arrange
		let mut session = Session::new();
		session.set(USER_AUTHENTICATED_KEY, stored);

		// Act & Assert
		assert_eq!(session.is_authenticated(), expected);
	}

	#[rstest]
	fn test_get_as_rejects_other_shapes() {
		// Arrange
		let mut session = Session::new();
		session.set("allowed_step_max", "three");

		// Act & Assert
		assert_eq!(session.get_as::<u8>("allowed_step_max"), None);
	}
}
