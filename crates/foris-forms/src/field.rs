//! Form fields

use crate::data::is_empty_value;
use crate::preprocessors::Preprocessor;
use crate::validators::Validator;
use foris_backend::{BackendError, UciPath};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Error produced by a failing validator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("{0}")]
	Required(String),
	#[error("{0}")]
	Validation(String),
}

impl FieldError {
	/// Message shown next to the field
	pub fn note(&self) -> &str {
		match self {
			Self::Required(msg) | Self::Validation(msg) => msg,
		}
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Kind of input a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	Text,
	Password,
	Number,
	Email,
	Time,
	Checkbox,
	Dropdown,
	Radio,
	Hidden,
	File,
	MultiCheckbox,
	HorizontalRule,
}

impl FieldKind {
	pub const ALL: [FieldKind; 12] = [
		Self::Text,
		Self::Password,
		Self::Number,
		Self::Email,
		Self::Time,
		Self::Checkbox,
		Self::Dropdown,
		Self::Radio,
		Self::Hidden,
		Self::File,
		Self::MultiCheckbox,
		Self::HorizontalRule,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Password => "password",
			Self::Number => "number",
			Self::Email => "email",
			Self::Time => "time",
			Self::Checkbox => "checkbox",
			Self::Dropdown => "dropdown",
			Self::Radio => "radio",
			Self::Hidden => "hidden",
			Self::File => "file",
			Self::MultiCheckbox => "multi_checkbox",
			Self::HorizontalRule => "hr",
		}
	}

	/// Whether the kind carries a value at all
	pub fn has_value(&self) -> bool {
		!matches!(self, Self::HorizontalRule)
	}

	/// Whether the kind always submits a list
	pub fn is_multi(&self) -> bool {
		matches!(self, Self::MultiCheckbox)
	}

	/// Whether the kind offers a fixed set of choices
	pub fn has_choices(&self) -> bool {
		matches!(self, Self::Dropdown | Self::Radio | Self::MultiCheckbox)
	}
}

impl fmt::Display for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned for a field kind name that does not exist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field kind: {0}")]
pub struct UnknownFieldKind(pub String);

impl FromStr for FieldKind {
	type Err = UnknownFieldKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| UnknownFieldKind(s.to_string()))
	}
}

/// An option of a dropdown, radio or multi-checkbox field
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
	pub value: String,
	pub label: String,
}

impl Choice {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// Constraint on another field's value that makes a field active
#[derive(Clone)]
pub enum Requirement {
	/// The other field has a value
	Present,
	/// The other field has exactly this value
	Equals(Value),
	/// The other field's value satisfies a predicate
	Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Requirement {
	/// Checks the requirement against the other field's merged value
	///
	/// A missing or `null` value never satisfies a requirement.
	///
	/// # Examples
	///
	/// ```
	/// use foris_forms::Requirement;
	/// use serde_json::json;
	///
	/// let static_proto = Requirement::Equals(json!("static"));
	/// assert!(static_proto.is_met(Some(&json!("static"))));
	/// assert!(!static_proto.is_met(Some(&json!("dhcp"))));
	/// assert!(!Requirement::Present.is_met(None));
	/// ```
	pub fn is_met(&self, value: Option<&Value>) -> bool {
		let Some(value) = value.filter(|v| !v.is_null()) else {
			return false;
		};
		match self {
			Self::Present => true,
			Self::Equals(expected) => expected == value,
			Self::Predicate(predicate) => predicate(value),
		}
	}
}

impl fmt::Debug for Requirement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Present => f.write_str("Present"),
			Self::Equals(value) => f.debug_tuple("Equals").field(value).finish(),
			Self::Predicate(_) => f.write_str("Predicate(..)"),
		}
	}
}

/// Where a field reads its current value from
#[derive(Debug, Clone)]
pub struct BackendSource {
	pub path: UciPath,
	pub preprocessor: Preprocessor,
}

/// A named input of a form
///
/// # Examples
///
/// ```
/// use foris_forms::{Field, FieldKind};
/// use foris_forms::validators::IPv4;
///
/// let field = Field::new("gateway", FieldKind::Text)
/// 	.with_label("IPv4 gateway")
/// 	.required()
/// 	.with_validator(IPv4::new())
/// 	.requires_value("proto", "static");
///
/// assert_eq!(field.name(), "gateway");
/// assert!(field.is_required());
/// assert_eq!(field.requirements().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Field {
	name: String,
	kind: FieldKind,
	label: String,
	required: bool,
	default: Option<Value>,
	validators: Vec<Arc<dyn Validator>>,
	hint: Option<String>,
	requirements: Vec<(String, Requirement)>,
	backend: Option<BackendSource>,
	choices: Vec<Choice>,
	multifield: bool,
}

impl Field {
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
			label: String::new(),
			required: false,
			default: None,
			validators: Vec::new(),
			hint: None,
			requirements: Vec::new(),
			backend: None,
			choices: Vec::new(),
			multifield: kind.is_multi(),
		}
	}

	/// Creates a field from the name of its kind
	///
	/// Used by plugins describing their forms declaratively.
	///
	/// # Examples
	///
	/// ```
	/// use foris_forms::{Field, FieldKind};
	///
	/// assert_eq!(Field::from_kind_name("port", "number").unwrap().kind(), FieldKind::Number);
	/// assert!(Field::from_kind_name("port", "slider").is_err());
	/// ```
	pub fn from_kind_name(name: impl Into<String>, kind: &str) -> Result<Self, UnknownFieldKind> {
		Ok(Self::new(name, kind.parse()?))
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_default(mut self, default: impl Into<Value>) -> Self {
		self.default = Some(default.into());
		self
	}

	pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
		self.validators.push(Arc::new(validator));
		self
	}

	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = Some(hint.into());
		self
	}

	/// Activates the field only when `field` has a value
	pub fn requires(self, field: impl Into<String>) -> Self {
		self.with_requirement(field, Requirement::Present)
	}

	/// Activates the field only when `field` equals `value`
	pub fn requires_value(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.with_requirement(field, Requirement::Equals(value.into()))
	}

	/// Activates the field only when `predicate` accepts the value of `field`
	pub fn requires_when<F>(self, field: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
	{
		self.with_requirement(field, Requirement::Predicate(Arc::new(predicate)))
	}

	/// Adds a requirement, replacing an earlier one on the same field
	pub fn with_requirement(mut self, field: impl Into<String>, requirement: Requirement) -> Self {
		let field = field.into();
		match self.requirements.iter_mut().find(|(name, _)| *name == field) {
			Some(existing) => existing.1 = requirement,
			None => self.requirements.push((field, requirement)),
		}
		self
	}

	/// Reads the initial value from the backend at `path`
	pub fn with_backend(mut self, path: &str) -> Result<Self, BackendError> {
		self.backend = Some(BackendSource {
			path: path.parse()?,
			preprocessor: Preprocessor::Identity,
		});
		Ok(self)
	}

	/// Converts the backend value before use; has no effect without a backend path
	pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
		if let Some(source) = self.backend.as_mut() {
			source.preprocessor = preprocessor;
		}
		self
	}

	pub fn with_choices<I, V, L>(mut self, choices: I) -> Self
	where
		I: IntoIterator<Item = (V, L)>,
		V: Into<String>,
		L: Into<String>,
	{
		self.choices = choices
			.into_iter()
			.map(|(value, label)| Choice::new(value, label))
			.collect();
		self
	}

	/// Accepts a list of values
	pub fn multi(mut self) -> Self {
		self.multifield = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn is_required(&self) -> bool {
		self.required
	}

	pub fn hint(&self) -> Option<&str> {
		self.hint.as_deref()
	}

	pub fn validators(&self) -> &[Arc<dyn Validator>] {
		&self.validators
	}

	pub fn requirements(&self) -> &[(String, Requirement)] {
		&self.requirements
	}

	pub fn backend_source(&self) -> Option<&BackendSource> {
		self.backend.as_ref()
	}

	pub fn choices(&self) -> &[Choice] {
		&self.choices
	}

	pub fn is_multifield(&self) -> bool {
		self.multifield
	}

	/// Declared default, or `null` (`[]` for multi-value fields)
	pub fn default_value(&self) -> Value {
		match &self.default {
			Some(value) => value.clone(),
			None if self.multifield => Value::Array(Vec::new()),
			None => Value::Null,
		}
	}

	/// Whether every requirement holds against `data`
	pub fn has_requirements(&self, data: &crate::data::FormData) -> bool {
		self.requirements
			.iter()
			.all(|(field, requirement)| requirement.is_met(data.get(field)))
	}

	/// Whether the value should skip validators
	pub(crate) fn skips_validation(&self, value: &Value) -> bool {
		!self.required && is_empty_value(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::FormData;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_kind_names_round_trip() {
		for kind in FieldKind::ALL {
			assert_eq!(kind.as_str().parse::<FieldKind>().unwrap(), kind);
		}
	}

	#[rstest]
	#[case("textarea")]
	#[case("Text")]
	#[case("")]
	fn test_unknown_kind_name(#[case] name: &str) {
		// Act
		let result = name.parse::<FieldKind>();

		// Assert
		assert_eq!(result, Err(UnknownFieldKind(name.to_string())));
	}

	#[rstest]
	fn test_default_value_for_multifield() {
		// Arrange
		let plain = Field::new("dns", FieldKind::Text);
		let multi = Field::new("dns", FieldKind::Text).multi();
		let checks = Field::new("lists", FieldKind::MultiCheckbox);

		// Assert
		assert_eq!(plain.default_value(), Value::Null);
		assert_eq!(multi.default_value(), json!([]));
		assert_eq!(checks.default_value(), json!([]));
	}

	#[rstest]
	fn test_requirement_replaced_on_same_field() {
		// Act
		let field = Field::new("gateway", FieldKind::Text)
			.requires("proto")
			.requires_value("proto", "static");

		// Assert
		assert_eq!(field.requirements().len(), 1);
		assert!(matches!(field.requirements()[0].1, Requirement::Equals(_)));
	}

	#[rstest]
	fn test_has_requirements_with_predicate() {
		// Arrange
		let field = Field::new("ip6addr", FieldKind::Text)
			.requires_when("wan6_proto", |v| v.as_str() == Some("static"));
		let mut data = FormData::new();

		// Act & Assert
		assert!(!field.has_requirements(&data));
		data.insert("wan6_proto".to_string(), json!("dhcpv6"));
		assert!(!field.has_requirements(&data));
		data.insert("wan6_proto".to_string(), json!("static"));
		assert!(field.has_requirements(&data));
	}

	#[rstest]
	fn test_invalid_backend_path_rejected() {
		// Act
		let result = Field::new("proto", FieldKind::Dropdown).with_backend("network");

		// Assert
		assert!(matches!(result, Err(BackendError::InvalidPath(_))));
	}

	#[rstest]
	fn test_preprocessor_without_backend_is_ignored() {
		// Act
		let field = Field::new("dhcp_enabled", FieldKind::Checkbox)
			.with_preprocessor(Preprocessor::InvertedBool);

		// Assert
		assert!(field.backend_source().is_none());
	}
}
