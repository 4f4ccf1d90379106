//! Fields bound to form data, and the render-ready view of a form
//!
//! Markup is produced outside this crate. What a template needs for each
//! active field is derivable here: kind, current value, validation note,
//! escaped label, HTML id and the attributes of client side validation.

use crate::field::{Choice, Field, FieldKind};
use crate::validators::{ClientRule, NotEmpty, Validator};
use serde::Serialize;
use serde_json::Value;

/// A field paired with its current value and validation note
#[derive(Debug, Clone)]
pub struct BoundField<'a> {
	field: &'a Field,
	value: Option<&'a Value>,
	note: Option<&'a str>,
	has_dependents: bool,
}

impl<'a> BoundField<'a> {
	pub fn new(
		field: &'a Field,
		value: Option<&'a Value>,
		note: Option<&'a str>,
		has_dependents: bool,
	) -> Self {
		Self {
			field,
			value,
			note,
			has_dependents,
		}
	}

	pub fn field(&self) -> &'a Field {
		self.field
	}

	pub fn name(&self) -> &str {
		self.field.name()
	}

	pub fn kind(&self) -> FieldKind {
		self.field.kind()
	}

	/// Name attribute; multi-value fields carry a `[]` suffix
	///
	/// # Examples
	///
	/// ```
	/// use foris_forms::{BoundField, Field, FieldKind};
	///
	/// let dns = Field::new("dns", FieldKind::Text).multi();
	/// assert_eq!(BoundField::new(&dns, None, None, false).html_name(), "dns[]");
	/// ```
	pub fn html_name(&self) -> String {
		if self.field.is_multifield() {
			format!("{}[]", self.field.name())
		} else {
			self.field.name().to_string()
		}
	}

	pub fn html_id(&self) -> String {
		format!("{}{}", crate::form::ID_PREFIX, self.field.name())
	}

	/// Label with HTML special characters escaped
	///
	/// # Examples
	///
	/// ```
	/// use foris_forms::{BoundField, Field, FieldKind};
	///
	/// let field = Field::new("ssid", FieldKind::Text).with_label("SSID <2.4 GHz>");
	/// assert_eq!(BoundField::new(&field, None, None, false).label(), "SSID &lt;2.4 GHz&gt;");
	/// ```
	pub fn label(&self) -> String {
		html_escape::encode_text(self.field.label()).into_owned()
	}

	/// Current value, `null` when the field has none
	pub fn value(&self) -> Value {
		self.value.cloned().unwrap_or(Value::Null)
	}

	pub fn note(&self) -> Option<&'a str> {
		self.note
	}

	/// Whether other fields depend on this one
	pub fn has_dependents(&self) -> bool {
		self.has_dependents
	}

	pub fn classes(&self) -> Vec<&'static str> {
		let mut classes = Vec::new();
		if self.has_dependents {
			classes.push("has-requirements");
		}
		if self.note.is_some() {
			classes.push("field-validation-fail");
		}
		classes
	}

	/// Client side validation rules of the field's validators
	pub fn client_rules(&self) -> Vec<ClientRule> {
		let required = self
			.field
			.is_required()
			.then(|| NotEmpty::new().client_rule())
			.flatten();
		required
			.into_iter()
			.chain(self.field.validators().iter().filter_map(|v| v.client_rule()))
			.collect()
	}

	/// Deterministic `(kind, value, note, escaped label)` tuple
	pub fn render_tuple(&self) -> (FieldKind, Value, Option<String>, String) {
		(
			self.kind(),
			self.value(),
			self.note.map(str::to_string),
			self.label(),
		)
	}

	/// Owned, serializable form for templates
	pub fn to_view(&self) -> FieldView {
		FieldView {
			name: self.html_name(),
			id: self.html_id(),
			kind: self.kind().as_str(),
			label: self.label(),
			value: self.value(),
			note: self.note.map(str::to_string),
			hint: self.field.hint().map(|h| html_escape::encode_text(h).into_owned()),
			required: self.field.is_required(),
			classes: self.classes(),
			attributes: self
				.client_rules()
				.into_iter()
				.map(|rule| (rule.attribute(), rule.value))
				.collect(),
			choices: self
				.field
				.choices()
				.iter()
				.map(|Choice { value, label }| ChoiceView {
					value: value.clone(),
					label: html_escape::encode_text(label).into_owned(),
				})
				.collect(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceView {
	pub value: String,
	pub label: String,
}

/// Render-ready field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
	pub name: String,
	pub id: String,
	pub kind: &'static str,
	pub label: String,
	pub value: Value,
	pub note: Option<String>,
	pub hint: Option<String>,
	pub required: bool,
	pub classes: Vec<&'static str>,
	pub attributes: Vec<(String, String)>,
	pub choices: Vec<ChoiceView>,
}

/// Render-ready section with its active fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
	pub name: String,
	pub title: String,
	pub description: Option<String>,
	pub fields: Vec<FieldView>,
	pub sections: Vec<SectionView>,
}

/// Render-ready form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
	pub name: String,
	pub errors: Vec<String>,
	pub sections: Vec<SectionView>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::validators::{IPv4, InRange};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_classes_reflect_dependents_and_errors() {
		// Arrange
		let field = Field::new("wifi_enabled", FieldKind::Checkbox);
		let value = json!(true);

		// Act
		let plain = BoundField::new(&field, Some(&value), None, false);
		let failing = BoundField::new(&field, Some(&value), Some("bad"), true);

		// Assert
		assert!(plain.classes().is_empty());
		assert_eq!(failing.classes(), ["has-requirements", "field-validation-fail"]);
	}

	#[rstest]
	fn test_client_rules_start_with_required() {
		// Arrange
		let field = Field::new("port", FieldKind::Number)
			.required()
			.with_validator(InRange::new(1, 65535));

		// Act
		let rules = BoundField::new(&field, None, None, false).client_rules();

		// Assert
		assert_eq!(
			rules,
			[
				ClientRule::new("notblank", "true"),
				ClientRule::new("range", "[1,65535]"),
			]
		);
	}

	#[rstest]
	fn test_render_tuple_is_deterministic() {
		// Arrange
		let field = Field::new("gateway", FieldKind::Text)
			.with_label("Gateway & router")
			.with_validator(IPv4::new());
		let value = json!("10.0.0");
		let bound = BoundField::new(&field, Some(&value), Some("Not a valid IPv4 address."), false);

		// Act
		let first = bound.render_tuple();
		let second = bound.render_tuple();

		// Assert
		assert_eq!(first, second);
		assert_eq!(
			first,
			(
				FieldKind::Text,
				json!("10.0.0"),
				Some("Not a valid IPv4 address.".to_string()),
				"Gateway &amp; router".to_string(),
			)
		);
	}

	#[rstest]
	fn test_view_attributes_are_prefixed() {
		// Arrange
		let field = Field::new("lan_ipaddr", FieldKind::Text).with_validator(IPv4::new());

		// Act
		let view = BoundField::new(&field, None, None, false).to_view();

		// Assert
		assert_eq!(view.id, "field-lan_ipaddr");
		assert_eq!(
			view.attributes,
			[("data-parsley-extratype".to_string(), "ipv4".to_string())]
		);
		assert_eq!(view.value, Value::Null);
	}
}
