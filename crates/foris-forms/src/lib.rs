//! # Foris Forms
//!
//! Declarative forms for router configuration pages.
//!
//! A form is a tree of [`Section`]s holding [`Field`]s. Its effective data is
//! the layered merge of field defaults, values read from the configuration
//! backend and submitted values, restricted to the fields whose `requires`
//! constraints hold. Valid forms run their save callbacks, which either
//! report results back to the page or queue configuration changes that are
//! committed together.
//!
//! ## Example
//!
//! ```
//! use foris_forms::{CallbackOutcome, Field, FieldKind, ForisForm, Section, SubmittedData};
//! use serde_json::json;
//!
//! let submitted = SubmittedData::from_pairs([("wifi_enabled", "0")]);
//! let mut form = ForisForm::new("wifi", submitted);
//!
//! let mut section = Section::new("wifi", "Wireless network");
//! section.add_field(
//! 	Field::new("wifi_enabled", FieldKind::Checkbox)
//! 		.with_label("Enable WiFi")
//! 		.with_default(true),
//! );
//! section.add_field(
//! 	Field::new("ssid", FieldKind::Text)
//! 		.with_label("SSID")
//! 		.required()
//! 		.requires_value("wifi_enabled", true),
//! );
//! form.add_section(section).unwrap();
//!
//! form.add_callback(|data| {
//! 	assert_eq!(data.get("wifi_enabled"), Some(&json!(false)));
//! 	assert!(!data.contains_key("ssid"));
//! 	Ok(CallbackOutcome::None)
//! });
//!
//! assert!(form.save(Vec::new()).unwrap());
//! ```

pub mod bound_field;
pub mod data;
pub mod field;
pub mod form;
pub mod preprocessors;
pub mod section;
pub mod validators;

pub use bound_field::{BoundField, ChoiceView, FieldView, FormView, SectionView};
pub use data::{FormData, SubmittedData, checkbox_value, is_empty_value, truthy};
pub use field::{
	BackendSource, Choice, Field, FieldError, FieldKind, FieldResult, Requirement, UnknownFieldKind,
};
pub use form::{
	ALL_FIELDS_KEY, BackendSnapshot, Callback, CallbackOutcome, ForisForm, FormError, FormResult,
	ID_PREFIX,
};
pub use preprocessors::Preprocessor;
pub use section::{Element, Section};
pub use validators::{ClientRule, FormValidator, Validator};
