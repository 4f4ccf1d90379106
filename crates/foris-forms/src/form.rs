use crate::bound_field::{BoundField, FormView, SectionView};
use crate::data::{FormData, SubmittedData, checkbox_value};
use crate::field::{Field, FieldKind, FieldResult, UnknownFieldKind};
use crate::section::Section;
use crate::validators::{FormValidator, NotEmpty, Validator};
use foris_backend::{Backend, BackendError, Configurator, UciChange};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormError {
	#[error(transparent)]
	UnknownFieldKind(#[from] UnknownFieldKind),
	#[error("Field `{0}` is declared more than once")]
	DuplicateField(String),
	#[error("Save result `{0}` was reported by more than one callback")]
	DuplicateResult(String),
	#[error("Malformed value of `{field}`: {reason}")]
	Malformed { field: String, reason: String },
	#[error("Form `{0}` has no backend to write to")]
	NoBackend(String),
	#[error(transparent)]
	Backend(#[from] BackendError),
}

impl FormError {
	pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Malformed {
			field: field.into(),
			reason: reason.into(),
		}
	}
}

pub type FormResult<T> = Result<T, FormError>;

/// Key of form-wide errors in [`ForisForm::errors`]
pub const ALL_FIELDS_KEY: &str = "__all__";

/// Prefix of the HTML id of every field
pub const ID_PREFIX: &str = "field-";

/// What a save callback asks for
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
	/// Everything was handled by the callback itself
	None,
	/// Named results for the page, merged into [`ForisForm::callback_results`]
	SaveResult(IndexMap<String, Value>),
	/// Configuration changes, committed together after all callbacks ran
	EditConfig(Vec<UciChange>),
}

impl CallbackOutcome {
	/// Builds a [`CallbackOutcome::SaveResult`] from pairs
	pub fn save_result<I, K>(results: I) -> Self
	where
		I: IntoIterator<Item = (K, Value)>,
		K: Into<String>,
	{
		Self::SaveResult(results.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}
}

/// Save callback, called with the effective data of a valid form
pub type Callback = Box<dyn Fn(&FormData) -> FormResult<CallbackOutcome> + Send + Sync>;

/// Values read from the backend for fields declaring a backend path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendSnapshot {
	values: IndexMap<String, Value>,
}

impl BackendSnapshot {
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.values.get(field)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[derive(Debug)]
struct EffectiveData {
	merged: FormData,
	active: FormData,
}

/// Declarative form of a configuration page
///
/// Effective data is computed on first access and cached together with the
/// backend values it was built from; [`ForisForm::invalidate_data`] drops both.
pub struct ForisForm {
	name: String,
	submitted: SubmittedData,
	sections: Vec<Section>,
	requirement_map: IndexMap<String, Vec<String>>,
	callbacks: Vec<Callback>,
	validators: Vec<Box<dyn FormValidator>>,
	backend: Option<Arc<dyn Backend>>,
	backend_snapshot: OnceCell<BackendSnapshot>,
	data_cache: OnceCell<EffectiveData>,
	validated: bool,
	errors: IndexMap<String, String>,
	callback_results: IndexMap<String, Value>,
}

impl ForisForm {
	/// Creates a form for the given submitted data (empty on a GET request)
	pub fn new(name: impl Into<String>, submitted: SubmittedData) -> Self {
		Self {
			name: name.into(),
			submitted,
			sections: Vec::new(),
			requirement_map: IndexMap::new(),
			callbacks: Vec::new(),
			validators: Vec::new(),
			backend: None,
			backend_snapshot: OnceCell::new(),
			data_cache: OnceCell::new(),
			validated: false,
			errors: IndexMap::new(),
			callback_results: IndexMap::new(),
		}
	}

	/// Backend used to seed field values and to commit changes
	pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
		self.backend = Some(backend);
		self.invalidate_data();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn submitted(&self) -> &SubmittedData {
		&self.submitted
	}

	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	/// Adds a section, rejecting field names already used in the form
	///
	/// # Examples
	///
	/// ```
	/// use foris_forms::{Field, FieldKind, ForisForm, FormError, Section, SubmittedData};
	///
	/// let mut form = ForisForm::new("lan", SubmittedData::new());
	/// let mut first = Section::new("lan", "LAN");
	/// first.add_field(Field::new("lan_ipaddr", FieldKind::Text));
	/// form.add_section(first).unwrap();
	///
	/// let mut second = Section::new("more", "More");
	/// second.add_field(Field::new("lan_ipaddr", FieldKind::Text));
	/// assert!(matches!(form.add_section(second), Err(FormError::DuplicateField(_))));
	/// ```
	pub fn add_section(&mut self, section: Section) -> FormResult<()> {
		let mut seen: Vec<&str> = self.fields().map(Field::name).collect();
		for field in section.fields() {
			if seen.contains(&field.name()) {
				return Err(FormError::DuplicateField(field.name().to_string()));
			}
			seen.push(field.name());
		}

		for field in section.fields() {
			for (required, _) in field.requirements() {
				self.requirement_map
					.entry(required.clone())
					.or_default()
					.push(field.name().to_string());
			}
		}
		self.sections.push(section);
		self.invalidate_data();
		Ok(())
	}

	pub fn add_callback<F>(&mut self, callback: F)
	where
		F: Fn(&FormData) -> FormResult<CallbackOutcome> + Send + Sync + 'static,
	{
		self.callbacks.push(Box::new(callback));
	}

	/// Adds a validator checking relations between fields
	pub fn add_validator(&mut self, validator: impl FormValidator + 'static) {
		self.validators.push(Box::new(validator));
	}

	/// All fields, depth first in declaration order
	pub fn fields(&self) -> impl Iterator<Item = &Field> {
		self.sections.iter().flat_map(Section::fields)
	}

	pub fn field(&self, name: &str) -> Option<&Field> {
		self.fields().find(|f| f.name() == name)
	}

	/// Field name to the names of the fields requiring it
	pub fn requirement_map(&self) -> &IndexMap<String, Vec<String>> {
		&self.requirement_map
	}

	pub fn has_dependents(&self, field: &str) -> bool {
		self.requirement_map.contains_key(field)
	}

	/// Backend values, fetched once per form
	pub fn backend_snapshot(&self) -> FormResult<&BackendSnapshot> {
		self.backend_snapshot.get_or_try_init(|| self.fetch_snapshot())
	}

	fn fetch_snapshot(&self) -> FormResult<BackendSnapshot> {
		let sources: Vec<_> = self
			.fields()
			.filter_map(|field| field.backend_source().map(|source| (field.name(), source)))
			.collect();
		if sources.is_empty() {
			return Ok(BackendSnapshot::default());
		}
		let Some(backend) = self.backend.as_deref() else {
			tracing::debug!(form = %self.name, "No backend attached, skipping backend values");
			return Ok(BackendSnapshot::default());
		};

		let mut values = IndexMap::new();
		for (name, source) in sources {
			let Some(raw) = backend.fetch(&source.path)? else {
				continue;
			};
			match source.preprocessor.apply(&raw) {
				Some(value) => {
					values.insert(name.to_string(), value);
				}
				None => {
					tracing::warn!(
						form = %self.name,
						field = name,
						path = %source.path,
						"Backend value could not be converted, using default"
					);
				}
			}
		}
		Ok(BackendSnapshot { values })
	}

	fn effective(&self) -> FormResult<&EffectiveData> {
		self.data_cache.get_or_try_init(|| self.compute_effective())
	}

	fn compute_effective(&self) -> FormResult<EffectiveData> {
		let snapshot = self.backend_snapshot()?;
		let mut merged = FormData::new();
		for field in self.fields().filter(|f| f.kind().has_value()) {
			let mut value = match snapshot.get(field.name()) {
				Some(value) => value.clone(),
				None => field.default_value(),
			};
			if let Some(submitted) = self.submitted.get(field.name()) {
				value = normalize_submitted(field, submitted)?;
			}
			if field.kind() == FieldKind::Checkbox && !value.is_null() {
				value = Value::Bool(checkbox_value(&value));
			}
			merged.insert(field.name().to_string(), value);
		}

		let active = merged
			.iter()
			.filter(|(name, _)| {
				self.field(name)
					.is_some_and(|field| field.has_requirements(&merged))
			})
			.map(|(name, value)| (name.clone(), value.clone()))
			.collect();
		Ok(EffectiveData { merged, active })
	}

	/// Effective data: active fields only, computed once
	pub fn data(&self) -> FormResult<&FormData> {
		Ok(&self.effective()?.active)
	}

	/// Merged data of every field, active or not
	pub fn merged_data(&self) -> FormResult<&FormData> {
		Ok(&self.effective()?.merged)
	}

	/// Drops cached data and backend values so the next access reads again
	pub fn invalidate_data(&mut self) {
		self.data_cache.take();
		self.backend_snapshot.take();
	}

	/// Fields whose requirements hold, including value-less ones
	pub fn active_fields(&self) -> FormResult<Vec<&Field>> {
		let merged = self.merged_data()?;
		Ok(self.fields().filter(|f| f.has_requirements(merged)).collect())
	}

	/// Validates every active field and then the form-level validators
	pub fn validate(&mut self) -> FormResult<bool> {
		self.validated = true;
		let errors = {
			let effective = self.effective()?;
			let mut errors = IndexMap::new();
			for field in self.fields() {
				let Some(value) = effective.active.get(field.name()) else {
					continue;
				};
				if let Err(error) = validate_field(field, value, &effective.merged) {
					errors.insert(field.name().to_string(), error.note().to_string());
				}
			}
			if errors.is_empty() {
				for validator in &self.validators {
					if let Err(error) = validator.validate(&effective.active) {
						let key = validator.field().unwrap_or(ALL_FIELDS_KEY);
						errors
							.entry(key.to_string())
							.or_insert_with(|| error.note().to_string());
					}
				}
			}
			errors
		};

		if !errors.is_empty() {
			tracing::debug!(
				form = %self.name,
				fields = ?errors.keys().collect::<Vec<_>>(),
				"Form validation failed"
			);
		}
		self.errors = errors;
		Ok(self.errors.is_empty())
	}

	/// Whether the form is valid, validating it first if needed
	pub fn valid(&mut self) -> FormResult<bool> {
		if self.validated {
			Ok(self.errors.is_empty())
		} else {
			self.validate()
		}
	}

	pub fn is_validated(&self) -> bool {
		self.validated
	}

	/// Validation notes by field name; form-wide ones under [`ALL_FIELDS_KEY`]
	pub fn errors(&self) -> &IndexMap<String, String> {
		&self.errors
	}

	pub fn error(&self, field: &str) -> Option<&str> {
		self.errors.get(field).map(String::as_str)
	}

	/// Results reported by callbacks during the last [`ForisForm::save`]
	pub fn callback_results(&self) -> &IndexMap<String, Value> {
		&self.callback_results
	}

	/// Validates and, when valid, runs the callbacks and commits their changes
	///
	/// Registered callbacks run first, then `extra_callbacks`, all with the
	/// same effective data. Configuration changes are committed in one batch
	/// after the last callback; a failing callback or commit leaves the
	/// configuration untouched.
	///
	/// Returns `Ok(false)` without side effects when the form is invalid.
	pub fn save(&mut self, extra_callbacks: Vec<Callback>) -> FormResult<bool> {
		if !self.validate()? {
			return Ok(false);
		}

		let data = self.data()?.clone();
		let mut results: IndexMap<String, Value> = IndexMap::new();
		let mut changes = Vec::new();
		for callback in self.callbacks.iter().chain(extra_callbacks.iter()) {
			match callback(&data)? {
				CallbackOutcome::None => {}
				CallbackOutcome::SaveResult(reported) => {
					for (key, value) in reported {
						if results.contains_key(&key) {
							return Err(FormError::DuplicateResult(key));
						}
						results.insert(key, value);
					}
				}
				CallbackOutcome::EditConfig(edits) => changes.extend(edits),
			}
		}

		if !changes.is_empty() {
			let backend = self
				.backend
				.as_deref()
				.ok_or_else(|| FormError::NoBackend(self.name.clone()))?;
			let mut configurator = Configurator::new(backend);
			configurator.extend(changes);
			let applied = configurator.commit()?;
			tracing::info!(form = %self.name, changes = applied, "Form saved");
		}
		self.callback_results = results;
		Ok(true)
	}

	/// Active fields bound to their values and notes
	pub fn bound_fields(&self) -> FormResult<Vec<BoundField<'_>>> {
		let data = self.data()?;
		Ok(self
			.active_fields()?
			.into_iter()
			.map(|field| self.bind(field, data))
			.collect())
	}

	fn bind<'a>(&'a self, field: &'a Field, data: &'a FormData) -> BoundField<'a> {
		BoundField::new(
			field,
			data.get(field.name()),
			self.error(field.name()),
			self.has_dependents(field.name()),
		)
	}

	fn section_view(&self, section: &Section, data: &FormData, merged: &FormData) -> SectionView {
		SectionView {
			name: section.name().to_string(),
			title: section.title().to_string(),
			description: section.description().map(str::to_string),
			fields: section
				.children()
				.iter()
				.filter_map(|child| match child {
					crate::section::Element::Field(field) if field.has_requirements(merged) => {
						Some(self.bind(field, data).to_view())
					}
					_ => None,
				})
				.collect(),
			sections: section
				.sections()
				.map(|nested| self.section_view(nested, data, merged))
				.collect(),
		}
	}

	/// Render-ready view of the form and its active fields
	pub fn view(&self) -> FormResult<FormView> {
		let data = self.data()?;
		let merged = self.merged_data()?;
		Ok(FormView {
			name: self.name.clone(),
			errors: self.error(ALL_FIELDS_KEY).map(str::to_string).into_iter().collect(),
			sections: self
				.sections
				.iter()
				.map(|section| self.section_view(section, data, merged))
				.collect(),
		})
	}
}

fn normalize_submitted(field: &Field, submitted: &Value) -> FormResult<Value> {
	if field.is_multifield() {
		return match submitted {
			Value::Array(_) => Ok(submitted.clone()),
			Value::String(text) => Ok(Value::Array(
				text.split("\r\n")
					.filter(|line| !line.is_empty())
					.map(|line| Value::String(line.to_string()))
					.collect(),
			)),
			Value::Null => Ok(Value::Array(Vec::new())),
			_ => Err(FormError::malformed(field.name(), "expected a list of values")),
		};
	}
	match submitted {
		Value::Array(_) | Value::Object(_) => {
			Err(FormError::malformed(field.name(), "expected a single value"))
		}
		other => Ok(other.clone()),
	}
}

fn validate_field(field: &Field, value: &Value, context: &FormData) -> FieldResult<()> {
	if field.is_required() {
		NotEmpty::new().validate(value, context)?;
	} else if field.skips_validation(value) {
		return Ok(());
	}

	let items: Vec<&Value> = match value {
		Value::Array(items) if field.is_multifield() => items.iter().collect(),
		other => vec![other],
	};
	for validator in field.validators() {
		for item in &items {
			validator.validate(item, context)?;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::preprocessors::Preprocessor;
	use crate::validators::{EqualTo, IPv4, LenRange};
	use foris_backend::MemoryBackend;
	use rstest::{fixture, rstest};
	use serde_json::json;

	fn wan_section() -> Section {
		let mut section = Section::new("wan", "WAN");
		section
			.add_field(
				Field::new("proto", FieldKind::Dropdown)
					.with_default("dhcp")
					.with_choices([("dhcp", "DHCP"), ("static", "Static IP address")]),
			)
			.add_field(
				Field::new("ipaddr", FieldKind::Text)
					.required()
					.with_validator(IPv4::new())
					.requires_value("proto", "static"),
			);
		section
	}

	#[fixture]
	fn backend() -> MemoryBackend {
		MemoryBackend::new()
			.with_value("network.wan.proto", json!("static"))
			.with_value("network.wan.ipaddr", json!("10.0.0.2"))
			.with_value("dhcp.lan.ignore", json!("1"))
	}

	fn backed_form(backend: &MemoryBackend, submitted: SubmittedData) -> ForisForm {
		let mut form = ForisForm::new("wan", submitted).with_backend(Arc::new(backend.clone()));
		let mut section = Section::new("wan", "WAN");
		section
			.add_field(
				Field::new("proto", FieldKind::Dropdown)
					.with_default("dhcp")
					.with_backend("network.wan.proto")
					.unwrap(),
			)
			.add_field(
				Field::new("ipaddr", FieldKind::Text)
					.with_backend("network.wan.ipaddr")
					.unwrap()
					.requires_value("proto", "static"),
			)
			.add_field(
				Field::new("dhcp_enabled", FieldKind::Checkbox)
					.with_default(true)
					.with_backend("dhcp.lan.ignore")
					.unwrap()
					.with_preprocessor(Preprocessor::InvertedBool),
			);
		form.add_section(section).unwrap();
		form
	}

	#[rstest]
	fn test_defaults_only() {
		// Arrange
		let mut form = ForisForm::new("wan", SubmittedData::new());
		form.add_section(wan_section()).unwrap();

		// Act
		let data = form.data().unwrap();

		// Assert
		assert_eq!(data.get("proto"), Some(&json!("dhcp")));
		assert!(!data.contains_key("ipaddr"));
	}

	#[rstest]
	fn test_backend_values_override_defaults(backend: MemoryBackend) {
		// Arrange
		let form = backed_form(&backend, SubmittedData::new());

		// Act
		let data = form.data().unwrap();

		// Assert
		assert_eq!(data.get("proto"), Some(&json!("static")));
		assert_eq!(data.get("ipaddr"), Some(&json!("10.0.0.2")));
		assert_eq!(data.get("dhcp_enabled"), Some(&json!(false)));
	}

	#[rstest]
	fn test_submitted_values_override_backend(backend: MemoryBackend) {
		// Arrange
		let form = backed_form(&backend, SubmittedData::from_pairs([("proto", "dhcp")]));

		// Act
		let data = form.data().unwrap();

		// Assert
		assert_eq!(data.get("proto"), Some(&json!("dhcp")));
		assert!(!data.contains_key("ipaddr"));
		assert_eq!(
			form.merged_data().unwrap().get("ipaddr"),
			Some(&json!("10.0.0.2"))
		);
	}

	#[rstest]
	fn test_data_fetches_backend_once(backend: MemoryBackend) {
		// Arrange
		let form = backed_form(&backend, SubmittedData::new());

		// Act
		let first = form.data().unwrap().clone();
		let second = form.data().unwrap().clone();

		// Assert
		assert_eq!(first, second);
		assert_eq!(backend.fetch_count(), 3);
	}

	#[rstest]
	fn test_invalidate_data_refetches(backend: MemoryBackend) {
		// Arrange
		let mut form = backed_form(&backend, SubmittedData::new());
		form.data().unwrap();
		backend.set_value("network.wan.proto", json!("dhcp"));

		// Act
		form.invalidate_data();
		let data = form.data().unwrap();

		// Assert
		assert_eq!(data.get("proto"), Some(&json!("dhcp")));
		assert_eq!(backend.fetch_count(), 6);
	}

	#[rstest]
	fn test_unconvertible_backend_value_falls_back_to_default(backend: MemoryBackend) {
		// Arrange
		backend.set_value("dhcp.lan.ignore", json!("sometimes"));
		let form = backed_form(&backend, SubmittedData::new());

		// Act
		let data = form.data().unwrap();

		// Assert
		assert_eq!(data.get("dhcp_enabled"), Some(&json!(true)));
	}

	#[rstest]
	fn test_backend_outage_propagates(backend: MemoryBackend) {
		// Arrange
		backend.set_available(false);
		let form = backed_form(&backend, SubmittedData::new());

		// Act
		let result = form.data();

		// Assert
		assert!(matches!(result, Err(FormError::Backend(_))));
	}

	#[rstest]
	fn test_required_runs_before_other_validators() {
		// Arrange
		let mut form = ForisForm::new("wan", SubmittedData::from_pairs([("proto", "static")]));
		form.add_section(wan_section()).unwrap();

		// Act
		let valid = form.validate().unwrap();

		// Assert
		assert!(!valid);
		assert_eq!(form.error("ipaddr"), Some("This field is required."));
	}

	#[rstest]
	fn test_first_failing_validator_sets_note() {
		// Arrange
		let mut section = Section::new("password", "Password");
		section.add_field(
			Field::new("password", FieldKind::Password)
				.with_validator(LenRange::new(6, 128))
				.with_validator(IPv4::new()),
		);
		let mut form = ForisForm::new("password", SubmittedData::from_pairs([("password", "abc")]));
		form.add_section(section).unwrap();

		// Act
		form.validate().unwrap();

		// Assert
		assert_eq!(
			form.error("password"),
			Some("Length must be from 6 to 128 characters.")
		);
	}

	#[rstest]
	fn test_optional_empty_field_skips_validators() {
		// Arrange
		let mut section = Section::new("dns", "DNS");
		section.add_field(Field::new("dns1", FieldKind::Text).with_validator(IPv4::new()));
		let mut form = ForisForm::new("dns", SubmittedData::from_pairs([("dns1", "")]));
		form.add_section(section).unwrap();

		// Act & Assert
		assert!(form.valid().unwrap());
	}

	#[rstest]
	fn test_equal_to_uses_form_context() {
		// Arrange
		let mut section = Section::new("password", "Password");
		section
			.add_field(Field::new("password", FieldKind::Password).required())
			.add_field(
				Field::new("password_validation", FieldKind::Password)
					.required()
					.with_validator(EqualTo::new(
						"password",
						"password_validation",
						"Passwords are not equal.",
					)),
			);
		let mut form = ForisForm::new(
			"password",
			SubmittedData::from_pairs([("password", "secret123"), ("password_validation", "secret321")]),
		);
		form.add_section(section).unwrap();

		// Act
		let valid = form.validate().unwrap();

		// Assert
		assert!(!valid);
		assert_eq!(form.error("password_validation"), Some("Passwords are not equal."));
		assert_eq!(form.error("password"), None);
	}

	#[rstest]
	fn test_multifield_validates_each_item() {
		// Arrange
		let mut section = Section::new("dns", "DNS");
		section.add_field(Field::new("servers", FieldKind::Text).multi().with_validator(IPv4::new()));
		let mut form = ForisForm::new(
			"dns",
			SubmittedData::from_pairs([("servers[]", "1.1.1.1"), ("servers[]", "nope")]),
		);
		form.add_section(section).unwrap();

		// Act & Assert
		assert!(!form.validate().unwrap());
		assert_eq!(form.error("servers"), Some("Not a valid IPv4 address."));
	}

	#[rstest]
	fn test_list_for_single_value_field_is_malformed() {
		// Arrange
		let mut form = ForisForm::new(
			"wan",
			SubmittedData::from_json(json!({"proto": ["dhcp", "static"]})),
		);
		form.add_section(wan_section()).unwrap();

		// Act
		let result = form.save(Vec::new());

		// Assert
		assert!(matches!(result, Err(FormError::Malformed { ref field, .. }) if field == "proto"));
	}

	#[rstest]
	fn test_requirement_map_lists_dependents() {
		// Arrange
		let mut form = ForisForm::new("wan", SubmittedData::new());

		// Act
		form.add_section(wan_section()).unwrap();

		// Assert
		assert_eq!(
			form.requirement_map().get("proto"),
			Some(&vec!["ipaddr".to_string()])
		);
		assert!(form.has_dependents("proto"));
		assert!(!form.has_dependents("ipaddr"));
	}

	#[rstest]
	fn test_save_without_backend_for_changes() {
		// Arrange
		let mut form = ForisForm::new("wan", SubmittedData::new());
		form.add_section(wan_section()).unwrap();
		form.add_callback(|data| {
			Ok(CallbackOutcome::EditConfig(vec![UciChange::set(
				"network.wan.proto",
				data["proto"].clone(),
			)?]))
		});

		// Act
		let result = form.save(Vec::new());

		// Assert
		assert!(matches!(result, Err(FormError::NoBackend(_))));
	}

	#[rstest]
	fn test_view_contains_only_active_fields() {
		// Arrange
		let mut form = ForisForm::new("wan", SubmittedData::new());
		form.add_section(wan_section()).unwrap();

		// Act
		let view = form.view().unwrap();

		// Assert
		let names: Vec<&str> = view.sections[0].fields.iter().map(|f| f.name.as_str()).collect();
		assert_eq!(names, ["proto"]);
		assert_eq!(view.sections[0].fields[0].classes, ["has-requirements"]);
	}
}
