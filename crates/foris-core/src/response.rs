//! What a handler hands back to the HTTP layer

use crate::messages::Message;
use foris_forms::FormView;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Redirect target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Location {
	Login,
	WizardStep(u8),
	ConfigIndex,
	ConfigPage(String),
	/// Login page remembering where to continue
	LoginNext(String),
	/// Already validated URL
	Url(String),
}

impl Location {
	pub fn path(&self) -> String {
		match self {
			Self::Login => "/".to_string(),
			Self::WizardStep(1) => "/wizard/".to_string(),
			Self::WizardStep(step) => format!("/wizard/step/{step}"),
			Self::ConfigIndex => "/config/".to_string(),
			Self::ConfigPage(slug) => format!("/config/{slug}/"),
			Self::LoginNext(next) => format!("/?next={next}"),
			Self::Url(url) => url.clone(),
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path())
	}
}

/// Data of a page to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
	pub template: String,
	pub title: String,
	pub form: Option<FormView>,
	pub messages: Vec<Message>,
	pub context: IndexMap<String, Value>,
}

impl PageView {
	pub fn new(template: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			template: template.into(),
			title: title.into(),
			form: None,
			messages: Vec::new(),
			context: IndexMap::new(),
		}
	}

	pub fn with_form(mut self, form: FormView) -> Self {
		self.form = Some(form);
		self
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.context.insert(key.into(), value.into());
		self
	}

	pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
		self.messages = messages;
		self
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
	Render(Box<PageView>),
	Redirect(Location),
	Json(Value),
	Download { filename: String, content: Vec<u8> },
}

impl Response {
	pub fn render(view: PageView) -> Self {
		Self::Render(Box::new(view))
	}

	pub fn redirect(location: Location) -> Self {
		Self::Redirect(location)
	}

	pub fn json(value: Value) -> Self {
		Self::Json(value)
	}

	pub fn as_redirect(&self) -> Option<&Location> {
		match self {
			Self::Redirect(location) => Some(location),
			_ => None,
		}
	}

	pub fn as_view(&self) -> Option<&PageView> {
		match self {
			Self::Render(view) => Some(view.as_ref()),
			_ => None,
		}
	}

	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			_ => None,
		}
	}
}
