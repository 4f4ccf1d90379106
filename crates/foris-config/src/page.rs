//! Configuration pages
//!
//! A [`ConfigPage`] is assembled from an optional [`FormBuilder`] and an
//! optional [`ActionHandler`]; there is no page type hierarchy.

use crate::error::{ConfigError, ConfigResult};
use crate::handler::{ActionHandler, FormBuilder, report_malformed, save_form};
use crate::handlers::{
	DnsHandler, LanHandler, MaintenanceHandler, NotificationsHandler, PasswordHandler,
	RegionHandler, RemoteHandler, TimeHandler, UpdaterHandler, WanHandler, WifiHandler,
};
use foris_core::{Location, MessageFilter, PageView, RequestContext, Response};
use foris_forms::SubmittedData;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Identifier of a configuration page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageId {
	Notifications,
	Password,
	Remote,
	Wan,
	Lan,
	Region,
	Time,
	Dns,
	Wifi,
	Maintenance,
	Updater,
	/// Page contributed by a plugin, identified by its slug
	Plugin(String),
}

impl PageId {
	pub const BUILTIN: [PageId; 11] = [
		PageId::Notifications,
		PageId::Password,
		PageId::Remote,
		PageId::Wan,
		PageId::Lan,
		PageId::Region,
		PageId::Time,
		PageId::Dns,
		PageId::Wifi,
		PageId::Maintenance,
		PageId::Updater,
	];

	pub fn slug(&self) -> &str {
		match self {
			Self::Notifications => "notifications",
			Self::Password => "password",
			Self::Remote => "remote",
			Self::Wan => "wan",
			Self::Lan => "lan",
			Self::Region => "region",
			Self::Time => "time",
			Self::Dns => "dns",
			Self::Wifi => "wifi",
			Self::Maintenance => "maintenance",
			Self::Updater => "updater",
			Self::Plugin(slug) => slug,
		}
	}

	/// Resolves the slug of a built-in page
	pub fn builtin(slug: &str) -> Option<Self> {
		Self::BUILTIN.into_iter().find(|id| id.slug() == slug)
	}
}

impl fmt::Display for PageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.slug())
	}
}

/// A page of the configuration section
#[derive(Clone)]
pub struct ConfigPage {
	id: PageId,
	title: String,
	menu_order: u32,
	form: Option<Arc<dyn FormBuilder>>,
	actions: Option<Arc<dyn ActionHandler>>,
}

impl ConfigPage {
	pub fn new(id: PageId, title: impl Into<String>, menu_order: u32) -> Self {
		Self {
			id,
			title: title.into(),
			menu_order,
			form: None,
			actions: None,
		}
	}

	pub fn with_form(mut self, form: impl FormBuilder + 'static) -> Self {
		self.form = Some(Arc::new(form));
		self
	}

	pub fn with_actions(mut self, actions: impl ActionHandler + 'static) -> Self {
		self.actions = Some(Arc::new(actions));
		self
	}

	/// Uses one handler for both the form and the actions
	pub fn with_handler<H>(mut self, handler: H) -> Self
	where
		H: FormBuilder + ActionHandler + 'static,
	{
		let handler = Arc::new(handler);
		self.form = Some(handler.clone());
		self.actions = Some(handler);
		self
	}

	pub fn id(&self) -> &PageId {
		&self.id
	}

	pub fn slug(&self) -> &str {
		self.id.slug()
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn menu_order(&self) -> u32 {
		self.menu_order
	}

	pub fn form_builder(&self) -> Option<&Arc<dyn FormBuilder>> {
		self.form.as_ref()
	}

	fn view(&self, ctx: &mut RequestContext<'_>) -> PageView {
		let title = ctx.gettext(&self.title);
		let csrf_token = ctx.csrf_token();
		PageView::new(format!("config/{}", self.slug()), title)
			.with("active_config_page_key", self.slug())
			.with("csrf_token", csrf_token)
	}

	fn finish_view(&self, ctx: &mut RequestContext<'_>, view: PageView) -> Response {
		let messages = ctx.take_messages(MessageFilter::All);
		Response::render(view.with_messages(messages))
	}

	/// Renders the page with the current configuration
	pub fn render(&self, ctx: &mut RequestContext<'_>) -> ConfigResult<Response> {
		let mut view = self.view(ctx);
		let form = match &self.form {
			Some(builder) => builder.build_form(ctx, SubmittedData::new())?,
			None => None,
		};
		view = match form {
			Some(form) => view.with_form(form.view()?),
			None => view.with("no_form", true),
		};
		Ok(self.finish_view(ctx, view))
	}

	/// Saves submitted data
	///
	/// A successful save redirects back to the page; invalid input re-renders
	/// the page with the notes of the form. A malformed submission re-renders
	/// the current configuration.
	pub fn submit(&self, ctx: &mut RequestContext<'_>, data: SubmittedData) -> ConfigResult<Response> {
		let Some(builder) = &self.form else {
			return Err(ConfigError::BadRequest(format!(
				"page `{}` has no form to submit",
				self.slug()
			)));
		};
		let outcome = match save_form(builder.as_ref(), ctx, data, Vec::new()) {
			Ok(outcome) => outcome,
			Err(err) if err.is_malformed() => {
				report_malformed(ctx, &err);
				return self.render(ctx);
			}
			Err(err) => return Err(err),
		};
		let Some((saved, form)) = outcome else {
			tracing::debug!(page = %self.id, "Nothing to save, page has no form now");
			return self.render(ctx);
		};
		builder.report(ctx, saved, &form);
		if saved {
			return Ok(Response::redirect(Location::ConfigPage(self.slug().to_string())));
		}
		let view = self.view(ctx).with_form(form.view()?);
		Ok(self.finish_view(ctx, view))
	}

	/// Runs a named action answered with a full response
	pub fn call_action(
		&self,
		ctx: &mut RequestContext<'_>,
		action: &str,
		data: &SubmittedData,
	) -> ConfigResult<Response> {
		let response = match &self.actions {
			Some(actions) => actions.call_action(ctx, action, data)?,
			None => None,
		};
		response.ok_or_else(|| ConfigError::unknown_action(self.slug(), action))
	}

	/// Runs a named action answered with JSON
	pub fn call_ajax_action(
		&self,
		ctx: &mut RequestContext<'_>,
		action: &str,
		data: &SubmittedData,
	) -> ConfigResult<Value> {
		let value = match &self.actions {
			Some(actions) => actions.call_ajax_action(ctx, action, data)?,
			None => None,
		};
		value.ok_or_else(|| ConfigError::unknown_action(self.slug(), action))
	}
}

impl fmt::Debug for ConfigPage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConfigPage")
			.field("id", &self.id)
			.field("title", &self.title)
			.field("menu_order", &self.menu_order)
			.field("form", &self.form.is_some())
			.field("actions", &self.actions.is_some())
			.finish()
	}
}

/// Pages shipped with the interface
pub fn default_pages() -> Vec<ConfigPage> {
	vec![
		ConfigPage::new(PageId::Notifications, "Notifications", 9).with_form(NotificationsHandler),
		ConfigPage::new(PageId::Password, "Password", 10).with_form(PasswordHandler::default()),
		ConfigPage::new(PageId::Remote, "Remote Access", 11).with_handler(RemoteHandler),
		ConfigPage::new(PageId::Wan, "WAN", 15).with_form(WanHandler),
		ConfigPage::new(PageId::Lan, "LAN", 16).with_form(LanHandler),
		ConfigPage::new(PageId::Region, "Region and time", 17).with_form(RegionHandler),
		ConfigPage::new(PageId::Time, "Time", 18).with_handler(TimeHandler),
		ConfigPage::new(PageId::Dns, "DNS", 19).with_form(DnsHandler),
		ConfigPage::new(PageId::Wifi, "Wi-Fi", 20).with_form(WifiHandler),
		ConfigPage::new(PageId::Maintenance, "Maintenance", 21).with_handler(MaintenanceHandler),
		ConfigPage::new(PageId::Updater, "Updater", 22).with_form(UpdaterHandler),
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("wan", Some(PageId::Wan))]
	#[case("maintenance", Some(PageId::Maintenance))]
	#[case("about", None)]
	fn test_builtin_slugs(#[case] slug: &str, #[case] expected: Option<PageId>) {
		// Act & Assert
		assert_eq!(PageId::builtin(slug), expected);
	}

	#[rstest]
	fn test_default_pages_cover_every_builtin() {
		// Act
		let pages = default_pages();

		// Assert
		assert_eq!(pages.len(), PageId::BUILTIN.len());
		for id in PageId::BUILTIN {
			assert!(pages.iter().any(|page| page.id() == &id), "missing {id}");
		}
	}
}
