//! Lookup table of configuration pages and request dispatch
//!
//! Every entry point requires an authenticated session. Requests with a
//! method other than GET, HEAD, OPTIONS or TRACE must carry the session's
//! CSRF token in the `csrf_token` field of their data.

use crate::auth::require_login;
use crate::error::{ConfigError, ConfigResult};
use crate::page::{ConfigPage, default_pages};
use foris_core::{Location, RequestContext, Response};
use foris_forms::SubmittedData;
use serde::Serialize;

pub const CSRF_FIELD: &str = "csrf_token";

/// Menu item of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
	pub slug: String,
	pub title: String,
	pub menu_order: u32,
}

/// Configuration pages ordered by menu position
#[derive(Debug, Default)]
pub struct PageRegistry {
	pages: Vec<ConfigPage>,
}

impl PageRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry of the built-in pages
	pub fn with_defaults() -> ConfigResult<Self> {
		let mut registry = Self::new();
		for page in default_pages() {
			registry.register(page)?;
		}
		Ok(registry)
	}

	/// Adds a page
	///
	/// # Errors
	///
	/// Returns [`ConfigError::AlreadyRegistered`] when the slug is taken.
	pub fn register(&mut self, page: ConfigPage) -> ConfigResult<()> {
		if self.pages.iter().any(|p| p.slug() == page.slug()) {
			return Err(ConfigError::AlreadyRegistered(page.slug().to_string()));
		}
		tracing::debug!(page = page.slug(), menu_order = page.menu_order(), "Config page registered");
		self.pages.push(page);
		self.pages.sort_by(|a, b| {
			a.menu_order()
				.cmp(&b.menu_order())
				.then_with(|| a.slug().cmp(b.slug()))
		});
		Ok(())
	}

	pub fn get(&self, slug: &str) -> ConfigResult<&ConfigPage> {
		self.pages
			.iter()
			.find(|page| page.slug() == slug)
			.ok_or_else(|| ConfigError::PageNotFound(slug.to_string()))
	}

	pub fn pages(&self) -> &[ConfigPage] {
		&self.pages
	}

	pub fn len(&self) -> usize {
		self.pages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pages.is_empty()
	}

	/// Menu of the configuration section, titles translated
	pub fn menu(&self, ctx: &RequestContext<'_>) -> Vec<MenuEntry> {
		self.pages
			.iter()
			.map(|page| MenuEntry {
				slug: page.slug().to_string(),
				title: ctx.gettext(page.title()),
				menu_order: page.menu_order(),
			})
			.collect()
	}

	/// Sends the user to the first page of the menu
	pub fn index(&self, ctx: &mut RequestContext<'_>) -> ConfigResult<Response> {
		if let Some(login) = require_login(ctx, &Location::ConfigIndex.path()) {
			return Ok(login);
		}
		let first = self
			.pages
			.first()
			.ok_or_else(|| ConfigError::PageNotFound(String::new()))?;
		Ok(Response::redirect(Location::ConfigPage(first.slug().to_string())))
	}

	/// GET of a page
	pub fn handle_get(&self, ctx: &mut RequestContext<'_>, slug: &str) -> ConfigResult<Response> {
		if let Some(login) = require_login(ctx, &page_path(slug)) {
			return Ok(login);
		}
		let page = self.get(slug)?;
		page.render(ctx).map(|response| with_menu(response, self.menu(ctx)))
	}

	/// POST of a page form
	pub fn handle_post(
		&self,
		ctx: &mut RequestContext<'_>,
		slug: &str,
		data: SubmittedData,
	) -> ConfigResult<Response> {
		if let Some(login) = require_login(ctx, &page_path(slug)) {
			return Ok(login);
		}
		verify_csrf(ctx, "POST", &data)?;
		let page = self.get(slug)?;
		page.submit(ctx, data).map(|response| with_menu(response, self.menu(ctx)))
	}

	/// Named action of a page
	pub fn handle_action(
		&self,
		ctx: &mut RequestContext<'_>,
		slug: &str,
		action: &str,
		method: &str,
		data: &SubmittedData,
	) -> ConfigResult<Response> {
		if let Some(login) = require_login(ctx, &page_path(slug)) {
			return Ok(login);
		}
		verify_csrf(ctx, method, data)?;
		tracing::debug!(page = slug, action, "Config page action");
		self.get(slug)?.call_action(ctx, action, data)
	}

	/// Named AJAX action of a page
	pub fn handle_ajax(
		&self,
		ctx: &mut RequestContext<'_>,
		slug: &str,
		action: &str,
		method: &str,
		data: &SubmittedData,
	) -> ConfigResult<Response> {
		if let Some(login) = require_login(ctx, &page_path(slug)) {
			return Ok(login);
		}
		verify_csrf(ctx, method, data)?;
		tracing::debug!(page = slug, action, "Config page AJAX action");
		self.get(slug)?
			.call_ajax_action(ctx, action, data)
			.map(Response::json)
	}
}

fn page_path(slug: &str) -> String {
	Location::ConfigPage(slug.to_string()).path()
}

fn verify_csrf(ctx: &RequestContext<'_>, method: &str, data: &SubmittedData) -> ConfigResult<()> {
	ctx.verify_csrf(method, data.get_str(CSRF_FIELD))
		.inspect_err(|_| tracing::warn!(method, "Request rejected, CSRF token mismatch"))?;
	Ok(())
}

fn with_menu(response: Response, menu: Vec<MenuEntry>) -> Response {
	match response {
		Response::Render(mut view) => {
			let menu = serde_json::to_value(menu).unwrap_or_default();
			view.context.insert("menu".to_string(), menu);
			Response::Render(view)
		}
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::PageId;
	use rstest::rstest;

	#[rstest]
	fn test_pages_sorted_by_menu_order_then_slug() {
		// Arrange
		let mut registry = PageRegistry::new();

		// Act
		registry
			.register(ConfigPage::new(PageId::Plugin("zz".into()), "ZZ", 5))
			.unwrap();
		registry.register(ConfigPage::new(PageId::Wan, "WAN", 15)).unwrap();
		registry
			.register(ConfigPage::new(PageId::Plugin("aa".into()), "AA", 15))
			.unwrap();

		// Assert
		let slugs: Vec<_> = registry.pages().iter().map(ConfigPage::slug).collect();
		assert_eq!(slugs, vec!["zz", "aa", "wan"]);
	}

	#[rstest]
	fn test_duplicate_slug_rejected() {
		// Arrange
		let mut registry = PageRegistry::with_defaults().unwrap();

		// Act
		let result = registry.register(ConfigPage::new(PageId::Plugin("wan".into()), "WAN", 99));

		// Assert
		assert!(matches!(result, Err(ConfigError::AlreadyRegistered(slug)) if slug == "wan"));
	}

	#[rstest]
	#[case("about")]
	#[case("")]
	fn test_unknown_slug_not_found(#[case] slug: &str) {
		// Arrange
		let registry = PageRegistry::with_defaults().unwrap();

		// Act
		let result = registry.get(slug);

		// Assert
		assert!(result.is_err_and(|err| err.is_not_found()));
	}
}
