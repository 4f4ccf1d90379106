//! Form builders and page actions
//!
//! A [`FormBuilder`] knows how to build the form of one configuration domain
//! (WAN, LAN, ...). Config pages and wizard steps both reuse them. An
//! [`ActionHandler`] adds named actions to a page, such as downloading a
//! backup.

use crate::error::{ConfigError, ConfigResult};
use foris_core::{RequestContext, Response};
use foris_forms::{Callback, ForisForm, SubmittedData};
use serde_json::Value;

pub const SAVED_MESSAGE: &str = "Configuration was successfully saved.";
pub const INPUT_ERRORS_MESSAGE: &str = "There were some errors in your input.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Configuration could not be saved due to an internal error.";

/// Builds the form of a configuration domain
pub trait FormBuilder: Send + Sync {
	/// Untranslated title of the domain
	fn title(&self) -> &str;

	/// Builds the form for `data`, `None` when there is nothing to configure
	fn build_form(&self, ctx: &RequestContext<'_>, data: SubmittedData)
	-> ConfigResult<Option<ForisForm>>;

	/// Reports the outcome of a save as flash messages
	fn report(&self, ctx: &mut RequestContext<'_>, saved: bool, _form: &ForisForm) {
		report_saved(ctx, saved);
	}
}

/// Flashes the generic success or failure message of a save
pub fn report_saved(ctx: &mut RequestContext<'_>, saved: bool) {
	if saved {
		ctx.success(SAVED_MESSAGE);
	} else {
		ctx.warning(INPUT_ERRORS_MESSAGE);
	}
}

/// Flashes the messages of a submission whose values the form could not read
pub fn report_malformed(ctx: &mut RequestContext<'_>, err: &ConfigError) {
	tracing::warn!(error = %err, "Form not saved, submission is malformed");
	ctx.error(INTERNAL_ERROR_MESSAGE);
	ctx.warning(INPUT_ERRORS_MESSAGE);
}

/// Builds and saves a form, running `extra_callbacks` after its own
///
/// Returns `None` when the builder has no form, otherwise whether the form
/// was valid and saved together with the form, for re-rendering.
pub fn save_form(
	builder: &dyn FormBuilder,
	ctx: &RequestContext<'_>,
	data: SubmittedData,
	extra_callbacks: Vec<Callback>,
) -> ConfigResult<Option<(bool, ForisForm)>> {
	let Some(mut form) = builder.build_form(ctx, data)? else {
		return Ok(None);
	};
	let saved = form.save(extra_callbacks)?;
	if saved {
		tracing::debug!(form = form.name(), "Form accepted");
	} else {
		tracing::debug!(form = form.name(), errors = ?form.errors(), "Form rejected");
	}
	Ok(Some((saved, form)))
}

/// Named actions of a page
///
/// Each method returns `None` for an action it does not know.
pub trait ActionHandler: Send + Sync {
	/// Action answered with a full response (redirect, download, ...)
	fn call_action(
		&self,
		_ctx: &mut RequestContext<'_>,
		_action: &str,
		_data: &SubmittedData,
	) -> ConfigResult<Option<Response>> {
		Ok(None)
	}

	/// Action answered with JSON
	fn call_ajax_action(
		&self,
		_ctx: &mut RequestContext<'_>,
		_action: &str,
		_data: &SubmittedData,
	) -> ConfigResult<Option<Value>> {
		Ok(None)
	}
}
