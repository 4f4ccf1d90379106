//! Agreement with automatic updates

use crate::error::ConfigResult;
use crate::handler::{FormBuilder, report_saved};
use crate::values::text;
use foris_backend::UciChange;
use foris_core::RequestContext;
use foris_forms::{CallbackOutcome, Field, FieldKind, ForisForm, Section, SubmittedData};
use serde_json::{Value, json};

pub const EULA_PATH: &str = "foris.eula.agreed_updater";
pub const UPDATER_DISABLED_PATH: &str = "updater.override.disable";

/// Result key holding whether the user agreed
pub const AGREED: &str = "agreed";

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdaterHandler;

impl FormBuilder for UpdaterHandler {
	fn title(&self) -> &str {
		"Updater"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let mut form = ForisForm::new("updater_eula", data).with_backend(ctx.app().backend_handle());
		let mut section = Section::new("eula", ctx.gettext("Automatic updates")).with_description(
			ctx.gettext(
				"Updater keeps the router secure by installing security fixes and new features automatically. It needs your agreement to run.",
			),
		);
		section.add_field(
			Field::new("agreed", FieldKind::Radio)
				.with_label(ctx.gettext("I agree"))
				.with_choices([
					("1", ctx.gettext("Use automatic updates (recommended)")),
					("0", ctx.gettext("Turn automatic updates off")),
				])
				.with_default("")
				.required()
				.with_backend(EULA_PATH)?,
		);
		form.add_section(section)?;

		form.add_callback(|data| {
			let agreed = text(data, "agreed").as_deref() == Some("1");
			tracing::info!(agreed, "Updater agreement changed");
			Ok(CallbackOutcome::EditConfig(vec![
				UciChange::set_bool(EULA_PATH, agreed)?,
				UciChange::set_bool(UPDATER_DISABLED_PATH, !agreed)?,
			]))
		});
		form.add_callback(|data| {
			let agreed = text(data, "agreed").as_deref() == Some("1");
			Ok(CallbackOutcome::save_result([(AGREED, json!(agreed))]))
		});
		Ok(Some(form))
	}

	fn report(&self, ctx: &mut RequestContext<'_>, saved: bool, form: &ForisForm) {
		report_saved(ctx, saved);
		if saved && form.callback_results().get(AGREED) == Some(&Value::Bool(false)) {
			ctx.warning("Automatic updates are disabled. The router will not receive security fixes.");
		}
	}
}
