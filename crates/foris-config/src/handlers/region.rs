//! Time zone and system time

use crate::error::ConfigResult;
use crate::handler::{ActionHandler, FormBuilder};
use crate::values::required_text;
use chrono::Local;
use foris_backend::{BackendExt, UciChange};
use foris_core::RequestContext;
use foris_forms::validators::{DATETIME_FORMAT, Datetime, Timezone};
use foris_forms::{
	CallbackOutcome, Field, FieldKind, ForisForm, FormError, Section, SubmittedData,
};
use serde_json::{Value, json};
use std::sync::Arc;

pub const ZONENAME_PATH: &str = "system.@system[0].zonename";
pub const DEFAULT_ZONENAME: &str = "UTC";

/// Time zone names offered to the user, sorted
pub fn zone_names() -> Vec<&'static str> {
	let mut names: Vec<&'static str> = chrono_tz::TZ_VARIANTS.iter().map(|tz| tz.name()).collect();
	names.sort_unstable();
	names
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegionHandler;

impl FormBuilder for RegionHandler {
	fn title(&self) -> &str {
		"Region and time"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let mut form = ForisForm::new("region", data).with_backend(ctx.app().backend_handle());
		let mut section = Section::new("timezone", ctx.gettext("Time zone")).with_description(
			ctx.gettext(
				"It is important for your device to have the correct time zone set. The system time is then adjusted to it.",
			),
		);
		section.add_field(
			Field::new("zonename", FieldKind::Dropdown)
				.with_label(ctx.gettext("Time zone"))
				.with_choices(zone_names().into_iter().map(|name| (name, name)))
				.with_default(DEFAULT_ZONENAME)
				.required()
				.with_validator(Timezone::new())
				.with_backend(ZONENAME_PATH)?,
		);
		form.add_section(section)?;

		// The backend derives the POSIX zone description from the name
		form.add_callback(|data| {
			let zonename = required_text(data, "zonename")?;
			tracing::info!(%zonename, "Time zone changed");
			Ok(CallbackOutcome::EditConfig(vec![UciChange::set(ZONENAME_PATH, zonename)?]))
		});
		Ok(Some(form))
	}
}

/// Manual setting of the system time, with NTP synchronisation as an action
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeHandler;

impl FormBuilder for TimeHandler {
	fn title(&self) -> &str {
		"Time"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let backend = ctx.app().backend_handle();
		let mut form = ForisForm::new("time", data).with_backend(Arc::clone(&backend));
		let mut section = Section::new("time", ctx.gettext("Time")).with_description(ctx.gettext(
			"We could not synchronize the time with a time server, probably due to a loss of connection. It is necessary for the router to have correct time in order to function properly. Please, synchronize it with your computer's time, or set it manually.",
		));
		section.add_field(
			Field::new("time", FieldKind::Text)
				.with_label(ctx.gettext("Time"))
				.with_hint(ctx.gettext("Time in YYYY-MM-DD HH:MM:SS format."))
				.with_default(Local::now().naive_local().format(DATETIME_FORMAT).to_string())
				.required()
				.with_validator(Datetime::new()),
		);
		form.add_section(section)?;

		form.add_callback(move |data| {
			let raw = required_text(data, "time")?;
			let time = Datetime::parse(&raw)
				.ok_or_else(|| FormError::malformed("time", format!("`{raw}` is not a time")))?;
			backend.set_time(time)?;
			tracing::info!(%time, "System time set manually");
			Ok(CallbackOutcome::None)
		});
		Ok(Some(form))
	}
}

impl ActionHandler for TimeHandler {
	fn call_ajax_action(
		&self,
		ctx: &mut RequestContext<'_>,
		action: &str,
		_data: &SubmittedData,
	) -> ConfigResult<Option<Value>> {
		match action {
			"ntp_update" => {
				let started = ctx.backend().ntp_update()?;
				tracing::debug!(started, "NTP synchronisation requested");
				Ok(Some(json!({"success": started})))
			}
			_ => Ok(None),
		}
	}
}
