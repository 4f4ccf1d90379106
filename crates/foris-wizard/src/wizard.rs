//! Requests of the setup wizard
//!
//! Every entry point checks the login first, then resolves the step number
//! and finally consults the gate. A step the progress does not allow yet is
//! answered with a redirect to the furthest allowed one.

use crate::checks::{Connectivity, UPDATER_DONE, UPDATER_OFFLINE_PENDING, updater_status_json};
use crate::error::{WizardError, WizardResult};
use crate::gate::{self, advanced, check_step, may_skip, progress_callback};
use crate::step::StepId;
use foris_backend::{BackendExt, Configurator, UciChange};
use foris_config::handler::INPUT_ERRORS_MESSAGE;
use foris_config::handlers::password::WRONG_OLD_PASSWORD;
use foris_config::handlers::updater::AGREED;
use foris_config::handlers::{
	LanHandler, PasswordHandler, PasswordMode, RegionHandler, TimeHandler, UpdaterHandler,
	WanHandler, WifiHandler,
};
use foris_config::registry::CSRF_FIELD;
use foris_config::{FormBuilder, report_malformed, require_login, save_form};
use foris_core::{
	Location, MessageFilter, NUM_WIZARD_STEPS, PageView, RequestContext, Response, WizardProgress,
	record_progress, wizard_progress,
};
use foris_forms::{Callback, FormData, ForisForm, SubmittedData};
use serde_json::{Value, json};

pub const SKIP_PATH: &str = "/wizard/skip";
pub const FORWARD_UPSTREAM_PATH: &str = "resolver.common.forward_upstream";

pub const WAN_LINK_DOWN_MESSAGE: &str =
	"WAN port has no link, your internet connection probably won't work.";
pub const OFFLINE_UPDATE_MESSAGE: &str =
	"The router is going to reboot to finish the installation of updates.";

enum Entry {
	Open(StepId, WizardProgress),
	Leave(Response),
}

/// The setup wizard
///
/// Holds no state; the progress lives in the session and the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wizard;

impl Wizard {
	pub fn new() -> Self {
		Self
	}

	/// Shows the furthest step the router may reach
	pub fn index(&self, ctx: &mut RequestContext<'_>) -> WizardResult<Response> {
		if let Some(login) = require_login(ctx, &Location::WizardStep(1).path()) {
			return Ok(login);
		}
		let progress = wizard_progress(ctx)?;
		let current = progress.allowed_step_max.min(NUM_WIZARD_STEPS);
		self.handle_get(ctx, u32::from(current))
	}

	/// GET of step `number`
	pub fn handle_get(&self, ctx: &mut RequestContext<'_>, number: u32) -> WizardResult<Response> {
		let (step, progress) = match self.open(ctx, number)? {
			Entry::Open(step, progress) => (step, progress),
			Entry::Leave(response) => return Ok(response),
		};

		match step {
			StepId::Wan => {
				match ctx.backend().wan_link_up() {
					Ok(true) => {}
					Ok(false) => ctx.warning(WAN_LINK_DOWN_MESSAGE),
					Err(err) => tracing::warn!(error = %err, "WAN link state unknown"),
				}
				self.render_form(ctx, step, progress)
			}
			// The form is fetched with `time_form` once the NTP sync fails
			StepId::Time => {
				let view = self.view(ctx, step, progress, None)?;
				Ok(finish(ctx, view))
			}
			StepId::UpdaterOffline => {
				let status = ctx.backend().updater_status()?;
				if status.status == UPDATER_DONE {
					gate::complete_step(ctx, step)?;
					return Ok(Response::redirect(Location::WizardStep(step.next_number())));
				}
				if status.status == UPDATER_OFFLINE_PENDING {
					ctx.backend().reboot()?;
					tracing::info!("Rebooting to finish the offline update");
					ctx.info(OFFLINE_UPDATE_MESSAGE);
				}
				let view = self
					.view(ctx, step, progress, None)?
					.with("status", updater_status_json(&status, false));
				Ok(finish(ctx, view))
			}
			StepId::Wifi => {
				let form = WifiHandler.build_form(ctx, SubmittedData::new())?;
				if form.is_none() {
					tracing::info!("No wireless radios, Wi-Fi step passed");
					gate::complete_step(ctx, step)?;
				}
				let progress = wizard_progress(ctx)?;
				let mut view = self.view(ctx, step, progress, form.as_ref())?;
				if form.is_none() {
					view = view.with("no_radios", true);
				}
				Ok(finish(ctx, view))
			}
			StepId::Registration => {
				let mut view = self.view(ctx, step, progress, None)?;
				match ctx.backend().registration_code() {
					Ok(Some(code)) => view = view.with("code", code),
					Ok(None) => view.template = "wizard/registration-failure".to_string(),
					Err(err) => {
						tracing::warn!(error = %err, "Registration code lookup failed");
						view.template = "wizard/registration-failure".to_string();
					}
				}
				Ok(finish(ctx, view))
			}
			_ => self.render_form(ctx, step, progress),
		}
	}

	/// POST of the form of step `number`
	///
	/// A valid submission is saved together with the advanced progress and
	/// redirects to the step it opened. Anything else re-renders the step and
	/// leaves the progress as it was.
	pub fn handle_post(
		&self,
		ctx: &mut RequestContext<'_>,
		number: u32,
		data: SubmittedData,
	) -> WizardResult<Response> {
		let (step, progress) = match self.open(ctx, number)? {
			Entry::Open(step, progress) => (step, progress),
			Entry::Leave(response) => return Ok(response),
		};
		verify_csrf(ctx, "POST", &data)?;
		let Some(builder) = form_builder(step, progress) else {
			return Err(WizardError::NoForm(step.number()));
		};

		let extra = vec![save_progress(step, progress)];
		let outcome = match save_form(builder.as_ref(), ctx, data, extra) {
			Ok(outcome) => outcome,
			Err(err) if err.is_malformed() => {
				report_malformed(ctx, &err);
				return self.render_form(ctx, step, progress);
			}
			Err(err) => return Err(err.into()),
		};
		let Some((saved, form)) = outcome else {
			tracing::debug!(step = %step, "Nothing to save, step has no form now");
			return self.handle_get(ctx, number);
		};
		if !saved {
			ctx.warning(INPUT_ERRORS_MESSAGE);
			let view = self.view(ctx, step, progress, Some(&form))?;
			return Ok(finish(ctx, view));
		}

		let next = next_number(step, form.data()?);
		if let Some(updated) = advanced(progress, next, step.is_final()) {
			record_progress(ctx.session_mut(), updated);
			tracing::info!(step = %step, allowed_step_max = updated.allowed_step_max, "Wizard advanced");
		}
		if form.callback_results().get(WRONG_OLD_PASSWORD) == Some(&Value::Bool(true)) {
			builder.report(ctx, saved, &form);
			let progress = wizard_progress(ctx)?;
			let view = self.view(ctx, step, progress, Some(&form))?;
			return Ok(finish(ctx, view));
		}
		Ok(Response::redirect(Location::WizardStep(next)))
	}

	/// AJAX action of step `number`, answered with JSON
	pub fn handle_ajax(
		&self,
		ctx: &mut RequestContext<'_>,
		number: u32,
		action: &str,
		method: &str,
		data: &SubmittedData,
	) -> WizardResult<Response> {
		let (step, progress) = match self.open(ctx, number)? {
			Entry::Open(step, progress) => (step, progress),
			Entry::Leave(response) => return Ok(response),
		};
		verify_csrf(ctx, method, data)?;

		let value = match (step, action) {
			(StepId::Connectivity, "check_connection") => advancing(ctx, step, action, |ctx| {
				let result = Connectivity::from_report(&ctx.backend().check_connection()?);
				gate::complete_step(ctx, step)?;
				Ok(json!({"success": true, "result": result.as_str()}))
			})?,
			(StepId::Connectivity, "check_connection_noforward") => {
				disable_forwarding(ctx);
				advancing(ctx, step, action, |ctx| {
					let result = Connectivity::from_report(&ctx.backend().check_connection()?);
					Ok(json!({"success": true, "result": result.as_str()}))
				})?
			}
			(StepId::Time, "ntp_update") => advancing(ctx, step, action, |ctx| {
				let synced = ctx.backend().ntp_update()?;
				if synced {
					gate::complete_step(ctx, step)?;
				}
				Ok(json!({"success": synced}))
			})?,
			(StepId::Time, "time_form") => match TimeHandler.build_form(ctx, SubmittedData::new())? {
				Some(form) => json!({"success": true, "form": form.view()?}),
				None => json!({"success": false}),
			},
			(StepId::Updater, "run_updater") => advancing(ctx, step, action, |ctx| {
				let started = ctx.backend().check_updates()?;
				if started {
					gate::complete_step(ctx, step)?;
				}
				Ok(json!({"success": started}))
			})?,
			(StepId::Updater, "updater_status") => {
				updater_status_json(&ctx.backend().updater_status()?, true)
			}
			(StepId::Updater, "submit_eula") => {
				advancing(ctx, step, action, |ctx| submit_eula(ctx, progress, data))?
			}
			(StepId::UpdaterOffline, "updater_status") => advancing(ctx, step, action, |ctx| {
				let status = ctx.backend().updater_status()?;
				if status.status == UPDATER_DONE {
					gate::complete_step(ctx, step)?;
				}
				Ok(updater_status_json(&status, false))
			})?,
			_ => return Err(WizardError::unknown_action(step.number(), action)),
		};
		Ok(Response::json(value))
	}

	/// Skips the rest of the wizard
	///
	/// Allowed when the current step permits it or the wizard got to its end.
	/// The progress jumps to the last step and is marked finished.
	pub fn skip(
		&self,
		ctx: &mut RequestContext<'_>,
		method: &str,
		data: &SubmittedData,
	) -> WizardResult<Response> {
		if let Some(login) = require_login(ctx, SKIP_PATH) {
			return Ok(login);
		}
		verify_csrf(ctx, method, data)?;
		let progress = wizard_progress(ctx)?;
		if !may_skip(progress) {
			let current = progress.allowed_step_max.min(NUM_WIZARD_STEPS);
			tracing::warn!(step = current, "Wizard skip refused");
			return Err(WizardError::SkipNotAllowed(current));
		}
		let skipped = WizardProgress::new(progress.allowed_step_max.max(NUM_WIZARD_STEPS), true);
		if skipped != progress {
			gate::commit(ctx, skipped)?;
		}
		tracing::info!("Wizard skipped");
		Ok(Response::redirect(Location::ConfigIndex))
	}

	fn open(&self, ctx: &mut RequestContext<'_>, number: u32) -> WizardResult<Entry> {
		if let Some(login) = require_login(ctx, &step_path(number)) {
			return Ok(Entry::Leave(login));
		}
		let step = StepId::try_from(number)?;
		let progress = wizard_progress(ctx)?;
		Ok(match check_step(progress, step) {
			Some(target) => Entry::Leave(Response::redirect(target)),
			None => Entry::Open(step, progress),
		})
	}

	fn render_form(
		&self,
		ctx: &mut RequestContext<'_>,
		step: StepId,
		progress: WizardProgress,
	) -> WizardResult<Response> {
		let form = match form_builder(step, progress) {
			Some(builder) => builder.build_form(ctx, SubmittedData::new())?,
			None => None,
		};
		let view = self.view(ctx, step, progress, form.as_ref())?;
		Ok(finish(ctx, view))
	}

	fn view(
		&self,
		ctx: &mut RequestContext<'_>,
		step: StepId,
		progress: WizardProgress,
		form: Option<&ForisForm>,
	) -> WizardResult<PageView> {
		let title = format!("{} {}", ctx.gettext("Configuration wizard - step"), step.number());
		let next_step_url = match step {
			StepId::Registration => Location::ConfigIndex.path(),
			_ => Location::WizardStep(step.next_number()).path(),
		};
		let csrf_token = ctx.csrf_token();
		let mut view = PageView::new(step.template(), title)
			.with("stepnumber", step.number())
			.with("stepname", step.name())
			.with("can_skip_wizard", may_skip(progress) && step.can_skip())
			.with("next_step_url", next_step_url)
			.with("csrf_token", csrf_token);
		if let Some(form) = form {
			if let Some(first) = form.sections().first() {
				view = view.with("first_title", first.title());
				if let Some(description) = first.description() {
					view = view.with("first_description", description);
				}
			}
			view = view.with_form(form.view()?);
		}
		Ok(view)
	}
}

fn step_path(number: u32) -> String {
	match u8::try_from(number) {
		Ok(number) => Location::WizardStep(number).path(),
		Err(_) => format!("/wizard/step/{number}"),
	}
}

fn finish(ctx: &mut RequestContext<'_>, view: PageView) -> Response {
	let messages = ctx.take_messages(MessageFilter::All);
	Response::render(view.with_messages(messages))
}

fn verify_csrf(ctx: &RequestContext<'_>, method: &str, data: &SubmittedData) -> WizardResult<()> {
	ctx.verify_csrf(method, data.get_str(CSRF_FIELD))
		.inspect_err(|_| tracing::warn!(method, "Wizard request rejected, CSRF token mismatch"))?;
	Ok(())
}

/// Form of a step, `None` for steps without one
fn form_builder(step: StepId, progress: WizardProgress) -> Option<Box<dyn FormBuilder>> {
	let builder: Box<dyn FormBuilder> = match step {
		StepId::Password => {
			let mode = if progress.finished || progress.allowed_step_max >= 2 {
				PasswordMode::Change
			} else {
				PasswordMode::Initial
			};
			Box::new(PasswordHandler::new(mode))
		}
		StepId::Wan => Box::new(WanHandler),
		StepId::Region => Box::new(RegionHandler),
		StepId::Time => Box::new(TimeHandler),
		StepId::Updater => Box::new(UpdaterHandler),
		StepId::Lan => Box::new(LanHandler),
		StepId::Wifi => Box::new(WifiHandler),
		StepId::Connectivity | StepId::UpdaterOffline | StepId::Registration => return None,
	};
	Some(builder)
}

fn agreed(data: &FormData) -> bool {
	data.get(AGREED).and_then(Value::as_str) == Some("1")
}

/// Step opened by saving `step` with `data`
///
/// Without the updater there is nothing to install offline.
fn next_number(step: StepId, data: &FormData) -> u8 {
	match step {
		StepId::Updater if !agreed(data) => StepId::Lan.number(),
		_ => step.next_number(),
	}
}

/// Save callback storing the progress a save of `step` reaches
fn save_progress(step: StepId, progress: WizardProgress) -> Callback {
	Box::new(move |data| {
		let updated = advanced(progress, next_number(step, data), step.is_final());
		progress_callback(updated)(data)
	})
}

/// Runs a gate advancing action, reporting a backend failure as
/// `{"success": false}`
fn advancing<'a, F>(
	ctx: &mut RequestContext<'a>,
	step: StepId,
	action: &str,
	run: F,
) -> WizardResult<Value>
where
	F: FnOnce(&mut RequestContext<'a>) -> WizardResult<Value>,
{
	match run(ctx) {
		Err(err) if err.backend_error().is_some() => {
			tracing::warn!(step = %step, action, error = %err, "Wizard action failed on the backend");
			Ok(json!({"success": false}))
		}
		other => other,
	}
}

fn disable_forwarding(ctx: &RequestContext<'_>) {
	let result = UciChange::set(FORWARD_UPSTREAM_PATH, "0").and_then(|change| {
		let mut configurator = Configurator::new(ctx.backend());
		configurator.queue(change);
		configurator.commit()
	});
	match result {
		Ok(_) => tracing::info!("DNS forwarding disabled"),
		Err(err) => tracing::warn!(error = %err, "Failed to disable DNS forwarding"),
	}
}

fn submit_eula(
	ctx: &mut RequestContext<'_>,
	progress: WizardProgress,
	data: &SubmittedData,
) -> WizardResult<Value> {
	let step = StepId::Updater;
	let extra = vec![save_progress(step, progress)];
	let outcome = match save_form(&UpdaterHandler, ctx, data.clone(), extra) {
		Ok(outcome) => outcome,
		Err(err) if err.is_malformed() => {
			tracing::warn!(error = %err, "Updater agreement not saved, submission is malformed");
			return Ok(json!({"success": false}));
		}
		Err(err) => return Err(err.into()),
	};
	let Some((saved, form)) = outcome else {
		return Ok(json!({"success": false}));
	};
	if !saved {
		return Ok(json!({"success": false, "errors": form.errors()}));
	}
	let next = next_number(step, form.data()?);
	if let Some(updated) = advanced(progress, next, false) {
		record_progress(ctx.session_mut(), updated);
	}
	if form.callback_results().get(AGREED) == Some(&Value::Bool(true)) {
		let started = ctx.backend().check_updates()?;
		Ok(json!({"success": started}))
	} else {
		Ok(json!({
			"success": true,
			"redirect": Location::WizardStep(next).path(),
		}))
	}
}
