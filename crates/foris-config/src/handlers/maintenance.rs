//! Configuration backups and reboot

use crate::error::ConfigResult;
use crate::handler::{ActionHandler, FormBuilder, report_saved};
use crate::values::required_text;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Local;
use foris_backend::BackendExt;
use foris_core::{Location, RequestContext, Response};
use foris_forms::{CallbackOutcome, Field, FieldKind, ForisForm, FormError, Section, SubmittedData};
use serde_json::{Value, json};

pub const BACKUP_FILENAME_FORMAT: &str = "turris-backup-%Y-%m-%d_%H-%M-%S.tar.bz2";

/// Result keys of a restore
pub const RESTORE_RESULT: &str = "result";
pub const RESTORE_NEW_IP: &str = "new_ip";

/// Backup restore form plus the `config-backup` and `reboot` actions
///
/// Uploaded files reach the form as base64 encoded text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenanceHandler;

impl FormBuilder for MaintenanceHandler {
	fn title(&self) -> &str {
		"Maintenance"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let backend = ctx.app().backend_handle();
		let mut form = ForisForm::new("maintenance", data).with_backend(backend.clone());
		let mut section = Section::new("restore_backup", ctx.gettext("Backup restore"));
		section.add_field(
			Field::new("backup_file", FieldKind::File)
				.with_label(ctx.gettext("Backup file"))
				.required(),
		);
		form.add_section(section)?;

		form.add_callback(move |data| {
			let encoded = required_text(data, "backup_file")?;
			let archive = BASE64
				.decode(encoded.trim())
				.map_err(|e| FormError::malformed("backup_file", e.to_string()))?;
			let outcome = backend.restore_backup(&archive)?;
			tracing::info!(
				result = outcome.result,
				size = archive.len(),
				"Configuration backup restored"
			);
			Ok(CallbackOutcome::save_result([
				(RESTORE_RESULT, json!(outcome.result)),
				(RESTORE_NEW_IP, json!(outcome.new_ip)),
			]))
		});
		Ok(Some(form))
	}

	fn report(&self, ctx: &mut RequestContext<'_>, saved: bool, form: &ForisForm) {
		if !saved {
			report_saved(ctx, saved);
		} else if form.callback_results().get(RESTORE_RESULT) == Some(&Value::Bool(true)) {
			ctx.success(
				"Configuration was successfully restored. Note that a reboot will be required to apply restored configuration.",
			);
			if let Some(new_ip) = form
				.callback_results()
				.get(RESTORE_NEW_IP)
				.and_then(Value::as_str)
			{
				let message = format!(
					"{} {new_ip}",
					ctx.gettext("After the reboot the router will be available at")
				);
				ctx.info(&message);
			}
		} else {
			ctx.warning("Failed to restore the backup from the provided file.");
		}
	}
}

impl ActionHandler for MaintenanceHandler {
	fn call_action(
		&self,
		ctx: &mut RequestContext<'_>,
		action: &str,
		_data: &SubmittedData,
	) -> ConfigResult<Option<Response>> {
		match action {
			"config-backup" => {
				let content = ctx.backend().create_backup()?;
				let filename = Local::now().format(BACKUP_FILENAME_FORMAT).to_string();
				tracing::info!(%filename, size = content.len(), "Configuration backup created");
				Ok(Some(Response::Download { filename, content }))
			}
			"reboot" => {
				ctx.backend().reboot()?;
				tracing::warn!("Reboot requested");
				ctx.success("Router is going to reboot.");
				Ok(Some(Response::redirect(Location::ConfigPage("maintenance".to_string()))))
			}
			_ => Ok(None),
		}
	}
}
