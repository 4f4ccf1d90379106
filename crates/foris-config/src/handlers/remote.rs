//! Remote access and its tokens

use crate::error::{ConfigError, ConfigResult};
use crate::handler::{ActionHandler, FormBuilder, report_saved};
use crate::values::{flag, integer};
use foris_backend::{BackendError, BackendExt, RemoteSettings};
use foris_core::RequestContext;
use foris_forms::validators::{InRange, LenRange, RegExp};
use foris_forms::{
	CallbackOutcome, Field, FieldKind, ForisForm, FormError, Section, SubmittedData,
};
use serde_json::{Value, json};

pub const DEFAULT_PORT: u16 = 11884;
pub const TOKEN_NAME_PATTERN: &str = r"^[a-zA-Z0-9_.-]+$";

/// Result keys of a save
pub const REMOTE_ENABLED: &str = "enabled";
pub const REMOTE_RESULT: &str = "result";

#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteHandler;

impl RemoteHandler {
	/// Form validating the name of a new token
	fn token_form(ctx: &RequestContext<'_>, data: &SubmittedData) -> ConfigResult<ForisForm> {
		let mut form = ForisForm::new("remote_token", data.clone());
		let mut section = Section::new("token", ctx.gettext("Token"));
		section.add_field(
			Field::new("name", FieldKind::Text)
				.with_label(ctx.gettext("Token name"))
				.required()
				.with_validator(
					RegExp::new(
						ctx.gettext("Only alphanumeric characters, dots, dashes and underscores are allowed."),
						TOKEN_NAME_PATTERN,
					)
					.map_err(|e| FormError::malformed("name", e.to_string()))?,
				)
				.with_validator(LenRange::new(1, 63)),
		);
		form.add_section(section)?;
		Ok(form)
	}

	fn tokens(ctx: &RequestContext<'_>) -> ConfigResult<Value> {
		let tokens = ctx.backend().remote_tokens()?;
		Ok(json!({"success": true, "tokens": tokens}))
	}
}

impl FormBuilder for RemoteHandler {
	fn title(&self) -> &str {
		"Remote Access"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let current = match ctx.backend().remote_settings() {
			Ok(current) => current,
			Err(BackendError::Rpc { message, .. }) => {
				tracing::warn!(%message, "Remote access settings unavailable, using defaults");
				RemoteSettings {
					enabled: false,
					wan_access: false,
					port: DEFAULT_PORT,
				}
			}
			Err(err) => return Err(err.into()),
		};
		let backend = ctx.app().backend_handle();
		let mut form = ForisForm::new("remote", data).with_backend(backend.clone());
		let mut section = Section::new("remote_settings", ctx.gettext(self.title())).with_description(
			ctx.gettext(
				"Remote access lets applications manage the router over an encrypted connection authenticated by client tokens.",
			),
		);
		section
			.add_field(
				Field::new("enabled", FieldKind::Checkbox)
					.with_label(ctx.gettext("Enable remote access"))
					.with_default(current.enabled),
			)
			.add_field(
				Field::new("wan_access", FieldKind::Checkbox)
					.with_label(ctx.gettext("Accessible via WAN"))
					.with_hint(ctx.gettext(
						"If this option is check the device in the WAN network will be able to connect to the configuration interface. Otherwise only devices on LAN will be able to access the configuration interface.",
					))
					.with_default(current.wan_access)
					.requires_value("enabled", true),
			)
			.add_field(
				Field::new("port", FieldKind::Number)
					.with_label(ctx.gettext("Port"))
					.with_hint(ctx.gettext(
						"A port which will be opened for the remote configuration of this device.",
					))
					.with_default(current.port.to_string())
					.required()
					.with_validator(InRange::new(1, i64::from(u16::MAX)))
					.requires_value("enabled", true),
			);
		form.add_section(section)?;

		form.add_callback(move |data| {
			let enabled = flag(data, "enabled");
			let (wan_access, port) = if enabled {
				let port = integer(data, "port")?;
				let port = u16::try_from(port)
					.map_err(|_| FormError::malformed("port", format!("{port} is not a port")))?;
				(flag(data, "wan_access"), port)
			} else {
				(current.wan_access, current.port)
			};
			let result = match backend.remote_update_settings(enabled, wan_access, port) {
				Ok(()) => true,
				Err(BackendError::Rpc { message, .. }) => {
					tracing::warn!(%message, enabled, "Remote access settings rejected");
					false
				}
				Err(err) => return Err(err.into()),
			};
			Ok(CallbackOutcome::save_result([
				(REMOTE_ENABLED, json!(enabled)),
				(REMOTE_RESULT, json!(result)),
			]))
		});
		Ok(Some(form))
	}

	fn report(&self, ctx: &mut RequestContext<'_>, saved: bool, form: &ForisForm) {
		if !saved {
			report_saved(ctx, saved);
			return;
		}
		let results = form.callback_results();
		let enabled = results.get(REMOTE_ENABLED) == Some(&Value::Bool(true));
		let result = results.get(REMOTE_RESULT) == Some(&Value::Bool(true));
		match (enabled, result) {
			(true, true) => ctx.success("Remote access was sucessfully enabled."),
			(true, false) => ctx.error(
				"Failed to enable the remote access. You are probably using a message bus which doesn't support the remote access or the CA for remote access hasn't been generated yet.",
			),
			(false, true) => ctx.success("Remote access was sucessfully disabled."),
			(false, false) => ctx.error("Failed to disable remote access."),
		}
	}
}

impl ActionHandler for RemoteHandler {
	fn call_ajax_action(
		&self,
		ctx: &mut RequestContext<'_>,
		action: &str,
		data: &SubmittedData,
	) -> ConfigResult<Option<Value>> {
		match action {
			"list_tokens" => Self::tokens(ctx).map(Some),
			"generate_token" => {
				let mut form = Self::token_form(ctx, data)?;
				if !form.validate()? {
					tracing::debug!(errors = ?form.errors(), "Token name rejected");
					return Ok(Some(json!({"success": false, "errors": form.errors()})));
				}
				let name = data
					.get_str("name")
					.ok_or_else(|| ConfigError::BadRequest("missing token name".to_string()))?;
				ctx.backend().remote_generate_token(name)?;
				tracing::info!(%name, "Remote access token generated");
				Self::tokens(ctx).map(Some)
			}
			"revoke_token" => {
				let id = data
					.get_str("token_id")
					.filter(|id| !id.is_empty())
					.ok_or_else(|| ConfigError::BadRequest("missing token_id".to_string()))?;
				let revoked = ctx.backend().remote_revoke_token(id)?;
				tracing::info!(%id, revoked, "Remote access token revoked");
				Ok(Some(json!({"success": revoked})))
			}
			_ => Ok(None),
		}
	}
}
