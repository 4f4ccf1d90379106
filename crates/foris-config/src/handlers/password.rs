//! Administration password

use crate::error::ConfigResult;
use crate::handler::{FormBuilder, report_saved};
use crate::values::{flag, required_text, text};
use foris_backend::{BackendExt, UciChange};
use foris_core::RequestContext;
use foris_core::progress::PASSWORD_PATH;
use foris_forms::validators::{EqualTo, LenRange};
use foris_forms::{CallbackOutcome, Field, FieldKind, ForisForm, FormError, Section, SubmittedData};
use foris_sessions::{Argon2Hasher, PasswordHasher, check_password};
use serde_json::{Value, json};
use std::sync::Arc;

/// Result key set when the current password did not match
pub const WRONG_OLD_PASSWORD: &str = "wrong_old_password";

/// Whether the form asks for the current password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordMode {
	/// First setup, no current password
	Initial,
	/// Change of an existing password
	Change,
	/// Change when a password is already stored
	#[default]
	Detect,
}

pub struct PasswordHandler {
	mode: PasswordMode,
	hasher: Arc<dyn PasswordHasher>,
}

impl PasswordHandler {
	pub fn new(mode: PasswordMode) -> Self {
		Self {
			mode,
			hasher: Arc::new(Argon2Hasher::new()),
		}
	}

	pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
		self.hasher = hasher;
		self
	}
}

impl Default for PasswordHandler {
	fn default() -> Self {
		Self::new(PasswordMode::Detect)
	}
}

impl FormBuilder for PasswordHandler {
	fn title(&self) -> &str {
		"Password"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let stored = ctx.backend().fetch_str(PASSWORD_PATH)?;
		let change = match self.mode {
			PasswordMode::Initial => false,
			PasswordMode::Change => true,
			PasswordMode::Detect => stored.is_some(),
		};

		let mut form = ForisForm::new("password", data).with_backend(ctx.app().backend_handle());
		let mut section = Section::new("set_password", ctx.gettext(self.title())).with_description(
			ctx.gettext(
				"Set your password for this administration interface. The password must be at least 6 characters long.",
			),
		);
		let (label, repeat_label) = if change {
			section.add_field(
				Field::new("old_password", FieldKind::Password)
					.with_label(ctx.gettext("Current password")),
			);
			("New password", "New password (repeat)")
		} else {
			("Password", "Password (repeat)")
		};
		section
			.add_field(
				Field::new("password", FieldKind::Password)
					.with_label(ctx.gettext(label))
					.required()
					.with_validator(LenRange::new(6, 128)),
			)
			.add_field(
				Field::new("password_validation", FieldKind::Password)
					.with_label(ctx.gettext(repeat_label))
					.required()
					.with_validator(EqualTo::new(
						"password",
						"password_validation",
						ctx.gettext("Passwords are not equal."),
					)),
			)
			.add_field(
				Field::new("set_system_pw", FieldKind::Checkbox)
					.with_label(ctx.gettext("Use the same password for advanced configuration"))
					.with_hint(ctx.gettext(
						"Same password would be used for accessing this administration interface, for root user in LuCI web interface and for SSH login. Use a strong password!",
					)),
			);
		form.add_section(section)?;

		let backend = ctx.app().backend_handle();
		let hasher = Arc::clone(&self.hasher);
		form.add_callback(move |data| {
			if change {
				let old = text(data, "old_password").unwrap_or_default();
				let matches = check_password(hasher.as_ref(), &old, stored.as_deref())
					.map_err(|e| FormError::malformed("old_password", e.to_string()))?;
				if !matches {
					tracing::warn!("Password change refused, current password does not match");
					return Ok(CallbackOutcome::save_result([(WRONG_OLD_PASSWORD, json!(true))]));
				}
			}

			let password = required_text(data, "password")?;
			let hash = hasher
				.hash(&password)
				.map_err(|e| FormError::malformed("password", e.to_string()))?;
			if flag(data, "set_system_pw") {
				backend.set_password("root", &password)?;
				tracing::info!("System password of root updated");
			}
			Ok(CallbackOutcome::EditConfig(vec![UciChange::set(PASSWORD_PATH, hash)?]))
		});

		Ok(Some(form))
	}

	fn report(&self, ctx: &mut RequestContext<'_>, saved: bool, form: &ForisForm) {
		if form.callback_results().get(WRONG_OLD_PASSWORD) == Some(&Value::Bool(true)) {
			ctx.error("Old password you entered was not valid.");
		} else {
			report_saved(ctx, saved);
		}
	}
}
