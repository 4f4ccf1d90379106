//! E-mail notifications and automatic restarts

use crate::error::ConfigResult;
use crate::handler::FormBuilder;
use crate::values::{flag, integer, required_text, text};
use foris_backend::UciChange;
use foris_core::RequestContext;
use foris_forms::validators::{Email, InRange, PositiveInteger, RegExp, Time};
use foris_forms::{
	CallbackOutcome, Field, FieldKind, ForisForm, FormData, FormResult, Preprocessor, Section,
	SubmittedData,
};
use serde_json::Value;

pub const SENDER_NAME_PATTERN: &str = r"^[0-9a-zA-Z_\.-]+$";

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationsHandler;

/// Joins a list of recipients into the space separated form of the input
fn recipients(value: &Value) -> Option<Value> {
	match value {
		Value::Array(items) => Some(Value::from(
			items
				.iter()
				.filter_map(Value::as_str)
				.collect::<Vec<_>>()
				.join(" "),
		)),
		Value::String(_) => Some(value.clone()),
		_ => None,
	}
}

impl FormBuilder for NotificationsHandler {
	fn title(&self) -> &str {
		"Notifications"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let mut form =
			ForisForm::new("notifications", data).with_backend(ctx.app().backend_handle());

		let mut notifications =
			Section::new("notifications", ctx.gettext("Notifications settings"));
		notifications
			.add_field(
				Field::new("enable_smtp", FieldKind::Checkbox)
					.with_label(ctx.gettext("Enable notifications"))
					.with_default(false)
					.with_backend("user_notify.smtp.enable")?
					.with_preprocessor(Preprocessor::Bool),
			)
			.add_field(
				Field::new("use_turris_smtp", FieldKind::Radio)
					.with_label(ctx.gettext("SMTP provider"))
					.with_choices([("1", ctx.gettext("Turris")), ("0", ctx.gettext("Custom"))])
					.with_default("0")
					.requires_value("enable_smtp", true)
					.with_backend("user_notify.smtp.use_turris_smtp")?,
			)
			.add_field(
				Field::new("to", FieldKind::Text)
					.with_label(ctx.gettext("Recipient's email"))
					.with_hint(ctx.gettext(
						"Email address of recipient. Separate multiple addresses by spaces.",
					))
					.required()
					.requires_value("enable_smtp", true)
					.with_backend("user_notify.smtp.to")?
					.with_preprocessor(Preprocessor::custom(recipients)),
			)
			.add_field(
				Field::new("sender_name", FieldKind::Text)
					.with_label(ctx.gettext("Sender's name"))
					.with_hint(ctx.gettext(
						"Name of the sender - will be used as a part of the sender's email address before the \"at\" sign.",
					))
					.required()
					.with_validator(RegExp::new(
						ctx.gettext(
							"Sender's name can contain only alphanumeric characters, dots and underscores.",
						),
						SENDER_NAME_PATTERN,
					)
					.map_err(|e| foris_forms::FormError::malformed("sender_name", e.to_string()))?)
					.requires_value("enable_smtp", true)
					.requires_value("use_turris_smtp", "1")
					.with_backend("user_notify.smtp.sender_name")?,
			)
			.add_field(
				Field::new("severity", FieldKind::Dropdown)
					.with_label(ctx.gettext("Importance"))
					.with_choices([
						("1", ctx.gettext("Reboot is required")),
						("2", ctx.gettext("Reboot or attention is required")),
						(
							"3",
							ctx.gettext("Reboot or attention is required or update was installed"),
						),
					])
					.with_default("1")
					.requires_value("enable_smtp", true)
					.with_backend("user_notify.notifications.severity")?,
			)
			.add_field(
				Field::new("news", FieldKind::Checkbox)
					.with_label(ctx.gettext("Send news"))
					.with_hint(ctx.gettext("Send emails about new features."))
					.with_default(false)
					.requires_value("enable_smtp", true)
					.with_backend("user_notify.notifications.news")?
					.with_preprocessor(Preprocessor::Bool),
			);
		form.add_section(notifications)?;

		let custom = |field: Field| {
			field
				.requires_value("enable_smtp", true)
				.requires_value("use_turris_smtp", "0")
		};
		let mut smtp = Section::new("smtp", ctx.gettext("SMTP settings"));
		smtp.add_field(custom(
			Field::new("from", FieldKind::Email)
				.with_label(ctx.gettext("Sender address (From)"))
				.with_hint(ctx.gettext("This is the address notifications are send from."))
				.required()
				.with_validator(Email::new())
				.with_backend("user_notify.smtp.from")?,
		))
		.add_field(custom(
			Field::new("server", FieldKind::Text)
				.with_label(ctx.gettext("Server address"))
				.required()
				.with_backend("user_notify.smtp.server")?,
		))
		.add_field(custom(
			Field::new("port", FieldKind::Number)
				.with_label(ctx.gettext("Server port"))
				.required()
				.with_validator(PositiveInteger::new())
				.with_backend("user_notify.smtp.port")?,
		))
		.add_field(custom(
			Field::new("security", FieldKind::Dropdown)
				.with_label(ctx.gettext("Security"))
				.with_choices([
					("none", ctx.gettext("None")),
					("ssl", ctx.gettext("SSL/TLS")),
					("starttls", ctx.gettext("STARTTLS")),
				])
				.with_default("none")
				.with_backend("user_notify.smtp.security")?,
		))
		.add_field(custom(
			Field::new("username", FieldKind::Text)
				.with_label(ctx.gettext("Username"))
				.with_backend("user_notify.smtp.username")?,
		))
		.add_field(custom(
			Field::new("password", FieldKind::Password)
				.with_label(ctx.gettext("Password"))
				.with_backend("user_notify.smtp.password")?,
		));
		form.add_section(smtp)?;

		let mut reboot = Section::new("reboot", ctx.gettext("Automatic restarts"));
		reboot
			.add_field(
				Field::new("reboot_delay", FieldKind::Number)
					.with_label(ctx.gettext("Delay (days)"))
					.with_hint(ctx.gettext(
						"Number of days that must pass between receiving the request for restart and the automatic restart itself.",
					))
					.required()
					.with_validator(PositiveInteger::new())
					.with_validator(InRange::new(0, 10))
					.with_backend("user_notify.reboot.delay")?,
			)
			.add_field(
				Field::new("reboot_time", FieldKind::Time)
					.with_label(ctx.gettext("Reboot time"))
					.with_hint(ctx.gettext("Time of day of automatic reboot in HH:MM format."))
					.required()
					.with_validator(Time::new())
					.with_backend("user_notify.reboot.time")?,
			);
		form.add_section(reboot)?;

		form.add_callback(|data| Ok(CallbackOutcome::EditConfig(notification_changes(data)?)));
		Ok(Some(form))
	}
}

fn notification_changes(data: &FormData) -> FormResult<Vec<UciChange>> {
	let enabled = flag(data, "enable_smtp");
	let mut changes = vec![
		UciChange::set_bool("user_notify.smtp.enable", enabled)?,
		UciChange::set("user_notify.reboot.time", required_text(data, "reboot_time")?)?,
		UciChange::set(
			"user_notify.reboot.delay",
			integer(data, "reboot_delay")?.to_string(),
		)?,
	];
	if !enabled {
		return Ok(changes);
	}

	let turris_smtp = required_text(data, "use_turris_smtp")?;
	changes.push(UciChange::set("user_notify.smtp.use_turris_smtp", turris_smtp.as_str())?);
	if turris_smtp == "0" {
		changes.push(UciChange::set("user_notify.smtp.server", required_text(data, "server")?)?);
		changes.push(UciChange::set(
			"user_notify.smtp.port",
			integer(data, "port")?.to_string(),
		)?);
		for option in ["username", "password", "security", "from"] {
			changes.push(UciChange::set(
				&format!("user_notify.smtp.{option}"),
				text(data, option).unwrap_or_default(),
			)?);
		}
	} else {
		changes.push(UciChange::set(
			"user_notify.smtp.sender_name",
			required_text(data, "sender_name")?,
		)?);
	}

	let to: Vec<String> = required_text(data, "to")?
		.split_whitespace()
		.map(str::to_string)
		.collect();
	changes.push(UciChange::set("user_notify.smtp.to", to)?);
	changes.push(UciChange::set(
		"user_notify.notifications.severity",
		required_text(data, "severity")?,
	)?);
	changes.push(UciChange::set_bool(
		"user_notify.notifications.news",
		flag(data, "news"),
	)?);
	Ok(changes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use foris_backend::UciOp;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(["admin@example.com", "ops@example.com"]), Some(json!("admin@example.com ops@example.com")))]
	#[case(json!("admin@example.com"), Some(json!("admin@example.com")))]
	#[case(json!(3), None)]
	fn test_recipients(#[case] value: Value, #[case] expected: Option<Value>) {
		// Act & Assert
		assert_eq!(recipients(&value), expected);
	}

	#[rstest]
	fn test_turris_smtp_splits_recipients() {
		// Arrange
		let data: FormData = [
			("enable_smtp", json!(true)),
			("use_turris_smtp", json!("1")),
			("sender_name", json!("turris")),
			("to", json!("a@example.com  b@example.com")),
			("severity", json!("2")),
			("news", json!(false)),
			("reboot_delay", json!("3")),
			("reboot_time", json!("04:30")),
		]
		.into_iter()
		.map(|(k, v)| (k.to_string(), v))
		.collect();

		// Act
		let changes = notification_changes(&data).unwrap();

		// Assert
		let to = changes
			.iter()
			.find(|change| change.path.to_string() == "user_notify.smtp.to")
			.unwrap();
		assert_eq!(to.op, UciOp::Set(json!(["a@example.com", "b@example.com"])));
		assert!(
			!changes
				.iter()
				.any(|change| change.path.to_string() == "user_notify.smtp.server")
		);
	}
}
