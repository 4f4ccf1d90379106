//! Config pages dispatched through the registry over in-memory services

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use foris_backend::MemoryBackend;
use foris_conf::Settings;
use foris_config::{ConfigError, PageRegistry};
use foris_core::progress::PASSWORD_PATH;
use foris_core::{AppContext, Level, Location, MessageFilter, RequestContext, Response};
use foris_forms::SubmittedData;
use foris_i18n::Translator;
use foris_sessions::{Argon2Hasher, InMemorySessionStore, PasswordHasher, SessionError};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

struct Harness {
	app: AppContext,
	backend: MemoryBackend,
	registry: PageRegistry,
}

#[fixture]
fn harness() -> Harness {
	let backend = MemoryBackend::new()
		.with_value("network.lan.ipaddr", json!("192.168.1.1"))
		.respond("wifi", "get_settings", json!({"devices": []}))
		.respond("remote", "list_tokens", json!({"tokens": [{"id": "01", "name": "phone", "status": "valid"}]}));
	let app = AppContext::new(
		Settings::default(),
		Arc::new(backend.clone()),
		Translator::new("en"),
		Arc::new(InMemorySessionStore::new()),
	);
	Harness {
		app,
		backend,
		registry: PageRegistry::with_defaults().unwrap(),
	}
}

fn logged_in(app: &AppContext) -> RequestContext<'_> {
	let mut ctx = RequestContext::open(app, None).unwrap();
	ctx.authenticate().unwrap();
	ctx
}

fn form_data(ctx: &mut RequestContext<'_>, pairs: &[(&str, &str)]) -> SubmittedData {
	let mut data = SubmittedData::from_pairs(pairs.iter().copied());
	data.insert("csrf_token", ctx.csrf_token());
	data
}

#[rstest]
fn test_anonymous_request_redirects_to_login(harness: Harness) {
	// Arrange
	let mut ctx = RequestContext::open(&harness.app, None).unwrap();

	// Act
	let response = harness.registry.handle_get(&mut ctx, "wan").unwrap();

	// Assert
	assert_eq!(
		response.as_redirect(),
		Some(&Location::LoginNext("/config/wan/".to_string()))
	);
}

#[rstest]
fn test_unknown_page_is_not_found(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);

	// Act
	let result = harness.registry.handle_get(&mut ctx, "openvpn");

	// Assert
	assert!(result.is_err_and(|err| err.is_not_found()));
}

#[rstest]
fn test_get_renders_backend_values(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);

	// Act
	let response = harness.registry.handle_get(&mut ctx, "lan").unwrap();

	// Assert
	let view = response.as_view().unwrap();
	let form = view.form.as_ref().unwrap();
	let value = serde_json::to_value(form).unwrap();
	assert!(value.to_string().contains("192.168.1.1"));
	assert_eq!(view.context.get("active_config_page_key"), Some(&json!("lan")));
	assert!(view.context.contains_key("menu"));
}

#[rstest]
fn test_valid_post_saves_and_redirects(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);
	let data = form_data(
		&mut ctx,
		&[
			("lan_ipaddr", "192.168.2.1"),
			("dhcp_enabled", "1"),
			("dhcp_min", "100"),
			("dhcp_max", "100"),
		],
	);

	// Act
	let response = harness.registry.handle_post(&mut ctx, "lan", data).unwrap();

	// Assert
	assert_eq!(response.as_redirect(), Some(&Location::ConfigPage("lan".to_string())));
	assert_eq!(harness.backend.value("network.lan.ipaddr"), Some(json!("192.168.2.1")));
	assert_eq!(harness.backend.value("dhcp.lan.start"), Some(json!("100")));
	let messages = ctx.take_messages(MessageFilter::All);
	assert_eq!(messages[0].level, Level::Success);
}

#[rstest]
fn test_invalid_post_rerenders_without_mutation(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);
	let data = form_data(
		&mut ctx,
		&[("lan_ipaddr", "192.168.2.300"), ("dhcp_enabled", "0")],
	);

	// Act
	let response = harness.registry.handle_post(&mut ctx, "lan", data).unwrap();

	// Assert
	let view = response.as_view().unwrap();
	assert_eq!(view.messages[0].level, Level::Warning);
	assert_eq!(view.messages[0].text, "There were some errors in your input.");
	assert!(harness.backend.mutation_log().is_empty());
}

#[rstest]
fn test_checked_checkbox_after_hidden_value_saves(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);
	let data = form_data(
		&mut ctx,
		&[
			("lan_ipaddr", "192.168.2.1"),
			("dhcp_enabled", "0"),
			("dhcp_enabled", "1"),
			("dhcp_min", "100"),
			("dhcp_max", "100"),
		],
	);

	// Act
	let response = harness.registry.handle_post(&mut ctx, "lan", data).unwrap();

	// Assert
	assert_eq!(response.as_redirect(), Some(&Location::ConfigPage("lan".to_string())));
	assert_eq!(harness.backend.value("dhcp.lan.start"), Some(json!("100")));
}

#[rstest]
fn test_malformed_post_rerenders_current_configuration(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);
	let mut data = form_data(&mut ctx, &[("dhcp_enabled", "0")]);
	data.insert("lan_ipaddr", json!(["192.168.2.1", "192.168.3.1"]));

	// Act
	let response = harness.registry.handle_post(&mut ctx, "lan", data).unwrap();

	// Assert
	let view = response.as_view().unwrap();
	let form = serde_json::to_value(view.form.as_ref().unwrap()).unwrap();
	assert!(form.to_string().contains("192.168.1.1"));
	let levels: Vec<Level> = view.messages.iter().map(|message| message.level).collect();
	assert_eq!(levels, [Level::Error, Level::Warning]);
	assert_eq!(
		view.messages[0].text,
		"Configuration could not be saved due to an internal error."
	);
	assert!(harness.backend.mutation_log().is_empty());
}

#[rstest]
fn test_post_without_csrf_token_rejected(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);
	let data = SubmittedData::from_pairs([("lan_ipaddr", "192.168.2.1")]);

	// Act
	let result = harness.registry.handle_post(&mut ctx, "lan", data);

	// Assert
	assert!(matches!(
		result,
		Err(ConfigError::Core(foris_core::Error::Session(SessionError::Csrf)))
	));
	assert!(harness.backend.mutation_log().is_empty());
}

#[rstest]
fn test_wrong_old_password_reported(harness: Harness) {
	// Arrange
	let hash = Argon2Hasher::new().hash("correct horse").unwrap();
	harness.backend.set_value(PASSWORD_PATH, json!(hash));
	let mut ctx = logged_in(&harness.app);
	let data = form_data(
		&mut ctx,
		&[
			("old_password", "battery staple"),
			("password", "new secret"),
			("password_validation", "new secret"),
		],
	);

	// Act
	let response = harness.registry.handle_post(&mut ctx, "password", data).unwrap();

	// Assert
	assert!(response.as_redirect().is_some());
	let messages = ctx.take_messages(MessageFilter::All);
	assert_eq!(messages[0].level, Level::Error);
	assert_eq!(messages[0].text, "Old password you entered was not valid.");
	assert!(harness.backend.mutation_log().is_empty());
}

#[rstest]
fn test_password_change_stores_new_hash(harness: Harness) {
	// Arrange
	let hasher = Argon2Hasher::new();
	harness
		.backend
		.set_value(PASSWORD_PATH, json!(hasher.hash("correct horse").unwrap()));
	let mut ctx = logged_in(&harness.app);
	let data = form_data(
		&mut ctx,
		&[
			("old_password", "correct horse"),
			("password", "new secret"),
			("password_validation", "new secret"),
		],
	);

	// Act
	harness.registry.handle_post(&mut ctx, "password", data).unwrap();

	// Assert
	let stored = harness.backend.value(PASSWORD_PATH).unwrap();
	assert!(hasher.verify("new secret", stored.as_str().unwrap()).unwrap());
}

#[rstest]
fn test_backup_download(harness: Harness) {
	// Arrange
	harness.backend.set_response(
		"maintain",
		"generate_backup",
		json!({"backup": BASE64.encode(b"archive")}),
	);
	let mut ctx = logged_in(&harness.app);

	// Act
	let response = harness
		.registry
		.handle_action(&mut ctx, "maintenance", "config-backup", "GET", &SubmittedData::new())
		.unwrap();

	// Assert
	let Response::Download { filename, content } = response else {
		panic!("expected a download");
	};
	assert!(filename.starts_with("turris-backup-"));
	assert!(filename.ends_with(".tar.bz2"));
	assert_eq!(content, b"archive");
}

#[rstest]
#[case("maintenance", "factory-reset")]
#[case("wan", "reboot")]
fn test_unknown_action_not_found(harness: Harness, #[case] slug: &str, #[case] action: &str) {
	// Arrange
	let mut ctx = logged_in(&harness.app);

	// Act
	let result = harness
		.registry
		.handle_action(&mut ctx, slug, action, "GET", &SubmittedData::new());

	// Assert
	assert!(matches!(result, Err(ConfigError::UnknownAction { .. })));
}

#[rstest]
fn test_ajax_lists_remote_tokens(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);

	// Act
	let response = harness
		.registry
		.handle_ajax(&mut ctx, "remote", "list_tokens", "GET", &SubmittedData::new())
		.unwrap();

	// Assert
	let value = response.as_json().unwrap();
	assert_eq!(value["success"], json!(true));
	assert_eq!(value["tokens"][0]["name"], json!("phone"));
}

#[rstest]
fn test_ajax_revoke_without_token_is_bad_request(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);
	let data = form_data(&mut ctx, &[]);

	// Act
	let result = harness
		.registry
		.handle_ajax(&mut ctx, "remote", "revoke_token", "POST", &data);

	// Assert
	assert!(matches!(result, Err(ConfigError::BadRequest(_))));
}

#[rstest]
fn test_invalid_token_name_reported(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);
	let data = form_data(&mut ctx, &[("name", "my phone")]);

	// Act
	let response = harness
		.registry
		.handle_ajax(&mut ctx, "remote", "generate_token", "POST", &data)
		.unwrap();

	// Assert
	let value = response.as_json().unwrap();
	assert_eq!(value["success"], json!(false));
	assert!(value["errors"].get("name").is_some());
	assert!(
		!harness
			.backend
			.rpc_calls()
			.iter()
			.any(|call| call.action == "generate_token")
	);
}

#[rstest]
fn test_wifi_without_radios_has_no_form(harness: Harness) {
	// Arrange
	let mut ctx = logged_in(&harness.app);

	// Act
	let response = harness.registry.handle_get(&mut ctx, "wifi").unwrap();

	// Assert
	let view = response.as_view().unwrap();
	assert!(view.form.is_none());
	assert_eq!(view.context.get("no_form"), Some(&json!(true)));
}
