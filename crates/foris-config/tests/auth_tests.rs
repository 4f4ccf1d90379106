//! Login, logout and the login gate

use foris_backend::MemoryBackend;
use foris_conf::Settings;
use foris_config::{login, login_page, logout, require_login};
use foris_core::progress::{ALLOWED_STEP_MAX_PATH, PASSWORD_PATH, WIZARD_FINISHED_PATH};
use foris_core::{AppContext, Level, Location, MessageFilter, RequestContext};
use foris_i18n::Translator;
use foris_sessions::{Argon2Hasher, InMemorySessionStore, PasswordHasher};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

const PASSWORD: &str = "correct horse";

struct Harness {
	app: AppContext,
	backend: MemoryBackend,
}

#[fixture]
fn harness() -> Harness {
	let backend = MemoryBackend::new();
	let app = AppContext::new(
		Settings::default(),
		Arc::new(backend.clone()),
		Translator::new("en"),
		Arc::new(InMemorySessionStore::new()),
	);
	Harness { app, backend }
}

fn with_password(harness: &Harness) {
	let hash = Argon2Hasher::new().hash(PASSWORD).unwrap();
	harness.backend.set_value(PASSWORD_PATH, json!(hash));
}

#[rstest]
fn test_login_open_before_password_is_set(harness: Harness) {
	// Arrange
	let mut ctx = RequestContext::open(&harness.app, None).unwrap();

	// Act
	let response = login(&mut ctx, "", None).unwrap();

	// Assert
	assert!(ctx.is_authenticated());
	assert_eq!(response.as_redirect(), Some(&Location::WizardStep(1)));
}

#[rstest]
fn test_wrong_password_flashes_error(harness: Harness) {
	// Arrange
	with_password(&harness);
	let mut ctx = RequestContext::open(&harness.app, None).unwrap();

	// Act
	let response = login(&mut ctx, "battery staple", None).unwrap();

	// Assert
	assert!(!ctx.is_authenticated());
	assert_eq!(response.as_redirect(), Some(&Location::Login));
	let messages = ctx.take_messages(MessageFilter::Exactly(Level::Error));
	assert_eq!(messages[0].text, "The password you entered was not valid.");
}

#[rstest]
#[case("4", "0", Location::WizardStep(4))]
#[case("4", "1", Location::ConfigIndex)]
#[case("11", "0", Location::ConfigIndex)]
fn test_login_lands_where_wizard_progress_says(
	harness: Harness,
	#[case] step: &str,
	#[case] finished: &str,
	#[case] expected: Location,
) {
	// Arrange
	with_password(&harness);
	harness.backend.set_value(ALLOWED_STEP_MAX_PATH, json!(step));
	harness.backend.set_value(WIZARD_FINISHED_PATH, json!(finished));
	let mut ctx = RequestContext::open(&harness.app, None).unwrap();

	// Act
	let response = login(&mut ctx, PASSWORD, None).unwrap();

	// Assert
	assert_eq!(response.as_redirect(), Some(&expected));
}

#[rstest]
#[case("/config/lan/", Location::Url("/config/lan/".to_string()))]
#[case("http://evil.example.com/", Location::WizardStep(1))]
fn test_login_honours_only_safe_next(
	harness: Harness,
	#[case] next: &str,
	#[case] expected: Location,
) {
	// Arrange
	with_password(&harness);
	let mut ctx = RequestContext::open(&harness.app, None)
		.unwrap()
		.with_host("192.168.1.1");

	// Act
	let response = login(&mut ctx, PASSWORD, Some(next)).unwrap();

	// Assert
	assert_eq!(response.as_redirect(), Some(&expected));
}

#[rstest]
fn test_logout_returns_to_login(harness: Harness) {
	// Arrange
	let mut ctx = RequestContext::open(&harness.app, None).unwrap();
	login(&mut ctx, "", None).unwrap();

	// Act
	let response = logout(&mut ctx).unwrap();

	// Assert
	assert!(!ctx.is_authenticated());
	assert_eq!(response.as_redirect(), Some(&Location::Login));
	assert!(require_login(&ctx, "/config/").is_some());
}

#[rstest]
fn test_login_page_renders_token_and_messages(harness: Harness) {
	// Arrange
	with_password(&harness);
	let mut ctx = RequestContext::open(&harness.app, None).unwrap();
	login(&mut ctx, "battery staple", None).unwrap();

	// Act
	let response = login_page(&mut ctx, Some("/config/dns/")).unwrap();

	// Assert
	let view = response.as_view().unwrap();
	assert_eq!(view.template, "index");
	assert_eq!(view.context.get("next"), Some(&json!("/config/dns/")));
	assert!(view.context.contains_key("csrf_token"));
	assert_eq!(view.messages.len(), 1);
}
