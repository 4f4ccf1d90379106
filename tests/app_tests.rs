//! Application assembly and a first walk through the wizard

use foris::App;
use foris::backend::MemoryBackend;
use foris::conf::Settings;
use foris::config::{ConfigPage, ForisPlugin, PageId};
use foris::core::Location;
use foris::core::progress::{ALLOWED_STEP_MAX_PATH, PASSWORD_PATH};
use foris::forms::SubmittedData;
use foris::i18n::MessageCatalog;
use rstest::{fixture, rstest};
use serde_json::json;
use serial_test::serial;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

#[fixture]
fn temp_dir() -> TempDir {
	TempDir::new().expect("Failed to create temporary directory")
}

struct EnvGuard(&'static [&'static str]);

impl Drop for EnvGuard {
	fn drop(&mut self) {
		for key in self.0 {
			// SAFETY: tests touching the environment run serially
			unsafe { std::env::remove_var(key) };
		}
	}
}

struct OpenVpnPlugin;

impl ForisPlugin for OpenVpnPlugin {
	fn name(&self) -> &str {
		"openvpn"
	}

	fn pages(&self) -> Vec<ConfigPage> {
		vec![ConfigPage::new(PageId::Plugin("openvpn".to_string()), "OpenVPN", 60)]
	}

	fn translations(&self) -> Vec<MessageCatalog> {
		let mut catalog = MessageCatalog::new("cs");
		catalog.add_translation("OpenVPN", "OpenVPN server");
		vec![catalog]
	}
}

#[rstest]
#[serial(env)]
fn test_app_from_file_with_plugin(temp_dir: TempDir) {
	// Arrange
	let locale_dir = temp_dir.path().join("locale");
	fs::create_dir(&locale_dir).unwrap();
	fs::write(
		locale_dir.join("cs.po"),
		"msgid \"\"\nmsgstr \"\"\n\nmsgid \"Password\"\nmsgstr \"Heslo\"\n",
	)
	.unwrap();
	let path = temp_dir.path().join("foris.toml");
	fs::write(
		&path,
		format!(
			"plugins = [\"openvpn\", \"netmetr\"]\nlocale_dir = \"{}\"\n",
			locale_dir.display()
		),
	)
	.unwrap();

	// Act
	let app = App::from_env(Some(&path), vec![Box::new(OpenVpnPlugin)]).unwrap();

	// Assert
	assert_eq!(app.plugins(), ["openvpn"]);
	assert!(app.registry().get("openvpn").is_ok());
	let translator = app.context().translator();
	assert_eq!(translator.gettext("cs", "Password"), "Heslo");
	assert_eq!(translator.gettext("cs", "OpenVPN"), "OpenVPN server");
}

#[rstest]
#[serial(env)]
fn test_environment_overrides_file(temp_dir: TempDir) {
	// Arrange
	let _guard = EnvGuard(&["FORIS_LANGUAGE"]);
	let path = temp_dir.path().join("foris.toml");
	fs::write(&path, "language = \"de\"\n").unwrap();
	// SAFETY: tests touching the environment run serially
	unsafe { std::env::set_var("FORIS_LANGUAGE", "cs") };

	// Act
	let app = App::from_env(Some(&path), Vec::new()).unwrap();

	// Assert
	assert_eq!(app.settings().language, "cs");
}

#[rstest]
#[serial(env)]
fn test_unsupported_backend_is_rejected(temp_dir: TempDir) {
	// Arrange
	let path = temp_dir.path().join("foris.toml");
	fs::write(&path, "backend = \"netconf\"\n").unwrap();

	// Act
	let result = App::from_env(Some(&path), Vec::new());

	// Assert
	let err = result.err().unwrap();
	assert!(err.to_string().contains("netconf"));
}

#[rstest]
fn test_invalid_settings_are_rejected() {
	// Arrange
	let settings = Settings {
		language: "fr".to_string(),
		..Settings::default()
	};

	// Act
	let result = App::build(settings, Arc::new(MemoryBackend::new()), Vec::new());

	// Assert
	assert!(result.is_err());
}

#[rstest]
fn test_sessions_kept_in_directory(temp_dir: TempDir) {
	// Arrange
	let settings = Settings {
		session_dir: Some(temp_dir.path().to_path_buf()),
		..Settings::default()
	};
	let app = App::build(settings, Arc::new(MemoryBackend::new()), Vec::new()).unwrap();

	// Act
	let mut ctx = app.request(None).unwrap();
	ctx.authenticate().unwrap();
	let session_id = ctx.finish().unwrap();
	let reopened = app.request(Some(&session_id)).unwrap();

	// Assert
	assert!(reopened.is_authenticated());
}

#[rstest]
fn test_session_timeout_out_of_range_is_rejected(temp_dir: TempDir) {
	// Arrange
	let settings = Settings {
		session_dir: Some(temp_dir.path().to_path_buf()),
		session_timeout: u64::MAX,
		..Settings::default()
	};

	// Act
	let result = App::build(settings, Arc::new(MemoryBackend::new()), Vec::new());

	// Assert
	let err = result.err().unwrap();
	assert!(err.to_string().contains("out of range"));
}

#[rstest]
#[serial(env)]
fn test_log_filter_from_settings() {
	// Arrange
	let _guard = EnvGuard(&["RUST_LOG"]);
	// SAFETY: tests touching the environment run serially
	unsafe { std::env::remove_var("RUST_LOG") };
	let settings = Settings {
		log_level: "foris_wizard=debug,warn".to_string(),
		..Settings::default()
	};

	// Act
	let filter = foris::logging::filter(&settings).unwrap();

	// Assert
	assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
}

#[rstest]
fn test_first_login_walks_into_wizard() {
	// Arrange
	let backend = MemoryBackend::new();
	let app = App::build(Settings::default(), Arc::new(backend.clone()), Vec::new()).unwrap();
	let mut ctx = app.request(None).unwrap();

	// Act
	let landing = foris::config::login(&mut ctx, "", None).unwrap();
	let mut data = SubmittedData::from_pairs([
		("password", "turris-omnia"),
		("password_validation", "turris-omnia"),
	]);
	data.insert("csrf_token", ctx.csrf_token());
	let saved = app.wizard().handle_post(&mut ctx, 1, data).unwrap();

	// Assert
	assert_eq!(landing.as_redirect(), Some(&Location::WizardStep(1)));
	assert_eq!(saved.as_redirect(), Some(&Location::WizardStep(2)));
	assert_eq!(backend.value(ALLOWED_STEP_MAX_PATH), Some(json!("2")));
	assert!(backend.value(PASSWORD_PATH).is_some());
}
