//! Loading settings from a file and the environment

use foris_conf::{Device, Settings, SettingsError};
use rstest::{fixture, rstest};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

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

#[rstest]
#[serial(env)]
fn test_file_overrides_defaults(temp_dir: TempDir) {
	// Arrange
	let path = temp_dir.path().join("foris.toml");
	fs::write(
		&path,
		r#"
device = "omnia"
session_timeout = 1800
plugins = ["openvpn"]
"#,
	)
	.unwrap();

	// Act
	let settings = Settings::load(Some(&path)).unwrap();

	// Assert
	assert_eq!(settings.device, Device::Omnia);
	assert_eq!(settings.session_timeout, 1800);
	assert_eq!(settings.plugins, ["openvpn"]);
	assert_eq!(settings.language, "en");
}

#[rstest]
#[serial(env)]
fn test_environment_overrides_file(temp_dir: TempDir) {
	// Arrange
	let path = temp_dir.path().join("foris.toml");
	fs::write(&path, "debug = false\nlanguage = \"de\"\n").unwrap();
	let _guard = EnvGuard(&["FORIS_DEBUG", "FORIS_LANGUAGE"]);
	// SAFETY: tests touching the environment run serially
	unsafe {
		std::env::set_var("FORIS_DEBUG", "on");
		std::env::set_var("FORIS_LANGUAGE", "cs");
	}

	// Act
	let settings = Settings::load(Some(&path)).unwrap();

	// Assert
	assert!(settings.debug);
	assert_eq!(settings.language, "cs");
}

#[rstest]
#[serial(env)]
fn test_malformed_file_names_its_source(temp_dir: TempDir) {
	// Arrange
	let path = temp_dir.path().join("foris.toml");
	fs::write(&path, "device = [").unwrap();

	// Act
	let result = Settings::load(Some(&path));

	// Assert
	match result {
		Err(SettingsError::Source { source_name, .. }) => assert!(source_name.contains("foris.toml")),
		other => panic!("unexpected result: {other:?}"),
	}
}
