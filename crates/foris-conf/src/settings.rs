//! Application settings assembled from layered sources

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding settings
pub const ENV_PREFIX: &str = "FORIS_";

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Device flavour; some pages and wizard steps differ per device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
	#[default]
	Turris,
	Omnia,
}

impl fmt::Display for Device {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Turris => f.write_str("turris"),
			Self::Omnia => f.write_str("omnia"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub device: Device,
	/// Language used when the session names none
	pub language: String,
	pub languages: Vec<String>,
	/// Kind of configuration backend
	pub backend: String,
	pub backend_socket: PathBuf,
	/// Seconds of inactivity before a session expires
	pub session_timeout: u64,
	/// Sessions are kept in memory when unset
	pub session_dir: Option<PathBuf>,
	pub debug: bool,
	/// Default tracing filter, `RUST_LOG` takes precedence
	pub log_level: String,
	/// Directory with `<lang>.po` catalogs
	pub locale_dir: Option<PathBuf>,
	/// Names of enabled plugins
	pub plugins: Vec<String>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			device: Device::Turris,
			language: "en".to_string(),
			languages: vec!["en".to_string(), "cs".to_string(), "de".to_string()],
			backend: "memory".to_string(),
			backend_socket: PathBuf::from("/var/run/ubus.sock"),
			session_timeout: 900,
			session_dir: None,
			debug: false,
			log_level: "info".to_string(),
			locale_dir: None,
			plugins: Vec::new(),
		}
	}
}

impl Settings {
	/// Defaults as a configuration source
	pub fn default_source() -> DefaultSource {
		let defaults = Self::default();
		DefaultSource::new()
			.with_value("device", json!(defaults.device))
			.with_value("language", json!(defaults.language))
			.with_value("languages", json!(defaults.languages))
			.with_value("backend", json!(defaults.backend))
			.with_value("backend_socket", json!(defaults.backend_socket))
			.with_value("session_timeout", json!(defaults.session_timeout))
			.with_value("debug", json!(defaults.debug))
			.with_value("log_level", json!(defaults.log_level))
			.with_value("plugins", json!(defaults.plugins))
	}

	/// Defaults, then `path` when given, then `FORIS_*` variables
	///
	/// # Examples
	///
	/// ```
	/// use foris_conf::{Device, Settings};
	///
	/// let settings = Settings::load(None).unwrap();
	/// assert_eq!(settings.device, Device::Turris);
	/// ```
	pub fn load(path: Option<&Path>) -> SettingsResult<Self> {
		let mut builder = SettingsBuilder::new().add_source(Self::default_source());
		if let Some(path) = path {
			builder = builder.add_source(TomlFileSource::new(path));
		}
		builder
			.add_source(EnvSource::new().with_prefix(ENV_PREFIX))
			.build()
	}

	pub fn validate(&self) -> SettingsResult<()> {
		if self.languages.is_empty() {
			return Err(SettingsError::Invalid("no language is enabled".to_string()));
		}
		if !self.languages.contains(&self.language) {
			return Err(SettingsError::Invalid(format!(
				"default language `{}` is not among enabled languages",
				self.language
			)));
		}
		if self.session_timeout == 0 {
			return Err(SettingsError::Invalid(
				"session_timeout must be positive".to_string(),
			));
		}
		Ok(())
	}
}

/// Merges sources by priority into [`Settings`]
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merged values of all sources; on equal priority the later source wins
	pub fn merged(&self) -> SettingsResult<IndexMap<String, Value>> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(AsRef::as_ref).collect();
		ordered.sort_by_key(|source| source.priority());

		let mut merged = IndexMap::new();
		for source in ordered {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "Settings source loaded");
			merged.extend(values);
		}
		Ok(merged)
	}

	/// Known keys are deserialized, unknown ones ignored
	pub fn build(self) -> SettingsResult<Settings> {
		let merged = self.merged()?;
		let object: serde_json::Map<String, Value> = merged.into_iter().collect();
		let settings: Settings = serde_json::from_value(Value::Object(object))
			.map_err(|e| SettingsError::Invalid(e.to_string()))?;
		settings.validate()?;
		Ok(settings)
	}
}
