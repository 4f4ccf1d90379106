//! Configuration sources for layered settings
//!
//! Sources are merged in priority order: environment variables over the
//! settings file over built-in defaults.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Keys parsed as booleans when read from the environment
const BOOL_KEYS: &[&str] = &["debug"];

/// Keys parsed as comma separated lists when read from the environment
const LIST_KEYS: &[&str] = &["languages", "plugins"];

/// Environment variable configuration source
///
/// # Examples
///
/// ```
/// use foris_conf::sources::{ConfigSource, EnvSource};
///
/// let source = EnvSource::new().with_prefix("FORIS_");
/// assert_eq!(source.priority(), 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
	prefix: Option<String>,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Only variables starting with `prefix` are read, with the prefix stripped
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn parse(key: &str, value: String) -> Value {
		if BOOL_KEYS.contains(&key) {
			return match value.trim().to_lowercase().as_str() {
				"true" | "1" | "yes" | "on" => Value::Bool(true),
				"false" | "0" | "no" | "off" | "" => Value::Bool(false),
				_ => Value::String(value),
			};
		}
		if LIST_KEYS.contains(&key) {
			return Value::Array(
				value
					.split(',')
					.map(str::trim)
					.filter(|item| !item.is_empty())
					.map(|item| Value::String(item.to_string()))
					.collect(),
			);
		}
		match value.parse::<i64>() {
			Ok(num) => Value::Number(num.into()),
			Err(_) => Value::String(value),
		}
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();
		for (key, value) in std::env::vars() {
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(stripped) => stripped,
					None => continue,
				},
				None => key.as_str(),
			};
			let lower_key = clean_key.to_lowercase();
			let parsed = Self::parse(&lower_key, value);
			config.insert(lower_key, parsed);
		}
		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

/// TOML settings file; a missing file contributes nothing
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "Settings file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;
		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Fixed values, lowest priority
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
