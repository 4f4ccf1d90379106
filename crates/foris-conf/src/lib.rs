//! Settings of the administration interface
//!
//! Built-in defaults are overridden by an optional TOML file, which is in
//! turn overridden by `FORIS_*` environment variables.
//!
//! ```
//! use foris_conf::{Settings, SettingsBuilder, sources::DefaultSource};
//! use serde_json::json;
//!
//! let settings = SettingsBuilder::new()
//! 	.add_source(Settings::default_source())
//! 	.add_source(DefaultSource::new().with_value("session_timeout", json!(600)))
//! 	.build()
//! 	.unwrap();
//! assert_eq!(settings.session_timeout, 600);
//! ```

pub mod settings;
pub mod sources;

pub use settings::{
	Device, ENV_PREFIX, Settings, SettingsBuilder, SettingsError, SettingsResult,
};
pub use sources::{ConfigSource, SourceError};
